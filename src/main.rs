mod act;
mod classify;
mod cli;
mod error;
mod init;
mod input;
mod platform;
mod results;
mod ui;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use std::process;
use tracing::Level;

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Init { force } => init::execute(&cli.config, force),
        Commands::Classify { input } => classify::execute(&input.result, &cli.config),
        Commands::Export { input } => results::execute_export(&input.result),
        Commands::Copy { input } => results::execute_copy(&input.result, &cli.config),
        Commands::Share { input } => results::execute_share(&input.result, &cli.config),
        Commands::Act {
            input,
            tier,
            lat,
            lon,
            print_only,
        } => act::execute(act::ActArgs {
            result_path: input.result,
            config_path: cli.config,
            tier: tier.map(Into::into),
            lat,
            lon,
            print_only,
            verbose: cli.verbose,
        }),
    };

    if let Err(err) = result {
        eprintln!("{} {}", "Error:".bold().red(), err.user_message());
        process::exit(1);
    }
}
