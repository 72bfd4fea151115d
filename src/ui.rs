use colored::Colorize;
use std::io::{self, Write};

/// Announce a step that is about to run
pub fn status_message(message: &str) {
    println!("{} {}", "→".cyan(), message.bright_white());
    let _ = io::stdout().flush();
}

/// Confirm a completed step; also the terminal success notification
pub fn success_message(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

/// Report a failure on stderr; also the terminal error notification
pub fn error_message(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red().bold());
}

/// Title line above a block of results
pub fn section_header(title: &str) {
    println!("\n{}", title.cyan().bold().underline());
}

pub fn info_message(message: &str) {
    println!("  {}", message.blue());
}

/// Medical disclaimer shown under every rendered result
pub fn disclaimer() {
    let (lead, rest) = triage::export::DISCLAIMER
        .split_once(". ")
        .unwrap_or((triage::export::DISCLAIMER, ""));
    println!("{} {}", format!("{}.", lead).red().bold(), rest.dimmed());
}
