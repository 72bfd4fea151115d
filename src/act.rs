use crate::error::{CliError, Result};
use crate::input::{load_config, load_result};
use crate::platform::{self, ArgumentLocation, BrowserOpener};
use crate::ui;
use colored::Colorize;
use tokio::runtime::Runtime;
use triage::{LocateOutcome, LocateState, RiskTier};

#[derive(Debug, Clone)]
pub struct ActArgs {
    pub result_path: String,
    pub config_path: String,
    pub tier: Option<RiskTier>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub print_only: bool,
    pub verbose: bool,
}

pub fn execute(args: ActArgs) -> Result<()> {
    let result = load_result(&args.result_path)?;
    let config = load_config(&args.config_path)?;
    let tier = args.tier.unwrap_or(result.risk_tier);

    let dispatcher = platform::terminal_dispatcher(
        &config,
        ArgumentLocation::new(args.lat, args.lon),
        BrowserOpener::new(args.print_only),
    )?;

    let action = dispatcher.action_for(tier);
    ui::section_header(&format!("{} ({} risk)", action.label, tier));
    if dispatcher.is_location_sensitive(&action.url) {
        ui::status_message("Looking up specialists near you");
    }

    let rt = Runtime::new()
        .map_err(|e| CliError::Other(format!("Failed to create async runtime: {}", e)))?;
    let outcome = rt.block_on(dispatcher.dispatch(tier))?;

    if let Some(locate) = &outcome.locate {
        report_locate(locate, args.verbose);
    }

    if !args.print_only {
        ui::success_message(&format!("Opened {}", outcome.opened.url));
    }
    Ok(())
}

fn report_locate(outcome: &LocateOutcome, verbose: bool) {
    // Fallbacks stay silent here; the locator logs their reason.
    if let Some(message) = locate_message(outcome) {
        ui::success_message(&message);
    }

    if verbose {
        let trace = outcome
            .trace
            .iter()
            .map(LocateState::name)
            .collect::<Vec<_>>()
            .join(" -> ");
        println!("  {} {}", "trace:".dimmed(), trace.dimmed());
    }
}

/// User-facing line for a locate outcome; only a resolved location has one
fn locate_message(outcome: &LocateOutcome) -> Option<String> {
    match outcome.final_state() {
        LocateState::Resolved { postal_code } => {
            Some(format!("Searching near postal code {}", postal_code))
        }
        _ => None,
    }
}
