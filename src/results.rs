use crate::error::{CliError, Result};
use crate::input::{load_config, load_result};
use crate::platform::{self, ArgumentLocation, BrowserOpener};
use tokio::runtime::Runtime;
use triage::{format_as_text, ShareOutcome};

/// Print the shareable text summary
pub fn execute_export(result_path: &str) -> Result<()> {
    let result = load_result(result_path)?;
    println!("{}", format_as_text(&result));
    Ok(())
}

/// Copy the text summary to the system clipboard
pub fn execute_copy(result_path: &str, config_path: &str) -> Result<()> {
    let result = load_result(result_path)?;
    let config = load_config(config_path)?;
    let dispatcher =
        platform::terminal_dispatcher(&config, ArgumentLocation::default(), BrowserOpener::default())?;

    let rt = Runtime::new()
        .map_err(|e| CliError::Other(format!("Failed to create async runtime: {}", e)))?;
    rt.block_on(dispatcher.copy_results(&result))?;
    Ok(())
}

/// Share the text summary, falling back to the clipboard
pub fn execute_share(result_path: &str, config_path: &str) -> Result<()> {
    let result = load_result(result_path)?;
    let config = load_config(config_path)?;
    let dispatcher =
        platform::terminal_dispatcher(&config, ArgumentLocation::default(), BrowserOpener::default())?;

    let rt = Runtime::new()
        .map_err(|e| CliError::Other(format!("Failed to create async runtime: {}", e)))?;
    match rt.block_on(dispatcher.share_results(&result)) {
        ShareOutcome::Shared | ShareOutcome::Copied => Ok(()),
        ShareOutcome::Failed => Err(CliError::Other(
            "Results could not be shared or copied".to_string(),
        )),
    }
}
