use crate::error::{CliError, Result};
use crate::ui;
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::path::Path;
use triage::config::ensure_config_file_exists;

pub fn execute(config_path: &str, force: bool) -> Result<()> {
    ui::section_header("SkinTag Configuration Setup");

    let exists = Path::new(config_path).exists();
    let overwrite = if exists && !force {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("{} already exists. Overwrite it?", config_path))
            .default(false)
            .interact()?
    } else {
        force
    };

    if exists && !overwrite {
        ui::info_message("Keeping the existing configuration");
        return Ok(());
    }

    ui::status_message("Writing configuration file");
    let written = ensure_config_file_exists(config_path, overwrite).map_err(|e| {
        CliError::Other(format!("Failed to create configuration file: {}", e))
    })?;

    if written {
        ui::success_message(&format!("Created {}", config_path));
        ui::info_message("Edit the [actions] section to change the follow-up destinations");
    }

    Ok(())
}
