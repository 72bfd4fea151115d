use crate::error::{Result, TriageError};
use std::path::Path;

/// Generate the default skintag.toml template
pub fn generate_default_config_template() -> String {
    r#"# SkinTag triage configuration

# Follow-up action offered for each risk tier. All three tiers are required.
[actions.low]
label = "Learn More"
url = "https://www.aad.org/public/diseases/skin-cancer"

[actions.moderate]
label = "Find a Dermatologist"
url = "https://find-a-derm.aad.org/search?searchTerm=&searchLocation="

[actions.high]
label = "Find a Dermatologist"
url = "https://find-a-derm.aad.org/search?searchTerm=&searchLocation="

# Destinations matching any pattern get the device postal code filled in
[locate]
destination_patterns = ["find-a-derm.aad.org"]
location_param = "searchLocation"
# Give up on the device location after this many milliseconds
geolocation_timeout_ms = 5000

# Reverse geocoding service used to turn coordinates into a postal code
[geocoder]
endpoint = "https://nominatim.openstreetmap.org/reverse"
user_agent = "SkinTag-App"
timeout_seconds = 4
zoom = 18

[share]
title = "SkinTag Analysis Results"

# Delay before probability bars move to their targets
[reveal]
delay_ms = 200
"#
    .to_string()
}

/// Write the default configuration file if it is missing.
///
/// Returns `true` when a file was written.
pub fn ensure_config_file_exists(config_path: &str, force: bool) -> Result<bool> {
    let path = Path::new(config_path);
    if path.exists() && !force {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(path, generate_default_config_template()).map_err(|e| {
        TriageError::invalid_config(format!("Failed to write {}: {}", path.display(), e))
    })?;

    Ok(true)
}
