use crate::config::types::TriageConfig;
use crate::error::{Result, TriageError};
use std::path::Path;

/// Configuration loader trait
pub trait ConfigLoader {
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<TriageConfig>;
    fn load_with_validation<P: AsRef<Path>>(path: P) -> Result<TriageConfig>;
}

/// Default configuration loader implementation
pub struct DefaultConfigLoader;

impl ConfigLoader for DefaultConfigLoader {
    /// Load configuration from a skintag.toml file
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<TriageConfig> {
        let content = std::fs::read_to_string(&path).map_err(|_| TriageError::ConfigNotFound {
            path: path.as_ref().to_path_buf(),
        })?;

        let config: TriageConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load and validate configuration with file context in error messages
    fn load_with_validation<P: AsRef<Path>>(path: P) -> Result<TriageConfig> {
        let path_ref = path.as_ref();

        if !path_ref.exists() {
            return Err(TriageError::ConfigNotFound {
                path: path_ref.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path_ref).map_err(TriageError::Io)?;

        let config: TriageConfig = toml::from_str(&content).map_err(|e| {
            TriageError::invalid_config(format!(
                "Failed to parse TOML in {}: {}",
                path_ref.display(),
                e
            ))
        })?;

        crate::config::validator::ConfigValidatorImpl::new()
            .validate_with_context(&config, path_ref)?;

        Ok(config)
    }
}

impl TriageConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        DefaultConfigLoader::load_from_file(path)
    }

    /// Load and validate configuration from a TOML file
    pub fn load_with_validation<P: AsRef<Path>>(path: P) -> Result<Self> {
        DefaultConfigLoader::load_with_validation(path)
    }

    /// Load a validated configuration, falling back to built-in defaults when
    /// the file does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        if path_ref.exists() {
            Self::load_with_validation(path_ref)
        } else {
            tracing::debug!(path = %path_ref.display(), "No config file, using built-in defaults");
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RiskTier;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_minimal_config_applies_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("skintag.toml");
        fs::write(
            &path,
            r#"
[actions.low]
label = "Learn More"
url = "https://example.org/learn"

[actions.moderate]
label = "Find a Dermatologist"
url = "https://find-a-derm.aad.org/search?searchTerm=&searchLocation="

[actions.high]
label = "Find a Dermatologist"
url = "https://find-a-derm.aad.org/search?searchTerm=&searchLocation="
"#,
        )
        .unwrap();

        let config = TriageConfig::load_with_validation(&path).unwrap();
        assert_eq!(config.locate.geolocation_timeout_ms, 5000);
        assert_eq!(config.geocoder.user_agent, "SkinTag-App");
        assert_eq!(config.reveal.delay_ms, 200);

        let table = config.action_table().unwrap();
        assert_eq!(table.get(RiskTier::Low).url, "https://example.org/learn");
    }

    #[test]
    fn test_missing_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let result = TriageConfig::load_from_file(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(TriageError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = TempDir::new().unwrap();
        let config = TriageConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.actions.len(), 3);
    }

    #[test]
    fn test_invalid_toml_has_context() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("skintag.toml");
        fs::write(&path, "actions = [").unwrap();

        let error = TriageConfig::load_with_validation(&path).unwrap_err();
        assert!(error.to_string().contains("Failed to parse TOML"));
    }
}
