use crate::config::types::{TierActionTable, TriageConfig};
use crate::error::{Result, TriageError};
use crate::traits::ConfigValidator;
use crate::types::RiskTier;
use std::path::Path;
use url::Url;

/// Configuration validator implementation
pub struct ConfigValidatorImpl;

impl ConfigValidator for ConfigValidatorImpl {
    type Config = TriageConfig;

    fn validate(&self, config: &TriageConfig) -> Result<()> {
        self.validate_with_context(config, "configuration")
    }
}

impl ConfigValidatorImpl {
    pub fn new() -> Self {
        Self
    }

    /// Validation with the config source named in error messages
    pub fn validate_with_context<P: AsRef<Path>>(
        &self,
        config: &TriageConfig,
        config_path: P,
    ) -> Result<()> {
        let config_path_str = config_path.as_ref().to_string_lossy();

        // Every tier must resolve to exactly one action
        let table = TierActionTable::from_map(&config.actions).map_err(|e| {
            TriageError::invalid_config(format!("{} (in {})", e, config_path_str))
        })?;

        let location_param = config.locate.location_param.trim();
        if location_param.is_empty() {
            return Err(TriageError::invalid_config(format!(
                "locate.location_param must not be empty in {}",
                config_path_str
            )));
        }

        for tier in RiskTier::ALL {
            let action = table.get(tier);
            if action.label.trim().is_empty() {
                return Err(TriageError::invalid_config(format!(
                    "Action for the '{}' tier in {} has an empty label",
                    tier, config_path_str
                )));
            }

            let url = Url::parse(&action.url).map_err(|e| {
                TriageError::invalid_config(format!(
                    "Invalid url '{}' for the '{}' tier in {}: {}",
                    action.url, tier, config_path_str, e
                ))
            })?;

            if config.locate.is_location_sensitive(&action.url)
                && !url.query_pairs().any(|(key, _)| key == location_param)
            {
                return Err(TriageError::invalid_config(format!(
                    "Location-sensitive url '{}' for the '{}' tier has no '{}' query parameter",
                    action.url, tier, location_param
                )));
            }
        }

        if Url::parse(&config.geocoder.endpoint).is_err() {
            return Err(TriageError::invalid_config(format!(
                "Invalid geocoder.endpoint '{}' in {}. Must be a valid URL.",
                config.geocoder.endpoint, config_path_str
            )));
        }

        if config.geocoder.timeout_seconds == 0 || config.geocoder.timeout_seconds > 60 {
            return Err(TriageError::invalid_config(
                "geocoder.timeout_seconds must be between 1 and 60 seconds".to_string(),
            ));
        }

        let geolocation_timeout = config.locate.geolocation_timeout_ms;
        if geolocation_timeout == 0 || geolocation_timeout > 60_000 {
            return Err(TriageError::invalid_config(
                "locate.geolocation_timeout_ms must be between 1 and 60000".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for ConfigValidatorImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl TriageConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        ConfigValidatorImpl::new().validate(self)
    }
}
