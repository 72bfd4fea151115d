use crate::error::{Result, TriageError};
use crate::export::DEFAULT_SHARE_TITLE;
use crate::types::RiskTier;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Main configuration for the triage front end
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TriageConfig {
    /// Follow-up action per risk tier, keyed by tier name
    pub actions: BTreeMap<String, TierAction>,
    /// Specialist lookup settings
    #[serde(default)]
    pub locate: LocateConfig,
    /// Reverse geocoding settings
    #[serde(default)]
    pub geocoder: GeocoderConfig,
    /// Share sheet settings
    #[serde(default)]
    pub share: ShareConfig,
    /// Probability reveal settings
    #[serde(default)]
    pub reveal: RevealConfig,
}

/// Label and destination offered for a tier
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TierAction {
    pub label: String,
    pub url: String,
}

impl TierAction {
    pub fn new<S: Into<String>>(label: S, url: S) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

/// Settings for the locate-specialist flow
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocateConfig {
    /// URL substrings that mark a destination as location-sensitive
    #[serde(default = "default_destination_patterns")]
    pub destination_patterns: Vec<String>,
    /// Query parameter that receives the postal code
    #[serde(default = "default_location_param")]
    pub location_param: String,
    /// Hard bound on device location acquisition
    #[serde(default = "default_geolocation_timeout_ms")]
    pub geolocation_timeout_ms: u64,
}

/// Reverse geocoding endpoint settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeocoderConfig {
    #[serde(default = "default_geocoder_endpoint")]
    pub endpoint: String,
    /// Client-identifying User-Agent header
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds
    #[serde(default = "default_geocoder_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_zoom")]
    pub zoom: u8,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShareConfig {
    #[serde(default = "default_share_title")]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RevealConfig {
    /// Delay before percentage targets are applied
    #[serde(default = "default_reveal_delay_ms")]
    pub delay_ms: u64,
}

fn default_destination_patterns() -> Vec<String> {
    vec!["find-a-derm.aad.org".to_string()]
}

fn default_location_param() -> String {
    "searchLocation".to_string()
}

fn default_geolocation_timeout_ms() -> u64 {
    5000
}

fn default_geocoder_endpoint() -> String {
    "https://nominatim.openstreetmap.org/reverse".to_string()
}

fn default_user_agent() -> String {
    "SkinTag-App".to_string()
}

fn default_geocoder_timeout() -> u64 {
    4
}

fn default_zoom() -> u8 {
    18
}

fn default_share_title() -> String {
    DEFAULT_SHARE_TITLE.to_string()
}

fn default_reveal_delay_ms() -> u64 {
    200
}

impl Default for LocateConfig {
    fn default() -> Self {
        Self {
            destination_patterns: default_destination_patterns(),
            location_param: default_location_param(),
            geolocation_timeout_ms: default_geolocation_timeout_ms(),
        }
    }
}

impl LocateConfig {
    pub fn geolocation_timeout(&self) -> Duration {
        Duration::from_millis(self.geolocation_timeout_ms)
    }

    /// Whether a destination needs the location pipeline
    pub fn is_location_sensitive(&self, url: &str) -> bool {
        self.destination_patterns
            .iter()
            .any(|pattern| !pattern.is_empty() && url.contains(pattern.as_str()))
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_geocoder_endpoint(),
            user_agent: default_user_agent(),
            timeout_seconds: default_geocoder_timeout(),
            zoom: default_zoom(),
        }
    }
}

impl GeocoderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            title: default_share_title(),
        }
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_reveal_delay_ms(),
        }
    }
}

/// Built-in tier destinations
pub fn default_actions() -> BTreeMap<String, TierAction> {
    let find_a_derm = "https://find-a-derm.aad.org/search?searchTerm=&searchLocation=";
    BTreeMap::from([
        (
            RiskTier::Low.to_string(),
            TierAction::new("Learn More", "https://www.aad.org/public/diseases/skin-cancer"),
        ),
        (
            RiskTier::Moderate.to_string(),
            TierAction::new("Find a Dermatologist", find_a_derm),
        ),
        (
            RiskTier::High.to_string(),
            TierAction::new("Find a Dermatologist", find_a_derm),
        ),
    ])
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            actions: default_actions(),
            locate: LocateConfig::default(),
            geocoder: GeocoderConfig::default(),
            share: ShareConfig::default(),
            reveal: RevealConfig::default(),
        }
    }
}

/// Total lookup from every risk tier to its action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierActionTable {
    low: TierAction,
    moderate: TierAction,
    high: TierAction,
}

impl TierActionTable {
    /// Build the table, failing on unknown tier names or a missing tier
    pub fn from_map(actions: &BTreeMap<String, TierAction>) -> Result<Self> {
        let mut by_tier = HashMap::new();
        for (name, action) in actions {
            let tier = name.parse::<RiskTier>().map_err(|e| {
                TriageError::invalid_config(format!("Invalid [actions.{}] section: {}", name, e))
            })?;
            if by_tier.insert(tier, action).is_some() {
                return Err(TriageError::invalid_config(format!(
                    "Tier '{}' is configured more than once",
                    tier
                )));
            }
        }

        let lookup = |tier: RiskTier| {
            by_tier.get(&tier).map(|action| (*action).clone()).ok_or_else(|| {
                TriageError::invalid_config(format!(
                    "No action configured for the '{}' tier. Add an [actions.{}] section.",
                    tier, tier
                ))
            })
        };

        Ok(Self {
            low: lookup(RiskTier::Low)?,
            moderate: lookup(RiskTier::Moderate)?,
            high: lookup(RiskTier::High)?,
        })
    }

    pub fn get(&self, tier: RiskTier) -> &TierAction {
        match tier {
            RiskTier::Low => &self.low,
            RiskTier::Moderate => &self.moderate,
            RiskTier::High => &self.high,
        }
    }
}

impl TriageConfig {
    /// Build the validated tier lookup
    pub fn action_table(&self) -> Result<TierActionTable> {
        TierActionTable::from_map(&self.actions)
    }
}
