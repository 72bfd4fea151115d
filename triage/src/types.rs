use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;
use std::str::FromStr;

/// The three clinical categories a lesion is scored against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKey {
    Malignant,
    Inflammatory,
    Benign,
}

impl CategoryKey {
    /// Severity-descending order used for iteration and tie-breaking
    pub const CANONICAL_ORDER: [CategoryKey; 3] = [
        CategoryKey::Malignant,
        CategoryKey::Inflammatory,
        CategoryKey::Benign,
    ];

    /// Stable lowercase identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKey::Malignant => "malignant",
            CategoryKey::Inflammatory => "inflammatory",
            CategoryKey::Benign => "benign",
        }
    }

    /// Short clinical description shown next to the category
    pub fn description(&self) -> &'static str {
        match self {
            CategoryKey::Malignant => {
                "Cancerous or pre-cancerous lesions requiring medical attention"
            }
            CategoryKey::Inflammatory => "Reactive or inflammatory skin conditions",
            CategoryKey::Benign => "Harmless growths unlikely to require treatment",
        }
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A labelled score for a single category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryProbability {
    pub label: String,
    /// Score in [0, 1]; not assumed to sum to 1 with its siblings
    pub probability: f64,
}

impl CategoryProbability {
    pub fn new<S: Into<String>>(label: S, probability: f64) -> Self {
        Self {
            label: label.into(),
            probability,
        }
    }
}

/// All three category scores of a single analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageCategories {
    pub malignant: CategoryProbability,
    pub inflammatory: CategoryProbability,
    pub benign: CategoryProbability,
}

impl TriageCategories {
    /// Build categories with the default labels
    pub fn from_probabilities(malignant: f64, inflammatory: f64, benign: f64) -> Self {
        Self {
            malignant: CategoryProbability::new("Malignant", malignant),
            inflammatory: CategoryProbability::new("Inflammatory", inflammatory),
            benign: CategoryProbability::new("Benign", benign),
        }
    }

    /// Iterate categories in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (CategoryKey, &CategoryProbability)> {
        CategoryKey::CANONICAL_ORDER
            .into_iter()
            .map(move |key| (key, &self[key]))
    }
}

impl Index<CategoryKey> for TriageCategories {
    type Output = CategoryProbability;

    fn index(&self, key: CategoryKey) -> &Self::Output {
        match key {
            CategoryKey::Malignant => &self.malignant,
            CategoryKey::Inflammatory => &self.inflammatory,
            CategoryKey::Benign => &self.benign,
        }
    }
}

/// Total map from every category to a value
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryMap<T> {
    pub malignant: T,
    pub inflammatory: T,
    pub benign: T,
}

impl<T> CategoryMap<T> {
    /// Build a map by evaluating `f` for every key in canonical order
    pub fn from_fn<F: FnMut(CategoryKey) -> T>(mut f: F) -> Self {
        Self {
            malignant: f(CategoryKey::Malignant),
            inflammatory: f(CategoryKey::Inflammatory),
            benign: f(CategoryKey::Benign),
        }
    }

    pub fn get(&self, key: CategoryKey) -> &T {
        match key {
            CategoryKey::Malignant => &self.malignant,
            CategoryKey::Inflammatory => &self.inflammatory,
            CategoryKey::Benign => &self.benign,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (CategoryKey, &T)> {
        CategoryKey::CANONICAL_ORDER
            .into_iter()
            .map(move |key| (key, self.get(key)))
    }
}

/// Coarse risk bucket computed upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Moderate,
    High,
}

impl RiskTier {
    pub const ALL: [RiskTier; 3] = [RiskTier::Low, RiskTier::Moderate, RiskTier::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Moderate => "moderate",
            RiskTier::High => "high",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskTier {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(RiskTier::Low),
            "moderate" => Ok(RiskTier::Moderate),
            "high" => Ok(RiskTier::High),
            other => Err(format!(
                "unknown risk tier '{}'; expected low, moderate or high",
                other
            )),
        }
    }
}

/// Analysis payload owned by the caller; the core only reads it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub categories: TriageCategories,
    pub risk_tier: RiskTier,
    /// Headline risk label, e.g. "Moderate Risk"
    pub headline: String,
    #[serde(default)]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Vec<String>,
}

impl AnalysisResult {
    /// Parse an analysis result from JSON
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Presentation state derived from the current probabilities
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayState {
    pub dominant: CategoryKey,
    /// Percentage targets (probability * 100) for the reveal transition
    pub animated_percentages: CategoryMap<f64>,
}

impl DisplayState {
    /// Whole-number percentage shown to the user
    pub fn rounded(&self, key: CategoryKey) -> i64 {
        round_percent(*self.animated_percentages.get(key))
    }
}

/// Round a percentage for display
pub fn round_percent(value: f64) -> i64 {
    value.round() as i64
}

/// Postal code resolved from the device location, if any
pub type LocationQueryResult = Option<String>;

/// Geographic position reported by a location provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.latitude, self.longitude)
    }
}

/// Browsing-context features applied when a destination is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowFeatures {
    /// The new context gets no handle back to the opener
    pub noopener: bool,
    /// No Referer is sent to the destination
    pub noreferrer: bool,
}

impl WindowFeatures {
    /// New context with no back-reference to the opening page
    pub fn isolated() -> Self {
        Self {
            noopener: true,
            noreferrer: true,
        }
    }
}

impl fmt::Display for WindowFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.noopener {
            parts.push("noopener");
        }
        if self.noreferrer {
            parts.push("noreferrer");
        }
        f.write_str(&parts.join(","))
    }
}

/// A request to open a destination in a new browsing context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRequest {
    pub url: String,
    pub features: WindowFeatures,
}

impl OpenRequest {
    /// Open `url` in an isolated new context
    pub fn isolated<S: Into<String>>(url: S) -> Self {
        Self {
            url: url.into(),
            features: WindowFeatures::isolated(),
        }
    }
}
