//! Triage - presentation core for skin-lesion risk results
//!
//! This crate turns three category probabilities into display state, reveals
//! the percentage breakdown after a short cancelable delay, and dispatches the
//! follow-up action for a risk tier: opening a specialist search enriched with
//! the device's postal code when one can be resolved, or sharing and copying
//! a text summary of the result.

// Core modules
pub mod config;
pub mod error;
pub mod traits;
pub mod types;

// Main functionality modules
pub mod classifier;
pub mod dispatcher;
pub mod export;
pub mod geocode;
pub mod locate;
pub mod reveal;

pub mod testing;

// Re-export main types for convenience
pub use classifier::{dominant_category, TriageClassifier};
pub use config::{TierAction, TierActionTable, TriageConfig};
pub use dispatcher::{
    ActionDispatcher, Capabilities, DefaultActionDispatcher, DispatchOutcome, ShareOutcome,
};
pub use error::{ClipboardError, LocationError, Result, ShareError, TriageError};
pub use export::{format_as_text, SharePayload};
pub use geocode::NominatimClient;
pub use locate::{FallbackReason, LocateOutcome, LocateState, SpecialistLocator};
pub use reveal::{RevealFrame, RevealScheduler};
pub use traits::{
    ClipboardSink, DestinationOpener, GeocodeService, LocationProvider, Notifier, ShareSink,
};
pub use types::{
    AnalysisResult, CategoryKey, CategoryMap, CategoryProbability, Coordinates, DisplayState,
    LocationQueryResult, OpenRequest, RiskTier, TriageCategories, WindowFeatures,
};

/// Classify category probabilities with the default classifier
pub fn classify(categories: &TriageCategories) -> DisplayState {
    TriageClassifier::new().classify(categories)
}
