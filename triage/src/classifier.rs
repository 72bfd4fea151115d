use crate::types::{CategoryKey, CategoryMap, DisplayState, TriageCategories};

/// Turns category probabilities into presentation state
#[derive(Debug, Clone, Copy, Default)]
pub struct TriageClassifier;

impl TriageClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify the three category scores into a display state
    pub fn classify(&self, categories: &TriageCategories) -> DisplayState {
        DisplayState {
            dominant: dominant_category(categories),
            animated_percentages: percentage_targets(categories),
        }
    }
}

/// Select the dominant category.
///
/// Categories are scanned in canonical order and a later category only takes
/// over on a strictly higher probability, so ties resolve toward the more
/// severe category.
pub fn dominant_category(categories: &TriageCategories) -> CategoryKey {
    let mut best = CategoryKey::Malignant;
    for key in CategoryKey::CANONICAL_ORDER.into_iter().skip(1) {
        if categories[key].probability > categories[best].probability {
            best = key;
        }
    }
    best
}

/// Percentage targets for the reveal transition
pub fn percentage_targets(categories: &TriageCategories) -> CategoryMap<f64> {
    CategoryMap::from_fn(|key| categories[key].probability * 100.0)
}
