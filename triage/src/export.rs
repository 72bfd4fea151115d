use crate::classifier::dominant_category;
use crate::types::{round_percent, AnalysisResult};
use std::fmt::Write;

/// Default title for shared results
pub const DEFAULT_SHARE_TITLE: &str = "SkinTag Analysis Results";

/// Disclaimer appended to every exported summary
pub const DISCLAIMER: &str =
    "Not medical advice. For educational purposes only. Consult a healthcare provider for diagnosis.";

/// Payload handed to a platform share sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
}

impl SharePayload {
    pub fn new<S: Into<String>>(title: S, text: S) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }

    /// Build the payload for an analysis result
    pub fn for_result(title: &str, result: &AnalysisResult) -> Self {
        Self::new(title.to_string(), format_as_text(result))
    }
}

/// Serialize an analysis result as plain text for clipboard or share use
pub fn format_as_text(result: &AnalysisResult) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "{}", DEFAULT_SHARE_TITLE);
    let _ = writeln!(out, "Risk level: {}", result.headline);
    if let Some(generated_at) = result.generated_at {
        let _ = writeln!(out, "Generated: {}", generated_at.format("%Y-%m-%d %H:%M UTC"));
    }

    out.push('\n');
    out.push_str("Triage classification:\n");
    for (_, category) in result.categories.iter() {
        let _ = writeln!(
            out,
            "- {}: {}%",
            category.label,
            round_percent(category.probability * 100.0)
        );
    }

    let dominant = dominant_category(&result.categories);
    let _ = writeln!(out, "Most likely: {}", result.categories[dominant].label);

    if !result.notes.is_empty() {
        out.push('\n');
        out.push_str("Notes:\n");
        for note in &result.notes {
            let _ = writeln!(out, "- {}", note);
        }
    }

    out.push('\n');
    out.push_str(DISCLAIMER);
    out
}
