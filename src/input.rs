use crate::error::{CliError, Result, ResultExt};
use std::fs;
use std::path::Path;
use triage::{AnalysisResult, TriageConfig};

/// Read an analysis result from a JSON file
pub fn load_result(path: &str) -> Result<AnalysisResult> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(CliError::ResultNotFound(path.to_path_buf()));
    }

    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let result: AnalysisResult = serde_json::from_str(&json)?;
    tracing::debug!(path = %path.display(), tier = %result.risk_tier, "Loaded analysis result");
    Ok(result)
}

/// Load the configuration, using built-in defaults when the file is absent
pub fn load_config(path: &str) -> Result<TriageConfig> {
    TriageConfig::load_or_default(path).with_context(|| "Failed to load configuration")
}
