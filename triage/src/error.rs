use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for triage operations
pub type Result<T> = std::result::Result<T, TriageError>;

/// Error types for the triage core
#[derive(Debug, Error)]
pub enum TriageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Result parse error: {0}")]
    ResultParse(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Reverse geocoding failed: {message}")]
    Geocode { message: String },

    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    #[error("Failed to open destination {url}: {message}")]
    OpenFailed { url: String, message: String },
}

impl TriageError {
    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a new reverse geocoding error
    pub fn geocode<S: Into<String>>(message: S) -> Self {
        Self::Geocode {
            message: message.into(),
        }
    }

    /// Create a new destination open error
    pub fn open_failed<S: Into<String>>(url: S, message: S) -> Self {
        Self::OpenFailed {
            url: url.into(),
            message: message.into(),
        }
    }
}

/// Failures reported by a device location provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable: {0}")]
    Unavailable(String),

    #[error("location request timed out")]
    Timeout,
}

/// Failures reported by a platform share sheet
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareError {
    #[error("share cancelled by user")]
    Cancelled,

    #[error("share failed: {0}")]
    Failed(String),
}

/// Failures reported by a clipboard sink
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("clipboard write failed: {0}")]
    WriteFailed(String),
}
