//! Error handling for Vidgrab

use thiserror::Error;

/// Main error type for Vidgrab
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("{0} not found. Please install {0} and make sure it is on PATH")]
    MissingDependency(&'static str),

    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailure(String),

    #[error("A download is already in progress")]
    Busy,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// True for failures detected before the extraction library is invoked.
    pub fn is_preflight(&self) -> bool {
        matches!(
            self,
            AppError::InvalidUrl(_) | AppError::MissingDependency(_) | AppError::Busy
        )
    }
}
