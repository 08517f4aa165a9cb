/// Error types for lake page and weather API access
use thiserror::Error;

/// Main error type for fetching and decoding upstream data
#[derive(Error, Debug)]
pub enum LakeError {
    /// HTTP request failed (connect, timeout, body read)
    #[cfg(feature = "api")]
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("HTTP request to {url} failed with status {status}")]
    HttpStatus { url: String, status: u16 },

    /// The lake source could not be set up
    #[error("Lake source unavailable: {0}")]
    Unavailable(String),

    /// Weather API key was not configured
    #[error("Weather API key is not set")]
    MissingApiKey,

    /// Failed to decode a JSON payload
    #[error("Failed to decode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Type alias for Results using LakeError
pub type Result<T> = std::result::Result<T, LakeError>;
