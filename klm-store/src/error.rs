/// Error types for the history stores
use thiserror::Error;

/// Main error type for history store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Local file access failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to read or write CSV data
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// The spreadsheet API answered with a non-success status
    #[error("Request to {url} failed with status {status}: {body}")]
    HttpStatus {
        url: String,
        status: u16,
        body: String,
    },

    /// Service account credentials are missing or malformed
    #[error("Credential error: {0}")]
    Credentials(String),

    /// The token endpoint rejected the service account assertion
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Signing the service account assertion failed
    #[error("Failed to sign token assertion: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Failed to decode base64 credentials
    #[error("Failed to decode base64 credentials: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Failed to decode JSON
    #[error("Failed to decode JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Could not build a request URL
    #[error("Invalid URL: {0}")]
    Url(String),
}

/// Type alias for Results using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;
