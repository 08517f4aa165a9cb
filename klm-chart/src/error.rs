use std::path::PathBuf;
use thiserror::Error;

/// Errors producing the chart image
#[derive(Error, Debug)]
pub enum ChartError {
    /// No year had enough points for a line
    #[error("No year has enough data for a line, no chart")]
    NoLines,

    /// Plotting failed
    #[error("Drawing failed: {0}")]
    Draw(String),

    /// The file written is missing, empty or not a PNG
    #[error("Chart at {path} failed verification: {reason}")]
    Verify { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ChartError>;
