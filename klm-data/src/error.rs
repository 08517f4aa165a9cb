use thiserror::Error;

/// Errors preparing history for charting
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DataError {
    /// A required column is not in the header
    #[error("History has no '{0}' column")]
    MissingColumn(String),

    /// Every row lacked a usable date or level
    #[error("No valid lake level data found")]
    NoLevelData,
}

pub type Result<T> = std::result::Result<T, DataError>;
