//! Error types for leaderboard persistence.

use thiserror::Error;

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;

/// Errors that can occur while reading or writing the leaderboard file.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// File could not be read, written or moved into place.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid JSON or does not have the leaderboard layout.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// File parsed but its contents cannot form a registry (e.g. a name listed twice).
    #[error("Data corruption: {0}")]
    Corruption(String),
}

impl PersistenceError {
    /// Create a new corruption error.
    pub fn corruption(msg: impl Into<String>) -> Self {
        Self::Corruption(msg.into())
    }

    /// Whether loading failed because of the file's contents rather than I/O.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Serialization(_) | Self::Corruption(_))
    }
}
