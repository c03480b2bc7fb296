//! Error types for teamsheet-store

use thiserror::Error;

/// Errors that can occur in the alias persistence layer
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing store could not be reached (network, missing file,
    /// non-success status). Callers fall back to the last good snapshot.
    #[error("alias store unavailable: {0}")]
    Unavailable(String),

    /// The mapping payload could not be encoded or decoded
    #[error("mapping serialization failed: {0}")]
    Serialization(String),

    /// Local snapshot file error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
