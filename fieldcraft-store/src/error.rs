//! Error types for the collaborator stores.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors a host collaborator can report.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store cannot be reached (or its lock was poisoned).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The referenced record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The store did not answer in time.
    #[error("store timed out")]
    Timeout,

    /// Any other backend failure, carried as text.
    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub(crate) fn poisoned(what: &str) -> Self {
        Self::Unavailable(format!("{what} lock poisoned"))
    }
}
