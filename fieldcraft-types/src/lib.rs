//! Core identifier types for fieldcraft.
//!
//! This crate defines the small, host-agnostic types every other fieldcraft
//! crate shares:
//! - Record, attachment and taxonomy-term identifiers (host integer ids)
//! - Field keys (stable tree identity, independent of storage names)

mod ids;

pub use ids::{AttachmentId, FieldKey, RecordId, TermId};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing identifiers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid id: {0}")]
    InvalidId(#[from] std::num::ParseIntError),
}
