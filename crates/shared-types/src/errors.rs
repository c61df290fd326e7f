//! # Error Types
//!
//! Errors shared by every crate that touches entities or the store.

use thiserror::Error;

/// Failure to parse an entity from its display label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseEntityError {
    #[error("Unknown blood type: {0}")]
    UnknownBloodType(String),
}

/// Errors raised by a [`KeyValueStore`](crate::KeyValueStore) or by the JSON
/// encoding of the values kept in it.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The backing medium could not be read or written.
    #[error("Store backend error: {0}")]
    Backend(String),

    /// A stored value is not valid JSON for the expected shape.
    #[error("Corrupt value under key {key}: {reason}")]
    Corrupt { key: String, reason: String },

    /// A value could not be encoded for storage.
    #[error("Failed to encode value for key {key}: {reason}")]
    Encode { key: String, reason: String },
}
