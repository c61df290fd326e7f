//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// A digest string is not 64 lowercase hex characters.
    #[error("Invalid hex digest: {0}")]
    InvalidDigest(String),
}
