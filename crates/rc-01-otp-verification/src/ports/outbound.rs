//! # Outbound Ports (Driven Ports / SPI)
//!
//! Dependencies the OTP service needs from its environment.

use async_trait::async_trait;
use shared_crypto::HexDigest;
use shared_types::{StoreError, Timestamp};
use thiserror::Error;

use crate::domain::entities::{MailMessage, OtpRecord};

/// Persistence for OTP records, keyed by normalised email.
///
/// Each call is its own read-modify-write; two contexts interleaving on the
/// same email can overwrite each other.
pub trait OtpRecordStore: Send + Sync {
    fn load(&self, email: &str) -> Result<Option<OtpRecord>, StoreError>;

    /// Insert or replace the record for `email`.
    fn save(&self, email: &str, record: &OtpRecord) -> Result<(), StoreError>;

    /// Remove the record for `email`. Absent is not an error.
    fn remove(&self, email: &str) -> Result<(), StoreError>;
}

/// One-way digest applied to codes before they are stored.
pub trait CodeDigest: Send + Sync {
    fn digest(&self, code: &str) -> HexDigest;
}

/// Error from a mailbox delivery.
#[derive(Debug, Clone, Error)]
pub enum MailboxError {
    /// The mailbox cannot accept messages at all.
    #[error("Mailbox unavailable: {0}")]
    Unavailable(String),

    /// The mailbox refused this message.
    #[error("Message rejected: {reason}")]
    Rejected { reason: String },
}

/// Delivers the plaintext code to its owner.
#[async_trait]
pub trait CodeMailbox: Send + Sync {
    async fn deliver(&self, message: MailMessage) -> Result<(), MailboxError>;
}

/// Source of numeric codes.
pub trait CodeGenerator: Send + Sync {
    /// A code in `CODE_MIN..=CODE_MAX`.
    fn generate(&self) -> u32;
}

/// Time source for consistent timestamp handling.
pub trait TimeSource: Send + Sync {
    /// Returns the current timestamp in milliseconds.
    fn now(&self) -> Timestamp;
}
