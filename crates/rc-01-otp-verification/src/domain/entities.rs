//! OTP domain entities.
//!
//! Every email moves through one small state machine:
//!
//! ```text
//! NONE ──issue──▶ PENDING ──match──────────▶ VERIFIED (record deleted)
//!                  │  ▲  ──past expiry────────▶ EXPIRED  (record deleted)
//!                  │  │  ──attempts exhausted─▶ LOCKED   (record deleted)
//!                  └──┘
//!          mismatch / resend after cooldown
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::Timestamp;

/// Smallest code ever issued.
pub const CODE_MIN: u32 = 100_000;

/// Largest code ever issued.
pub const CODE_MAX: u32 = 999_999;

/// Persisted state for one pending code.
///
/// Only the digest of the code is kept; the plaintext leaves the service
/// exclusively through the mailbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpRecord {
    /// Normalised address the code was issued for.
    pub email: String,
    /// Lowercase hex SHA-256 of the code.
    pub hash: String,
    /// Absolute expiry (ms).
    pub expires: Timestamp,
    /// Failed verifications so far.
    pub attempts: u32,
    /// No re-issue before this instant (ms).
    pub cooldown: Timestamp,
}

impl OtpRecord {
    /// Fresh record with zero attempts.
    #[must_use]
    pub fn new(email: String, hash: String, expires: Timestamp, cooldown: Timestamp) -> Self {
        Self {
            email,
            hash,
            expires,
            attempts: 0,
            cooldown,
        }
    }

    /// Expiry is exclusive: a code is still valid at exactly `expires`.
    #[must_use]
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now > self.expires
    }

    #[must_use]
    pub fn in_cooldown(&self, now: Timestamp) -> bool {
        now < self.cooldown
    }

    /// Whole seconds left in the cooldown, rounded up.
    #[must_use]
    pub fn cooldown_remaining_secs(&self, now: Timestamp) -> u64 {
        self.cooldown.saturating_sub(now).div_ceil(1000)
    }

    #[must_use]
    pub fn is_locked(&self, max_attempts: u32) -> bool {
        self.attempts >= max_attempts
    }
}

/// Returned by a successful issuance. Never carries the code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueReceipt {
    /// Normalised email the code was issued for.
    pub email: String,
    pub expires_at: Timestamp,
    pub cooldown_until: Timestamp,
}

/// What a caller can observe about an email without consuming anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationState {
    /// No code outstanding.
    None,
    /// A code is outstanding.
    Pending {
        attempts: u32,
        expires_at: Timestamp,
    },
    /// A code was issued but its window has passed. The record is removed
    /// on the next verification attempt.
    Expired,
}

/// The message handed to the mailbox.
#[derive(Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub email: String,
    /// Plaintext code. Only ever exists in this message.
    pub code: String,
    pub issued_at: DateTime<Utc>,
}

impl fmt::Debug for MailMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailMessage")
            .field("email", &self.email)
            .field("code", &"******")
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

/// Trim and lowercase an email. `None` if nothing is left.
#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Render a numeric code the way it is mailed and typed.
#[must_use]
pub fn format_code(code: u32) -> String {
    format!("{code:06}")
}
