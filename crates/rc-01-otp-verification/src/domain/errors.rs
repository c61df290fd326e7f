//! # OTP Errors
//!
//! Display strings are the messages shown to the person verifying.

use shared_types::StoreError;
use thiserror::Error;

/// Errors returned by issuance and verification.
#[derive(Debug, Clone, Error)]
pub enum OtpError {
    /// A code was issued too recently for this email.
    #[error("Resend cooldown active.")]
    CooldownActive {
        /// Whole seconds until a new code may be issued.
        remaining_secs: u64,
    },

    /// No code is outstanding for this email.
    #[error("Session expired. Request new code.")]
    SessionExpired,

    /// The code's validity window has passed. The record is gone.
    #[error("OTP has expired.")]
    CodeExpired,

    /// The attempt budget was exhausted. The record is gone.
    #[error("Too many attempts. Safety block active.")]
    TooManyAttempts,

    /// Wrong code; the record stays with one more attempt counted.
    #[error("Invalid code. {remaining_attempts} tries left.")]
    InvalidCode { remaining_attempts: u32 },

    /// The email was empty after trimming.
    #[error("Email address is required.")]
    InvalidEmail,

    /// Persistence failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl OtpError {
    /// True for the outcomes that delete the record.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::CodeExpired | Self::TooManyAttempts)
    }
}

/// Rejected [`OtpConfig`](super::config::OtpConfig) values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("resend cooldown ({cooldown_secs}s) must be shorter than code lifetime ({ttl_secs}s)")]
    CooldownNotShorterThanTtl { cooldown_secs: u64, ttl_secs: u64 },
}
