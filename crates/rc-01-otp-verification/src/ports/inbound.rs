//! # Inbound Ports (Driving Ports / API)

use async_trait::async_trait;

use crate::domain::entities::{IssueReceipt, VerificationState};
use crate::domain::errors::OtpError;

/// Primary OTP API.
///
/// Emails are trimmed and lowercased before use, so `" A@B.C"` and `"a@b.c"`
/// address the same record.
#[async_trait]
pub trait OtpVerificationApi: Send + Sync {
    /// Issue a fresh code and hand it to the mailbox.
    ///
    /// # Errors
    /// * `OtpError::InvalidEmail` - Email empty after trimming
    /// * `OtpError::CooldownActive` - Previous code issued too recently
    /// * `OtpError::Store` - Record could not be persisted
    ///
    /// A mailbox failure is logged, not returned.
    async fn issue_code(&self, email: &str) -> Result<IssueReceipt, OtpError>;

    /// Check a candidate code. Success consumes the record.
    ///
    /// # Errors
    /// * `OtpError::SessionExpired` - Nothing outstanding
    /// * `OtpError::CodeExpired` - Window passed, record removed
    /// * `OtpError::TooManyAttempts` - Budget exhausted, record removed
    /// * `OtpError::InvalidCode` - Mismatch, one attempt counted
    async fn verify_code(&self, email: &str, candidate: &str) -> Result<(), OtpError>;

    /// Inspect the state for an email without side effects.
    async fn state(&self, email: &str) -> Result<VerificationState, OtpError>;
}
