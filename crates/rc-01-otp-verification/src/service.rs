//! # OTP Verification Service
//!
//! Application service that implements [`OtpVerificationApi`] over the
//! outbound ports.
//!
//! ## Flow
//!
//! ```text
//! issue_code:  normalise → cooldown check → generate → digest → save → mail
//! verify_code: normalise → load → expiry → lockout → digest → compare
//! ```
//!
//! Expiry and cooldown are evaluated lazily on the next call; nothing runs
//! in the background.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared_crypto::constant_time_eq;
use shared_types::Timestamp;
use tracing::{debug, info, warn};

use crate::adapters::{RandomCodeGenerator, Sha256CodeDigest, SystemTimeSource};
use crate::domain::config::OtpConfig;
use crate::domain::entities::{
    format_code, normalize_email, IssueReceipt, MailMessage, OtpRecord, VerificationState,
};
use crate::domain::errors::{ConfigError, OtpError};
use crate::ports::inbound::OtpVerificationApi;
use crate::ports::outbound::{CodeDigest, CodeGenerator, CodeMailbox, OtpRecordStore, TimeSource};

/// OTP service.
///
/// Holds no state of its own: every decision is made from the stored record
/// and the clock, so several instances over one store behave as one.
pub struct OtpVerificationService {
    config: OtpConfig,
    records: Arc<dyn OtpRecordStore>,
    mailbox: Arc<dyn CodeMailbox>,
    digest: Arc<dyn CodeDigest>,
    generator: Arc<dyn CodeGenerator>,
    clock: Arc<dyn TimeSource>,
}

impl OtpVerificationService {
    /// Create a service with SHA-256 digests, random codes and the system
    /// clock.
    ///
    /// # Errors
    /// `ConfigError` if `config` fails validation.
    pub fn new(
        config: OtpConfig,
        records: Arc<dyn OtpRecordStore>,
        mailbox: Arc<dyn CodeMailbox>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            records,
            mailbox,
            digest: Arc::new(Sha256CodeDigest),
            generator: Arc::new(RandomCodeGenerator),
            clock: Arc::new(SystemTimeSource),
        })
    }

    #[must_use]
    pub fn with_time_source(mut self, clock: Arc<dyn TimeSource>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_code_generator(mut self, generator: Arc<dyn CodeGenerator>) -> Self {
        self.generator = generator;
        self
    }

    #[must_use]
    pub fn with_digest(mut self, digest: Arc<dyn CodeDigest>) -> Self {
        self.digest = digest;
        self
    }

    #[must_use]
    pub fn config(&self) -> &OtpConfig {
        &self.config
    }

    fn discard(&self, email: &str) -> Result<(), OtpError> {
        self.records.remove(email)?;
        Ok(())
    }
}

#[async_trait]
impl OtpVerificationApi for OtpVerificationService {
    async fn issue_code(&self, email: &str) -> Result<IssueReceipt, OtpError> {
        let email = normalize_email(email).ok_or(OtpError::InvalidEmail)?;
        let now = self.clock.now();

        if let Some(existing) = self.records.load(&email)? {
            if existing.in_cooldown(now) {
                let remaining_secs = existing.cooldown_remaining_secs(now);
                debug!(email = %email, remaining_secs, "Issue rejected during cooldown");
                return Err(OtpError::CooldownActive { remaining_secs });
            }
        }

        let code = format_code(self.generator.generate());
        let record = OtpRecord::new(
            email.clone(),
            self.digest.digest(&code).into_string(),
            now.saturating_add(self.config.ttl_ms()),
            now.saturating_add(self.config.cooldown_ms()),
        );
        self.records.save(&email, &record)?;

        info!(
            email = %email,
            expires_at = record.expires,
            "Verification code issued"
        );

        let message = MailMessage {
            email: email.clone(),
            code,
            issued_at: to_datetime(now),
        };
        if let Err(e) = self.mailbox.deliver(message).await {
            warn!(email = %email, error = %e, "Verification code delivery failed");
        }

        Ok(IssueReceipt {
            email,
            expires_at: record.expires,
            cooldown_until: record.cooldown,
        })
    }

    async fn verify_code(&self, email: &str, candidate: &str) -> Result<(), OtpError> {
        let email = normalize_email(email).ok_or(OtpError::InvalidEmail)?;
        let Some(mut record) = self.records.load(&email)? else {
            return Err(OtpError::SessionExpired);
        };
        let now = self.clock.now();

        if record.is_expired(now) {
            self.discard(&email)?;
            info!(email = %email, "Verification code expired");
            return Err(OtpError::CodeExpired);
        }

        if record.is_locked(self.config.max_attempts) {
            self.discard(&email)?;
            warn!(
                email = %email,
                attempts = record.attempts,
                "Verification locked after repeated failures"
            );
            return Err(OtpError::TooManyAttempts);
        }

        let digest = self.digest.digest(candidate.trim());
        if constant_time_eq(digest.as_str().as_bytes(), record.hash.as_bytes()) {
            self.discard(&email)?;
            info!(email = %email, "Email verified");
            return Ok(());
        }

        record.attempts = record.attempts.saturating_add(1);
        self.records.save(&email, &record)?;

        let remaining_attempts = self.config.max_attempts.saturating_sub(record.attempts);
        warn!(
            email = %email,
            attempts = record.attempts,
            remaining_attempts,
            "Verification code mismatch"
        );
        Err(OtpError::InvalidCode { remaining_attempts })
    }

    async fn state(&self, email: &str) -> Result<VerificationState, OtpError> {
        let email = normalize_email(email).ok_or(OtpError::InvalidEmail)?;
        let state = match self.records.load(&email)? {
            None => VerificationState::None,
            Some(record) if record.is_expired(self.clock.now()) => VerificationState::Expired,
            Some(record) => VerificationState::Pending {
                attempts: record.attempts,
                expires_at: record.expires,
            },
        };
        Ok(state)
    }
}

fn to_datetime(ms: Timestamp) -> DateTime<Utc> {
    i64::try_from(ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .unwrap_or_else(Utc::now)
}
