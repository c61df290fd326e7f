//! OTP configuration and validation.
//!
//! ```ignore
//! let config = OtpConfig::default()
//!     .with_code_ttl(Duration::from_secs(120))
//!     .with_max_attempts(5);
//! config.validate()?;
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::errors::ConfigError;

/// Issuance and verification limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpConfig {
    /// How long a code stays valid.
    pub code_ttl: Duration,
    /// Minimum gap between two issuances for one email.
    pub resend_cooldown: Duration,
    /// Failed verifications allowed before lockout.
    pub max_attempts: u32,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_ttl: Duration::from_secs(5 * 60),
            resend_cooldown: Duration::from_secs(60),
            max_attempts: 3,
        }
    }
}

impl OtpConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.code_ttl.is_zero() {
            return Err(ConfigError::Zero { field: "code_ttl" });
        }
        if self.resend_cooldown.is_zero() {
            return Err(ConfigError::Zero {
                field: "resend_cooldown",
            });
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::Zero {
                field: "max_attempts",
            });
        }
        if self.resend_cooldown >= self.code_ttl {
            return Err(ConfigError::CooldownNotShorterThanTtl {
                cooldown_secs: self.resend_cooldown.as_secs(),
                ttl_secs: self.code_ttl.as_secs(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn with_code_ttl(mut self, ttl: Duration) -> Self {
        self.code_ttl = ttl;
        self
    }

    #[must_use]
    pub fn with_resend_cooldown(mut self, cooldown: Duration) -> Self {
        self.resend_cooldown = cooldown;
        self
    }

    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub(crate) fn ttl_ms(&self) -> u64 {
        duration_ms(self.code_ttl)
    }

    pub(crate) fn cooldown_ms(&self) -> u64 {
        duration_ms(self.resend_cooldown)
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
