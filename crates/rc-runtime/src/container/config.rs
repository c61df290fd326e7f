//! # Runtime Configuration
//!
//! Defaults suit a local single-process run. Every field can be overridden
//! from the environment; see [`RuntimeConfig::from_env`].

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rc_01_otp_verification::OtpConfig;
use shared_relay::DEFAULT_CHANNEL_NAME;
use thiserror::Error;

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// OTP timings and attempt budget.
    pub otp: OtpConfig,
    /// Relay channel settings.
    pub relay: RelayConfig,
    /// Where the key-value store lives.
    pub storage: StorageBackend,
    /// Operator notification feed.
    pub notifications: NotificationConfig,
}

/// Relay channel settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Channel every context joins.
    pub channel: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            channel: DEFAULT_CHANNEL_NAME.to_string(),
        }
    }
}

/// Backing medium for the key-value store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process memory; nothing survives a restart.
    #[default]
    Memory,
    /// One file per key under this directory.
    File(PathBuf),
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("memory") {
            return Ok(Self::Memory);
        }
        match raw.strip_prefix("file:") {
            Some(dir) if !dir.trim().is_empty() => Ok(Self::File(PathBuf::from(dir.trim()))),
            _ => Err(ConfigError::InvalidVar {
                var: "RC_STORAGE",
                value: raw.to_string(),
                expected: "memory or file:<dir>",
            }),
        }
    }
}

/// Operator notification feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationConfig {
    /// Entries kept before the oldest are dropped.
    pub feed_limit: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { feed_limit: 50 }
    }
}

impl RuntimeConfig {
    /// Defaults overridden from process environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `RC_OTP_TTL_SECS`, `RC_OTP_COOLDOWN_SECS`, `RC_OTP_MAX_ATTEMPTS`
    /// - `RC_RELAY_CHANNEL`
    /// - `RC_STORAGE` (`memory` or `file:<dir>`)
    /// - `RC_NOTIFICATION_FEED_LIMIT`
    ///
    /// # Errors
    /// `ConfigError::InvalidVar` for a value that does not parse, or any
    /// [`RuntimeConfig::validate`] failure.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`RuntimeConfig::from_env`] over an arbitrary lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(secs) = parse_var::<u64>(&lookup, "RC_OTP_TTL_SECS", "seconds")? {
            config.otp = config.otp.with_code_ttl(Duration::from_secs(secs));
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "RC_OTP_COOLDOWN_SECS", "seconds")? {
            config.otp = config.otp.with_resend_cooldown(Duration::from_secs(secs));
        }
        if let Some(max) = parse_var::<u32>(&lookup, "RC_OTP_MAX_ATTEMPTS", "attempt count")? {
            config.otp = config.otp.with_max_attempts(max);
        }
        if let Some(channel) = lookup("RC_RELAY_CHANNEL") {
            config.relay.channel = channel.trim().to_string();
        }
        if let Some(storage) = lookup("RC_STORAGE") {
            config.storage = storage.parse()?;
        }
        if let Some(limit) =
            parse_var::<usize>(&lookup, "RC_NOTIFICATION_FEED_LIMIT", "entry count")?
        {
            config.notifications.feed_limit = limit;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    /// The first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.otp.validate()?;
        if self.relay.channel.is_empty() {
            return Err(ConfigError::Empty {
                field: "relay.channel",
            });
        }
        if self.notifications.feed_limit == 0 {
            return Err(ConfigError::Empty {
                field: "notifications.feed_limit",
            });
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(
    lookup: &dyn Fn(&str) -> Option<String>,
    var: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::InvalidVar {
            var,
            value: raw,
            expected,
        })
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var}={value:?} is not valid, expected {expected}")]
    InvalidVar {
        var: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("{field} must not be empty or zero")]
    Empty { field: &'static str },

    #[error(transparent)]
    Otp(#[from] rc_01_otp_verification::ConfigError),
}
