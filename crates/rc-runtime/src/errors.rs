//! Runtime error types.

use rc_01_otp_verification::{ConfigError as OtpConfigError, OtpError};
use rc_02_registry::RegistryError;
use shared_relay::RelayError;
use shared_types::StoreError;
use thiserror::Error;

use crate::container::ConfigError;

/// Errors raised while building or running the runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid OTP configuration: {0}")]
    OtpConfig(#[from] OtpConfigError),

    #[error("Storage unavailable: {0}")]
    Storage(#[from] StoreError),

    #[error("Registry failure: {0}")]
    Registry(#[from] RegistryError),

    #[error("Relay failure: {0}")]
    Relay(#[from] RelayError),
}

/// Errors surfaced by the onboarding flow.
#[derive(Debug, Error)]
pub enum OnboardingError {
    /// The code step failed; carries the user-facing message.
    #[error(transparent)]
    Otp(#[from] OtpError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Invalid credentials for {role}.")]
    InvalidCredentials { role: shared_types::UserRole },

    #[error("An account with this email already exists.")]
    EmailTaken,

    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },
}
