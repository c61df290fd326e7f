//! # Relay Errors

use thiserror::Error;

/// Errors from relay construction and subscriptions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// The same-origin transport cannot be used in this environment.
    ///
    /// Fatal to cross-context notifications for the session; callers should
    /// disable the feature rather than retry.
    #[error("Relay transport unavailable: {reason}")]
    TransportUnavailable { reason: String },

    /// The channel was closed (hub dropped).
    #[error("Relay channel closed")]
    Closed,
}

impl RelayError {
    pub(crate) fn unavailable(reason: impl Into<String>) -> Self {
        Self::TransportUnavailable {
            reason: reason.into(),
        }
    }
}
