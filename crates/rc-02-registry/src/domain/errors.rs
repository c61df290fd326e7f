use shared_types::StoreError;
use thiserror::Error;

/// Registry failures.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// A stored collection is not valid JSON for its record type.
    #[error("Registry data under {key} is corrupt: {reason}")]
    Corrupt { key: String, reason: String },

    /// Any other store failure.
    #[error("Registry store failure: {0}")]
    Store(StoreError),
}

impl From<StoreError> for RegistryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Corrupt { key, reason } => Self::Corrupt { key, reason },
            other => Self::Store(other),
        }
    }
}
