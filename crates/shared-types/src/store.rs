//! # Key-Value Store Port
//!
//! The persistence collaborator: a string-to-string store addressed by a
//! fixed set of namespaced keys. Structured values are encoded as JSON by the
//! caller before they reach the store.
//!
//! The store is shared by every context of the same origin. Callers that do
//! read-modify-write cycles are not isolated from one another; the last
//! writer wins.
//!
//! Production: `FileKeyValueStore` (rc-runtime/adapters/file_store.rs)
//! Testing: [`InMemoryKeyValueStore`] (below)

use std::collections::HashMap;
use std::fmt;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::StoreError;

/// Namespaced keys used by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    /// Donor records (JSON array).
    Donors,
    /// Blood bank records (JSON array).
    BloodBanks,
    /// Hospital records (JSON array).
    Hospitals,
    /// Pending OTP records (JSON object keyed by email).
    OtpRecords,
}

impl StoreKey {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Donors => "redconnect_donor_db",
            Self::BloodBanks => "redconnect_bank_db",
            Self::Hospitals => "redconnect_hospital_db",
            Self::OtpRecords => "redconnect_otp_relay",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Abstract interface for the shared string store.
pub trait KeyValueStore: Send + Sync {
    /// Get the raw value for a key, `None` if never written.
    fn get(&self, key: StoreKey) -> Result<Option<String>, StoreError>;

    /// Overwrite the raw value for a key.
    fn set(&self, key: StoreKey, value: String) -> Result<(), StoreError>;
}

/// Read and decode a JSON value, `None` if the key is absent.
pub fn load_json<T, S>(store: &S, key: StoreKey) -> Result<Option<T>, StoreError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| StoreError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })
}

/// Encode and write a JSON value.
pub fn save_json<T, S>(store: &S, key: StoreKey, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|e| StoreError::Encode {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    store.set(key, raw)
}

/// In-memory store for tests and single-process runs.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    entries: RwLock<HashMap<StoreKey, String>>,
}

impl InMemoryKeyValueStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: StoreKey) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().get(&key).cloned())
    }

    fn set(&self, key: StoreKey, value: String) -> Result<(), StoreError> {
        tracing::trace!(key = %key, bytes = value.len(), "Store write");
        self.entries.write().insert(key, value);
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn get(&self, key: StoreKey) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: StoreKey, value: String) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}
