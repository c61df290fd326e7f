//! OTP records over the shared key-value store.
//!
//! All records live in one JSON object under `redconnect_otp_relay`, keyed
//! by email. Every write reloads the map first; concurrent writers from
//! other contexts are not isolated and the last write wins.

use std::collections::BTreeMap;

use shared_types::store::{load_json, save_json};
use shared_types::{KeyValueStore, StoreError, StoreKey};

use crate::domain::entities::OtpRecord;
use crate::ports::outbound::OtpRecordStore;

type RecordMap = BTreeMap<String, OtpRecord>;

/// [`OtpRecordStore`] backed by any [`KeyValueStore`].
#[derive(Debug)]
pub struct KvOtpRecordStore<S> {
    store: S,
}

impl<S: KeyValueStore> KvOtpRecordStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn read_all(&self) -> Result<RecordMap, StoreError> {
        Ok(load_json(&self.store, StoreKey::OtpRecords)?.unwrap_or_default())
    }

    fn write_all(&self, records: &RecordMap) -> Result<(), StoreError> {
        save_json(&self.store, StoreKey::OtpRecords, records)
    }
}

impl<S: KeyValueStore> OtpRecordStore for KvOtpRecordStore<S> {
    fn load(&self, email: &str) -> Result<Option<OtpRecord>, StoreError> {
        Ok(self.read_all()?.remove(email))
    }

    fn save(&self, email: &str, record: &OtpRecord) -> Result<(), StoreError> {
        let mut records = self.read_all()?;
        records.insert(email.to_string(), record.clone());
        self.write_all(&records)
    }

    fn remove(&self, email: &str) -> Result<(), StoreError> {
        let mut records = self.read_all()?;
        if records.remove(email).is_some() {
            self.write_all(&records)?;
        }
        Ok(())
    }
}
