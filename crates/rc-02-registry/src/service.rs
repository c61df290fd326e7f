//! # Registry Service
//!
//! Implements [`RegistryApi`] over a shared [`KeyValueStore`]. Each
//! collection is one JSON array under its own key; every mutation reloads
//! the array, edits it and writes it back whole.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::store::{load_json, save_json};
use shared_types::{
    AuthenticatedUser, BloodBank, Donor, Hospital, Institution, InstitutionKind, Inventory,
    KeyValueStore, StoreKey, UserRole,
};
use tracing::{debug, info};

use crate::domain::credentials;
use crate::domain::errors::RegistryError;
use crate::domain::seed;
use crate::ports::inbound::{RegistryApi, SeedReport};

/// Registry over a key-value store.
pub struct RegistryService {
    store: Arc<dyn KeyValueStore>,
}

impl RegistryService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn load<T: DeserializeOwned>(&self, key: StoreKey) -> Result<Vec<T>, RegistryError> {
        Ok(load_json(self.store.as_ref(), key)?.unwrap_or_default())
    }

    fn store_all<T: Serialize>(&self, key: StoreKey, items: &[T]) -> Result<(), RegistryError> {
        save_json(self.store.as_ref(), key, items)?;
        Ok(())
    }

    fn prepend<T: Serialize + DeserializeOwned>(
        &self,
        key: StoreKey,
        item: T,
    ) -> Result<(), RegistryError> {
        let mut items: Vec<T> = self.load(key)?;
        items.insert(0, item);
        self.store_all(key, &items)
    }

    fn seed_key<T: Serialize>(
        &self,
        key: StoreKey,
        items: impl FnOnce() -> Vec<T>,
    ) -> Result<bool, RegistryError> {
        if self.store.get(key)?.is_some() {
            return Ok(false);
        }
        let items = items();
        self.store_all(key, &items)?;
        info!(key = %key, records = items.len(), "Seeded registry collection");
        Ok(true)
    }
}

impl RegistryApi for RegistryService {
    fn seed_if_empty(&self) -> Result<SeedReport, RegistryError> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        Ok(SeedReport {
            donors: self.seed_key(StoreKey::Donors, seed::donors)?,
            blood_banks: self.seed_key(StoreKey::BloodBanks, || seed::blood_banks(&now))?,
            hospitals: self.seed_key(StoreKey::Hospitals, seed::hospitals)?,
        })
    }

    fn donors(&self) -> Result<Vec<Donor>, RegistryError> {
        self.load(StoreKey::Donors)
    }

    fn save_donor(&self, donor: Donor) -> Result<(), RegistryError> {
        debug!(donor_id = %donor.id, "Saving donor");
        self.prepend(StoreKey::Donors, donor)
    }

    fn delete_donor(&self, id: &str) -> Result<bool, RegistryError> {
        let mut donors = self.donors()?;
        let before = donors.len();
        donors.retain(|d| d.id != id);
        if donors.len() == before {
            return Ok(false);
        }
        self.store_all(StoreKey::Donors, &donors)?;
        info!(donor_id = id, "Donor removed");
        Ok(true)
    }

    fn blood_banks(&self) -> Result<Vec<BloodBank>, RegistryError> {
        self.load(StoreKey::BloodBanks)
    }

    fn hospitals(&self) -> Result<Vec<Hospital>, RegistryError> {
        self.load(StoreKey::Hospitals)
    }

    fn save_blood_bank(&self, bank: BloodBank) -> Result<(), RegistryError> {
        debug!(bank_id = %bank.id, "Saving blood bank");
        self.prepend(StoreKey::BloodBanks, bank)
    }

    fn save_hospital(&self, hospital: Hospital) -> Result<(), RegistryError> {
        debug!(hospital_id = %hospital.id, "Saving hospital");
        self.prepend(StoreKey::Hospitals, hospital)
    }

    fn update_inventory(
        &self,
        bank_id: &str,
        inventory: Inventory,
    ) -> Result<Option<BloodBank>, RegistryError> {
        let mut banks = self.blood_banks()?;
        let Some(bank) = banks.iter_mut().find(|b| b.id == bank_id) else {
            return Ok(None);
        };
        bank.inventory = inventory;
        bank.last_sync = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let updated = bank.clone();
        self.store_all(StoreKey::BloodBanks, &banks)?;
        debug!(bank_id, total_units = updated.inventory.total_units(), "Inventory updated");
        Ok(Some(updated))
    }

    fn institution_profile(
        &self,
        id: &str,
        kind: InstitutionKind,
    ) -> Result<Option<Institution>, RegistryError> {
        let profile = match kind {
            InstitutionKind::BloodBank => self
                .blood_banks()?
                .into_iter()
                .find(|b| b.id == id)
                .map(Institution::BloodBank),
            InstitutionKind::Hospital => self
                .hospitals()?
                .into_iter()
                .find(|h| h.id == id)
                .map(Institution::Hospital),
        };
        Ok(profile)
    }

    fn authenticate(
        &self,
        email: &str,
        key: &str,
        role: UserRole,
    ) -> Result<Option<AuthenticatedUser>, RegistryError> {
        let user = match role {
            UserRole::Donor => self
                .donors()?
                .iter()
                .find(|d| credentials::donor_matches(d, email, key))
                .map(credentials::donor_session),
            UserRole::BloodBank => self
                .blood_banks()?
                .iter()
                .find(|b| credentials::bank_matches(b, email, key))
                .map(credentials::bank_session),
            UserRole::Hospital => self
                .hospitals()?
                .iter()
                .find(|h| credentials::hospital_matches(h, email, key))
                .map(credentials::hospital_session),
        };

        match &user {
            Some(user) => info!(user_id = %user.id, role = %role, "Credentials accepted"),
            None => debug!(role = %role, "Credentials rejected"),
        }
        Ok(user)
    }
}
