//! # Inbound Ports (Driving Ports / API)

use shared_types::{
    AuthenticatedUser, BloodBank, Donor, Hospital, Institution, InstitutionKind, Inventory,
    UserRole,
};

use crate::domain::errors::RegistryError;

/// Which collections a seeding pass wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub donors: bool,
    pub blood_banks: bool,
    pub hospitals: bool,
}

impl SeedReport {
    #[must_use]
    pub fn any(&self) -> bool {
        self.donors || self.blood_banks || self.hospitals
    }
}

/// Registry API.
///
/// Collections are newest-first: saving prepends.
pub trait RegistryApi: Send + Sync {
    /// Write demo records for every collection that was never stored.
    fn seed_if_empty(&self) -> Result<SeedReport, RegistryError>;

    fn donors(&self) -> Result<Vec<Donor>, RegistryError>;

    fn save_donor(&self, donor: Donor) -> Result<(), RegistryError>;

    /// Remove a donor. Returns whether one was removed.
    fn delete_donor(&self, id: &str) -> Result<bool, RegistryError>;

    fn blood_banks(&self) -> Result<Vec<BloodBank>, RegistryError>;

    fn hospitals(&self) -> Result<Vec<Hospital>, RegistryError>;

    fn save_blood_bank(&self, bank: BloodBank) -> Result<(), RegistryError>;

    fn save_hospital(&self, hospital: Hospital) -> Result<(), RegistryError>;

    /// Replace a bank's stock. `None` if no bank has that id.
    fn update_inventory(
        &self,
        bank_id: &str,
        inventory: Inventory,
    ) -> Result<Option<BloodBank>, RegistryError>;

    fn institution_profile(
        &self,
        id: &str,
        kind: InstitutionKind,
    ) -> Result<Option<Institution>, RegistryError>;

    /// Match credentials for `role`. `None` when nothing matches.
    fn authenticate(
        &self,
        email: &str,
        key: &str,
        role: UserRole,
    ) -> Result<Option<AuthenticatedUser>, RegistryError>;
}
