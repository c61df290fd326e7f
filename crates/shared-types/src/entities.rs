//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Blood**: `BloodType`, `Inventory`, `Urgency`
//! - **People & Institutions**: `Donor`, `BloodBank`, `Hospital`, `AuthenticatedUser`
//! - **Requests**: `EmergencyRequest`
//! - **Geography**: `Coordinates`, `Location`
//!
//! All structs serialise in camelCase so records written by one context can be
//! read by any other.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ParseEntityError;

// =============================================================================
// CLUSTER A: BLOOD
// =============================================================================

/// ABO/Rh blood group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodType {
    /// Every blood type, in display order.
    pub const ALL: [BloodType; 8] = [
        BloodType::APositive,
        BloodType::ANegative,
        BloodType::BPositive,
        BloodType::BNegative,
        BloodType::AbPositive,
        BloodType::AbNegative,
        BloodType::OPositive,
        BloodType::ONegative,
    ];

    /// Label used on the wire and in the UI (`"AB-"`).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::APositive => "A+",
            Self::ANegative => "A-",
            Self::BPositive => "B+",
            Self::BNegative => "B-",
            Self::AbPositive => "AB+",
            Self::AbNegative => "AB-",
            Self::OPositive => "O+",
            Self::ONegative => "O-",
        }
    }

    /// True for Rh-negative groups.
    #[must_use]
    pub fn is_rh_negative(&self) -> bool {
        matches!(
            self,
            Self::ANegative | Self::BNegative | Self::AbNegative | Self::ONegative
        )
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodType {
    type Err = ParseEntityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|bt| bt.as_str() == normalized)
            .ok_or_else(|| ParseEntityError::UnknownBloodType(s.to_string()))
    }
}

/// Units held per blood type.
///
/// A freshly created inventory lists all eight types at zero. Types missing
/// from a deserialised map read as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory(BTreeMap<BloodType, u32>);

impl Inventory {
    /// Units on hand for a blood type.
    #[must_use]
    pub fn units(&self, blood_type: BloodType) -> u32 {
        self.0.get(&blood_type).copied().unwrap_or(0)
    }

    /// Overwrite the unit count for a blood type.
    pub fn set_units(&mut self, blood_type: BloodType, units: u32) {
        self.0.insert(blood_type, units);
    }

    /// Builder-style variant of [`Inventory::set_units`].
    #[must_use]
    pub fn with_units(mut self, blood_type: BloodType, units: u32) -> Self {
        self.set_units(blood_type, units);
        self
    }

    /// Add units, saturating at `u32::MAX`.
    pub fn add_units(&mut self, blood_type: BloodType, units: u32) {
        let entry = self.0.entry(blood_type).or_insert(0);
        *entry = entry.saturating_add(units);
    }

    /// Iterate all eight types with their counts.
    pub fn iter(&self) -> impl Iterator<Item = (BloodType, u32)> + '_ {
        BloodType::ALL.into_iter().map(|bt| (bt, self.units(bt)))
    }

    /// Sum of all units.
    #[must_use]
    pub fn total_units(&self) -> u64 {
        self.iter().map(|(_, units)| u64::from(units)).sum()
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self(BloodType::ALL.into_iter().map(|bt| (bt, 0)).collect())
    }
}

/// Request urgency as shown in the emergency feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Urgency {
    Critical,
    High,
    #[default]
    Normal,
}

// =============================================================================
// CLUSTER B: GEOGRAPHY
// =============================================================================

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A point with a human-readable address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

impl Location {
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

// =============================================================================
// CLUSTER C: PEOPLE & INSTITUTIONS
// =============================================================================

/// Who is logged in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    Donor,
    BloodBank,
    Hospital,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Donor => "Donor",
            Self::BloodBank => "BloodBank",
            Self::Hospital => "Hospital",
        };
        f.write_str(label)
    }
}

/// The two institution registries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstitutionKind {
    BloodBank,
    Hospital,
}

impl From<InstitutionKind> for UserRole {
    fn from(kind: InstitutionKind) -> Self {
        match kind {
            InstitutionKind::BloodBank => UserRole::BloodBank,
            InstitutionKind::Hospital => UserRole::Hospital,
        }
    }
}

/// A registered donor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donor {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub blood_type: BloodType,
    /// ISO date of the last donation (`2024-09-15`).
    pub last_donation: String,
    /// Distance from the viewer in km, as last computed.
    pub distance: f64,
    pub phone: String,
    pub is_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_health_check: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units_donated_year: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donation_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permanent_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
}

impl Donor {
    /// Minimal available donor; optional fields start empty.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, blood_type: BloodType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            age: 0,
            blood_type,
            last_donation: String::new(),
            distance: 0.0,
            phone: String::new(),
            is_available: true,
            medical_history: None,
            last_health_check: None,
            id_number: None,
            id_verified: None,
            profile_picture: None,
            units_donated_year: None,
            donation_count: None,
            permanent_address: None,
            email: None,
            password: None,
            access_key: None,
        }
    }

    #[must_use]
    pub fn is_id_verified(&self) -> bool {
        self.id_verified.unwrap_or(false)
    }
}

/// Where a bank's stock figures come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BankSource {
    #[serde(rename = "e-Raktkosh")]
    ERaktkosh,
    WellSky,
    #[serde(rename = "UBLOOD")]
    UBlood,
    Local,
}

/// A blood bank and its stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodBank {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution_name: Option<String>,
    #[serde(default)]
    pub inventory: Inventory,
    #[serde(default)]
    pub platelets_count: u32,
    pub location: Location,
    pub source: BankSource,
    /// RFC 3339 timestamp of the last stock sync.
    pub last_sync: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
}

impl BloodBank {
    /// Name shown to users; prefers the registered institution name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.institution_name.as_deref().unwrap_or(&self.name)
    }
}

/// A hospital account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hospital {
    pub id: String,
    pub email: String,
    pub access_key: String,
    pub institution_name: String,
    pub location: Location,
}

/// Either kind of institution, as returned by profile lookups.
#[derive(Debug, Clone, PartialEq)]
pub enum Institution {
    BloodBank(BloodBank),
    Hospital(Hospital),
}

impl Institution {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::BloodBank(bank) => &bank.id,
            Self::Hospital(hospital) => &hospital.id,
        }
    }

    #[must_use]
    pub fn kind(&self) -> InstitutionKind {
        match self {
            Self::BloodBank(_) => InstitutionKind::BloodBank,
            Self::Hospital(_) => InstitutionKind::Hospital,
        }
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::BloodBank(bank) => bank.display_name(),
            Self::Hospital(hospital) => &hospital.institution_name,
        }
    }
}

/// The session identity after a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

// =============================================================================
// CLUSTER D: REQUESTS
// =============================================================================

/// A request for blood or platelets raised by a hospital.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyRequest {
    pub id: String,
    pub patient_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admission_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    pub blood_type: BloodType,
    pub units_needed: u32,
    pub location: String,
    pub hospital: String,
    pub urgency: Urgency,
    pub is_platelet_request: bool,
    pub contact: String,
    /// Display timestamp ("Just now", "2 hours ago", or a clock time).
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}
