//! Stock classification and availability search.

use std::fmt;

use serde::{Deserialize, Serialize};
use shared_types::{BloodBank, BloodType, Coordinates, Inventory};

use crate::geo::distance_km;

/// Below this many units a blood type is flagged critical.
pub const CRITICAL_THRESHOLD: u32 = 5;

/// How much of one blood type a bank (or the network) holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockLevel {
    Out,
    Critical,
    Adequate,
}

impl StockLevel {
    #[must_use]
    pub fn classify(units: u32) -> Self {
        match units {
            0 => Self::Out,
            n if n < CRITICAL_THRESHOLD => Self::Critical,
            _ => Self::Adequate,
        }
    }

    #[must_use]
    pub fn needs_attention(&self) -> bool {
        !matches!(self, Self::Adequate)
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Out => "Out",
            Self::Critical => "Critical",
            Self::Adequate => "Adequate",
        }
    }
}

impl fmt::Display for StockLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Network-wide units per blood type.
#[must_use]
pub fn aggregate_inventory(banks: &[BloodBank]) -> Inventory {
    let mut total = Inventory::default();
    for bank in banks {
        for (blood_type, units) in bank.inventory.iter() {
            total.add_units(blood_type, units);
        }
    }
    total
}

/// Blood types of one bank that are out or critical, in display order.
#[must_use]
pub fn critical_stock(bank: &BloodBank) -> Vec<(BloodType, StockLevel)> {
    bank.inventory
        .iter()
        .map(|(blood_type, units)| (blood_type, StockLevel::classify(units)))
        .filter(|(_, level)| level.needs_attention())
        .collect()
}

/// A bank able to cover a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAvailability {
    pub bank_id: String,
    pub bank_name: String,
    pub units: u32,
    pub distance_km: f64,
}

/// Banks holding at least `units` of `blood_type`, nearest first.
#[must_use]
pub fn banks_with_stock(
    banks: &[BloodBank],
    blood_type: BloodType,
    units: u32,
    origin: Coordinates,
) -> Vec<BankAvailability> {
    let mut found: Vec<BankAvailability> = banks
        .iter()
        .filter(|bank| bank.inventory.units(blood_type) >= units)
        .map(|bank| BankAvailability {
            bank_id: bank.id.clone(),
            bank_name: bank.display_name().to_string(),
            units: bank.inventory.units(blood_type),
            distance_km: distance_km(origin, bank.location.coordinates()),
        })
        .collect();
    found.sort_by(|a, b| {
        a.distance_km
            .total_cmp(&b.distance_km)
            .then_with(|| a.bank_id.cmp(&b.bank_id))
    });
    found
}
