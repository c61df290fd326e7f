//! # Matching (RC-03)
//!
//! Pure functions over registry data: who can give to whom, how far away
//! they are, which stock is running low, and which donors to call first.
//! No I/O and no clock.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod compatibility;
pub mod geo;
pub mod ranking;
pub mod stock;

pub use compatibility::{can_donate, compatible_donors, compatible_recipients};
pub use geo::{distance_km, haversine_km, EARTH_RADIUS_KM};
pub use ranking::{rank_donors, MatchRecommendation};
pub use stock::{
    aggregate_inventory, banks_with_stock, critical_stock, BankAvailability, StockLevel,
    CRITICAL_THRESHOLD,
};
