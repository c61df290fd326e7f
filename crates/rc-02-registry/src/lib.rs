//! # Registry Subsystem (RC-02)
//!
//! Donor, blood bank and hospital records kept in the shared key-value
//! store, first-run seeding and credential checks.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Credential rules, seed data, errors
//! - **Ports Layer** (`ports/`): [`RegistryApi`]; the store port lives in `shared-types`
//! - **Service Layer** (`service.rs`): [`RegistryService`]
//!
//! ## Security Notes
//!
//! - Secrets are compared in constant time
//! - Secrets are stored as given; this registry is a demo stand-in, not a
//!   credential vault

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::credentials::default_avatar;
pub use domain::errors::RegistryError;
pub use domain::seed::{SEED_DONOR_KEY, SEED_INSTITUTION_KEY};
pub use ports::inbound::{RegistryApi, SeedReport};
pub use service::RegistryService;
