//! # Domain Layer
//!
//! Credential rules, first-run seed data and registry errors.

pub mod credentials;
pub mod errors;
pub mod seed;
