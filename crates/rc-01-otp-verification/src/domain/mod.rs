//! # Domain Layer
//!
//! Passcode records, the per-email state machine and configuration.
//! No I/O: everything here is driven by timestamps passed in.

pub mod config;
pub mod entities;
pub mod errors;
