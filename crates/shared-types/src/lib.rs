//! # Shared Types Crate
//!
//! Domain entities and the persistence port shared by every Red Connect crate.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: donors, institutions and emergency requests
//!   are defined once here and serialised with the same camelCase shape
//!   everywhere (store, relay payloads, runtime feed).
//! - **Injected Persistence**: nothing reaches a process-wide store. Every
//!   consumer receives a [`KeyValueStore`] and namespaces its own keys.

pub mod entities;
pub mod errors;
pub mod store;

pub use entities::*;
pub use errors::*;
pub use store::{InMemoryKeyValueStore, KeyValueStore, StoreKey};

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;
