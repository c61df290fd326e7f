//! # Runtime Adapters
//!
//! Production implementations of ports defined in shared crates.

pub mod file_store;

pub use file_store::FileKeyValueStore;
