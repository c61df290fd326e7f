//! # Red Connect Runtime Library
//!
//! Exposes the runtime's modules for the binary and the integration suite.
//! The entry point is `main.rs`.
//!
//! ## Layout
//!
//! - `container/` - Configuration and the service container
//! - `adapters/` - Production implementations of shared ports
//! - `handlers/` - Relay consumers and publishers (SOS, inventory)
//! - `flows/` - Multi-step user flows spanning OTP and registry

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod adapters;
pub mod container;
pub mod errors;
pub mod flows;
pub mod handlers;
pub mod runtime;

pub use container::{ConfigError, RuntimeConfig, ServiceContainer, StorageBackend};
pub use errors::RuntimeError;
pub use runtime::RedConnectRuntime;
