//! # Ports Layer
//!
//! - **Inbound (Driving)**: [`inbound::RegistryApi`]
//! - **Outbound (Driven)**: [`shared_types::KeyValueStore`]

pub mod inbound;
