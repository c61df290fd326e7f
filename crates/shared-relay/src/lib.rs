//! # Shared Relay - Cross-Context Event Relay
//!
//! Lets independent contexts of one session (tabs or windows of the same
//! origin) notify each other of emergency broadcasts and inventory events.
//!
//! ## Delivery Model
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │  Context A   │                    │  Context B   │
//! │ NetworkRelay │    publish()       │ NetworkRelay │
//! │              │ ──────┐            │  listeners   │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │   RelayHub   │          │
//!                  │  (channel)   │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! - Events reach every listener registered in every *other* context at the
//!   instant of publishing. Nothing is buffered for late subscribers.
//! - Publish order is preserved; no acknowledgement, no retry.
//! - Each subscriber has its own unbounded queue, so a slow listener never
//!   misses an event.
//! - A context cannot be created without a usable transport: construction
//!   fails with [`RelayError::TransportUnavailable`].

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod error;
pub mod events;
pub mod hub;
pub mod relay;
pub mod subscriber;

// Re-export main types
pub use error::RelayError;
pub use events::{
    BroadcastMessagePayload, EventKind, InventoryAlertPayload, MessageUrgency, RelayEvent,
    RelayFilter, SosPayload,
};
pub use hub::RelayHub;
pub use relay::{ContextId, NetworkRelay};
pub use subscriber::{ListenerHandle, RelayStream, RelaySubscription};

/// Channel shared by every context of the application.
pub const DEFAULT_CHANNEL_NAME: &str = "red_connect_global_relay";
