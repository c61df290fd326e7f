//! # Relay Handlers
//!
//! Producers and consumers of relay events:
//!
//! 1. Hospital raises an SOS or request → `GLOBAL_SOS`
//! 2. Bank stock drops to critical or zero → `INVENTORY_ALERT`
//! 3. Every other context's [`SosNotifier`] turns events into feed entries

pub mod inventory;
pub mod notifications;
pub mod sos;

pub use inventory::InventoryMonitor;
pub use notifications::{Notification, NotificationFeed, NotificationKind};
pub use sos::{broadcast_request, broadcast_sos, describe, NotAHospital, RequestDraft, SosNotifier};
