//! # Relay Events
//!
//! Every event that crosses the relay. The wire shape is a tagged object,
//! `{"type": "GLOBAL_SOS", "payload": {...}}`, so any context can decode
//! what another published.

use serde::{Deserialize, Serialize};
use shared_types::{BloodType, EmergencyRequest};

/// All events that can be published on the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelayEvent {
    /// A hospital needs blood now.
    GlobalSos(SosPayload),

    /// A bank's stock for one blood type changed state.
    InventoryAlert(InventoryAlertPayload),

    /// Free-form operator message.
    BroadcastMessage(BroadcastMessagePayload),
}

/// Snapshot of an emergency request and who raised it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SosPayload {
    pub hospital_name: String,
    pub location: String,
    pub timestamp: String,
    pub request: EmergencyRequest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryAlertPayload {
    pub bank_name: String,
    pub blood_type: BloodType,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MessageUrgency {
    #[default]
    Normal,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastMessagePayload {
    pub from: String,
    pub message: String,
    pub urgency: MessageUrgency,
}

impl RelayEvent {
    /// Get the kind of this event (for filtering).
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::GlobalSos(_) => EventKind::GlobalSos,
            Self::InventoryAlert(_) => EventKind::InventoryAlert,
            Self::BroadcastMessage(_) => EventKind::BroadcastMessage,
        }
    }

    /// Wire tag of this event.
    #[must_use]
    pub fn type_tag(&self) -> &'static str {
        self.kind().as_str()
    }
}

/// Discriminant of [`RelayEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    GlobalSos,
    InventoryAlert,
    BroadcastMessage,
}

impl EventKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GlobalSos => "GLOBAL_SOS",
            Self::InventoryAlert => "INVENTORY_ALERT",
            Self::BroadcastMessage => "BROADCAST_MESSAGE",
        }
    }
}

/// Filter for subscribing to specific event kinds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayFilter {
    /// Kinds to include. Empty means all kinds.
    pub kinds: Vec<EventKind>,
}

impl RelayFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific kinds.
    #[must_use]
    pub fn kinds(kinds: Vec<EventKind>) -> Self {
        Self { kinds }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &RelayEvent) -> bool {
        self.kinds.is_empty() || self.kinds.contains(&event.kind())
    }
}
