//! # SOS Handling
//!
//! Publishing side: hospitals raise an SOS or a regular request, which is
//! broadcast as `GLOBAL_SOS` to every other context.
//!
//! Receiving side: [`SosNotifier`] turns relay traffic into feed entries.
//!
//! ```text
//! Hospital context ──GLOBAL_SOS──→ Relay ──→ SosNotifier ──→ NotificationFeed
//!                                                   └──→ incoming requests
//! ```

use std::sync::Arc;

use chrono::Utc;
use shared_relay::{NetworkRelay, RelayEvent, RelayFilter, RelaySubscription, SosPayload};
use shared_types::{AuthenticatedUser, BloodType, Coordinates, EmergencyRequest, Urgency, UserRole};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::handlers::notifications::{NotificationFeed, NotificationKind};

const SOS_LOCATION: &str = "Emergency Wing";
const REQUEST_LOCATION: &str = "Main Unit";

/// Only hospitals may broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Only hospital accounts can broadcast emergency requests (signed in as {role})")]
pub struct NotAHospital {
    pub role: UserRole,
}

fn require_hospital(user: &AuthenticatedUser) -> Result<(), NotAHospital> {
    if user.role == UserRole::Hospital {
        Ok(())
    } else {
        Err(NotAHospital { role: user.role })
    }
}

/// Broadcast a one-tap SOS: a critical request for 3 units of O-.
///
/// # Errors
/// [`NotAHospital`] unless `hospital` signed in as a hospital.
pub fn broadcast_sos(
    relay: &NetworkRelay,
    hospital: &AuthenticatedUser,
    coordinates: Option<Coordinates>,
) -> Result<EmergencyRequest, NotAHospital> {
    require_hospital(hospital)?;

    let request = EmergencyRequest {
        id: format!("sos-{}", Utc::now().timestamp_millis()),
        patient_name: "CRITICAL CASE".to_string(),
        admission_number: None,
        dob: None,
        blood_type: BloodType::ONegative,
        units_needed: 3,
        location: SOS_LOCATION.to_string(),
        hospital: hospital.name.clone(),
        urgency: Urgency::Critical,
        is_platelet_request: false,
        contact: "Emergency Desk".to_string(),
        timestamp: "Just now".to_string(),
        coordinates,
    };

    relay.publish(RelayEvent::GlobalSos(SosPayload {
        hospital_name: hospital.name.clone(),
        location: SOS_LOCATION.to_string(),
        timestamp: Utc::now().format("%H:%M:%S").to_string(),
        request: request.clone(),
    }));
    warn!(
        request_id = %request.id,
        hospital = %hospital.name,
        "SOS broadcast to network"
    );
    Ok(request)
}

/// Fields a hospital fills in for a regular request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDraft {
    pub patient_name: String,
    pub blood_type: BloodType,
    pub units_needed: u32,
    pub urgency: Option<Urgency>,
    pub is_platelet_request: bool,
}

/// Broadcast a regular request raised from the request form.
///
/// # Errors
/// [`NotAHospital`] unless `hospital` signed in as a hospital.
pub fn broadcast_request(
    relay: &NetworkRelay,
    hospital: &AuthenticatedUser,
    draft: RequestDraft,
    coordinates: Option<Coordinates>,
) -> Result<EmergencyRequest, NotAHospital> {
    require_hospital(hospital)?;

    let request = EmergencyRequest {
        id: format!("req-{}", Utc::now().timestamp_millis()),
        patient_name: draft.patient_name,
        admission_number: None,
        dob: None,
        blood_type: draft.blood_type,
        units_needed: draft.units_needed,
        location: REQUEST_LOCATION.to_string(),
        hospital: hospital.name.clone(),
        urgency: draft.urgency.unwrap_or(Urgency::Normal),
        is_platelet_request: draft.is_platelet_request,
        contact: "Desk".to_string(),
        timestamp: "Just now".to_string(),
        coordinates,
    };

    relay.publish(RelayEvent::GlobalSos(SosPayload {
        hospital_name: hospital.name.clone(),
        location: REQUEST_LOCATION.to_string(),
        timestamp: "Now".to_string(),
        request: request.clone(),
    }));
    info!(
        request_id = %request.id,
        blood_type = %request.blood_type,
        units = request.units_needed,
        "Request broadcast to network"
    );
    Ok(request)
}

/// Feed text and presentation for a relay event.
#[must_use]
pub fn describe(event: &RelayEvent) -> (String, NotificationKind) {
    match event {
        RelayEvent::GlobalSos(sos) => (
            format!(
                "URGENT SOS: {} needs {} immediately!",
                sos.hospital_name, sos.request.blood_type
            ),
            NotificationKind::Alert,
        ),
        RelayEvent::InventoryAlert(alert) => (
            format!(
                "{} reports {} stock {}.",
                alert.bank_name, alert.blood_type, alert.status
            ),
            NotificationKind::Info,
        ),
        RelayEvent::BroadcastMessage(msg) => {
            (format!("{}: {}", msg.from, msg.message), NotificationKind::Info)
        }
    }
}

/// Consumes relay traffic for one context and fills the feed.
pub struct SosNotifier {
    subscription: RelaySubscription,
    feed: Arc<NotificationFeed>,
}

impl SosNotifier {
    /// Subscribe on `relay`. Events published before this call are not seen.
    pub fn new(relay: &NetworkRelay, feed: Arc<NotificationFeed>) -> Self {
        Self {
            subscription: relay.subscription(RelayFilter::all()),
            feed,
        }
    }

    /// Run until the channel closes.
    pub async fn run(mut self) {
        info!("SOS notifier started");
        while let Some(event) = self.subscription.recv().await {
            handle_event(&self.feed, event);
        }
        info!("Relay channel closed, SOS notifier exiting");
    }

    /// Process everything already queued without waiting.
    ///
    /// Returns the number of events handled.
    pub fn drain(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(Some(event)) = self.subscription.try_recv() {
            handle_event(&self.feed, event);
            handled += 1;
        }
        handled
    }
}

fn handle_event(feed: &NotificationFeed, event: RelayEvent) {
    let (text, kind) = describe(&event);
    match kind {
        NotificationKind::Alert => warn!(event = event.type_tag(), "{text}"),
        _ => debug!(event = event.type_tag(), "{text}"),
    }
    if let RelayEvent::GlobalSos(sos) = event {
        feed.push_request(sos.request);
    }
    feed.push(text, kind);
}
