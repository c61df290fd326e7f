//! Shared test fixtures.

use std::sync::Arc;
use std::time::Duration;

use rc_01_otp_verification::{
    ChannelMailbox, KvOtpRecordStore, MailMessage, ManualTimeSource, OtpConfig,
    OtpVerificationService,
};
use shared_relay::{RelayEvent, SosPayload};
use shared_types::{
    AuthenticatedUser, BloodType, EmergencyRequest, InMemoryKeyValueStore, Timestamp, Urgency,
    UserRole,
};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::timeout;

/// Fixed start time for deterministic clocks (2023-11-14T22:13:20Z).
pub const T0: Timestamp = 1_700_000_000_000;

/// OTP service over an in-memory store, a manual clock and a channel mailbox.
pub struct OtpHarness {
    pub service: OtpVerificationService,
    pub clock: Arc<ManualTimeSource>,
    pub store: Arc<InMemoryKeyValueStore>,
    pub inbox: UnboundedReceiver<MailMessage>,
}

impl OtpHarness {
    pub fn new() -> Self {
        Self::over_store(Arc::new(InMemoryKeyValueStore::new()), Arc::new(ManualTimeSource::new(T0)))
    }

    /// A second "context" sharing `store` and `clock` with another harness.
    pub fn over_store(store: Arc<InMemoryKeyValueStore>, clock: Arc<ManualTimeSource>) -> Self {
        let (mailbox, inbox) = ChannelMailbox::new();
        let service = OtpVerificationService::new(
            OtpConfig::default(),
            Arc::new(KvOtpRecordStore::new(Arc::clone(&store))),
            Arc::new(mailbox),
        )
        .expect("default config is valid")
        .with_time_source(clock.clone());
        Self {
            service,
            clock,
            store,
            inbox,
        }
    }

    /// The next message the mailbox received.
    pub async fn next_mail(&mut self) -> MailMessage {
        timeout(Duration::from_millis(200), self.inbox.recv())
            .await
            .expect("no mail within 200ms")
            .expect("mailbox closed")
    }

    /// The plaintext of the next delivered code.
    pub async fn next_code(&mut self) -> String {
        self.next_mail().await.code
    }

    pub fn advance(&self, by: Duration) {
        self.clock.advance(by);
    }
}

impl Default for OtpHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Any six-digit code other than `code`.
pub fn wrong_code(code: &str) -> String {
    if code == "100000" {
        "100001".to_string()
    } else {
        "100000".to_string()
    }
}

pub fn hospital_user() -> AuthenticatedUser {
    AuthenticatedUser {
        id: "h-default".into(),
        name: "General Hospital".into(),
        email: "hospital@test.com".into(),
        role: UserRole::Hospital,
        avatar: None,
    }
}

pub fn sos_event(hospital_name: &str) -> RelayEvent {
    RelayEvent::GlobalSos(SosPayload {
        hospital_name: hospital_name.to_string(),
        location: "Emergency Wing".to_string(),
        timestamp: "10:15:00".to_string(),
        request: EmergencyRequest {
            id: "sos-1".into(),
            patient_name: "CRITICAL CASE".into(),
            admission_number: None,
            dob: None,
            blood_type: BloodType::ONegative,
            units_needed: 3,
            location: "Emergency Wing".into(),
            hospital: hospital_name.to_string(),
            urgency: Urgency::Critical,
            is_platelet_request: false,
            contact: "Emergency Desk".into(),
            timestamp: "Just now".into(),
            coordinates: None,
        },
    })
}
