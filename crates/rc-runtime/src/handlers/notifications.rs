//! Operator notification feed.
//!
//! Newest first, bounded. Incoming emergency requests are kept alongside so
//! a feed view can list them without re-reading the relay.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use shared_types::EmergencyRequest;

/// How loudly a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    /// Opens the notification panel.
    Alert,
}

/// One feed entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: u64,
    pub text: String,
    pub kind: NotificationKind,
    pub received_at: DateTime<Utc>,
}

impl Notification {
    /// Clock time shown next to the entry (`14:05`).
    #[must_use]
    pub fn time_label(&self) -> String {
        self.received_at.format("%H:%M").to_string()
    }
}

/// Bounded, shared notification and request feed.
#[derive(Debug)]
pub struct NotificationFeed {
    limit: usize,
    next_id: AtomicU64,
    notifications: Mutex<VecDeque<Notification>>,
    requests: Mutex<VecDeque<EmergencyRequest>>,
}

impl NotificationFeed {
    #[must_use]
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            limit,
            next_id: AtomicU64::new(1),
            notifications: Mutex::new(VecDeque::with_capacity(limit)),
            requests: Mutex::new(VecDeque::with_capacity(limit)),
        }
    }

    /// Add a notification at the front, dropping the oldest past the limit.
    pub fn push(&self, text: impl Into<String>, kind: NotificationKind) -> Notification {
        let notification = Notification {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            text: text.into(),
            kind,
            received_at: Utc::now(),
        };
        let mut entries = self.notifications.lock();
        entries.push_front(notification.clone());
        entries.truncate(self.limit);
        notification
    }

    /// Record an incoming emergency request, newest first.
    pub fn push_request(&self, request: EmergencyRequest) {
        let mut requests = self.requests.lock();
        requests.push_front(request);
        requests.truncate(self.limit);
    }

    /// Notifications, newest first.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().iter().cloned().collect()
    }

    /// Emergency requests received, newest first.
    #[must_use]
    pub fn requests(&self) -> Vec<EmergencyRequest> {
        self.requests.lock().iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notifications.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether any unread-worthy alert is present.
    #[must_use]
    pub fn has_alerts(&self) -> bool {
        self.notifications
            .lock()
            .iter()
            .any(|n| n.kind == NotificationKind::Alert)
    }

    pub fn clear(&self) {
        self.notifications.lock().clear();
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }
}
