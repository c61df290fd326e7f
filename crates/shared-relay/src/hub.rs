//! # Relay Hub
//!
//! The same-origin transport: a set of named channels shared by every
//! context of one session. Each context attaches through
//! [`NetworkRelay::connect`](crate::NetworkRelay::connect).
//!
//! Every subscriber owns an unbounded queue fed by the channel's fan-out, so
//! a slow listener never loses events to a faster publisher.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::RelayError;
use crate::relay::RelayEnvelope;

/// One named channel and the queues of everyone attached to it.
///
/// Queues close once the hub and every context holding the channel are
/// dropped.
pub(crate) struct RelayChannel {
    name: String,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<RelayEnvelope>>>,
}

impl RelayChannel {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Attach a new queue. It receives everything broadcast after this call.
    pub(crate) fn attach(&self) -> mpsc::UnboundedReceiver<RelayEnvelope> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribers.lock().push(sender);
        receiver
    }

    /// Queue `envelope` for every attached subscriber, dropping queues whose
    /// receiver is gone. Returns the number of queues reached.
    ///
    /// The lock is held across the fan-out so all subscribers observe one
    /// total order.
    pub(crate) fn broadcast(&self, envelope: &RelayEnvelope) -> usize {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|sender| sender.send(envelope.clone()).is_ok());
        subscribers.len()
    }

    /// Queues currently attached.
    pub(crate) fn subscriber_count(&self) -> usize {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|sender| !sender.is_closed());
        subscribers.len()
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }
}

/// Registry of named channels.
///
/// Same device and process only; a cross-machine deployment would put a
/// network transport behind the same interface.
pub struct RelayHub {
    /// Open channels by name.
    channels: Mutex<HashMap<String, Arc<RelayChannel>>>,

    /// Whether the transport exists in this environment.
    available: bool,
}

impl RelayHub {
    #[must_use]
    pub fn new() -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
            available: true,
        }
    }

    /// A hub for an environment without the primitive. Every
    /// `NetworkRelay::connect` against it fails.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Number of channels opened so far.
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channels.lock().len()
    }

    /// Get a channel, opening it on first use.
    pub(crate) fn open(&self, channel: &str) -> Result<Arc<RelayChannel>, RelayError> {
        if !self.available {
            return Err(RelayError::unavailable(
                "broadcast primitive not supported in this environment",
            ));
        }
        if channel.is_empty() {
            return Err(RelayError::unavailable("channel name is empty"));
        }

        let mut channels = self.channels.lock();
        let opened = channels
            .entry(channel.to_string())
            .or_insert_with(|| {
                debug!(channel, "Relay channel opened");
                Arc::new(RelayChannel::new(channel))
            })
            .clone();
        Ok(opened)
    }
}

impl Default for RelayHub {
    fn default() -> Self {
        Self::new()
    }
}
