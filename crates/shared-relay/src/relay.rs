//! # Network Relay
//!
//! One context's attachment to a relay channel. Publishing is
//! fire-and-forget; subscribing returns a handle that owns the listener's
//! lifetime.

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::debug;
use uuid::Uuid;

use crate::error::RelayError;
use crate::events::{RelayEvent, RelayFilter};
use crate::hub::{RelayChannel, RelayHub};
use crate::subscriber::{ListenerHandle, RelayStream, RelaySubscription};

/// Identity of one context (tab/window) on the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(Uuid);

impl ContextId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What actually travels on a channel.
#[derive(Debug, Clone)]
pub(crate) struct RelayEnvelope {
    pub(crate) origin: ContextId,
    pub(crate) event: RelayEvent,
}

/// A context's handle on a relay channel.
///
/// Events published here reach listeners of every other context on the same
/// channel. Listeners of this context never see its own events.
pub struct NetworkRelay {
    context_id: ContextId,
    channel: String,
    transport: Arc<RelayChannel>,
    runtime: Handle,
    events_published: AtomicU64,
    active_listeners: Arc<AtomicUsize>,
}

impl NetworkRelay {
    /// Attach a new context to `channel`.
    ///
    /// # Errors
    ///
    /// `RelayError::TransportUnavailable` if the hub has no transport or
    /// there is no async runtime to deliver events on.
    pub fn connect(hub: &RelayHub, channel: &str) -> Result<Self, RelayError> {
        let runtime = Handle::try_current()
            .map_err(|_| RelayError::unavailable("no async runtime to deliver events"))?;
        let transport = hub.open(channel)?;
        let context_id = ContextId::generate();

        debug!(channel, context = %context_id, "Relay context connected");

        Ok(Self {
            context_id,
            channel: channel.to_string(),
            transport,
            runtime,
            events_published: AtomicU64::new(0),
            active_listeners: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Send an event to every other context.
    ///
    /// No acknowledgement and no retry: if nobody is listening the event is
    /// gone.
    pub fn publish(&self, event: RelayEvent) {
        let kind = event.kind();
        self.events_published.fetch_add(1, Ordering::Relaxed);

        let envelope = RelayEnvelope {
            origin: self.context_id,
            event,
        };
        let receivers = self.transport.broadcast(&envelope);
        debug!(
            channel = %self.channel,
            event = kind.as_str(),
            receivers,
            "Event broadcast"
        );
    }

    /// Register a callback for every event from other contexts.
    ///
    /// The callback runs once per event in publish order until the returned
    /// handle is unsubscribed or dropped. It must not unsubscribe its own
    /// handle from inside the call.
    pub fn subscribe<F>(&self, listener: F) -> ListenerHandle
    where
        F: FnMut(RelayEvent) + Send + 'static,
    {
        self.subscribe_filtered(RelayFilter::all(), listener)
    }

    /// Like [`NetworkRelay::subscribe`], restricted to `filter`.
    pub fn subscribe_filtered<F>(&self, filter: RelayFilter, listener: F) -> ListenerHandle
    where
        F: FnMut(RelayEvent) + Send + 'static,
    {
        // Attach the queue before returning so nothing published after
        // this call can be missed while the delivery task starts.
        let receiver = self.transport.attach();
        debug!(
            channel = %self.channel,
            context = %self.context_id,
            kinds = ?filter.kinds,
            "Listener registered"
        );
        ListenerHandle::spawn(
            &self.runtime,
            receiver,
            self.context_id,
            filter,
            Box::new(listener),
            Arc::clone(&self.active_listeners),
        )
    }

    /// Pull-style subscription.
    #[must_use]
    pub fn subscription(&self, filter: RelayFilter) -> RelaySubscription {
        RelaySubscription::new(self.transport.attach(), self.context_id, filter)
    }

    /// Subscription as a `Stream`.
    #[must_use]
    pub fn stream(&self, filter: RelayFilter) -> RelayStream {
        RelayStream::new(self.transport.attach(), self.context_id, filter)
    }

    #[must_use]
    pub fn context_id(&self) -> ContextId {
        self.context_id
    }

    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Total events published from this context.
    #[must_use]
    pub fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }

    /// Callback listeners currently registered in this context.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.active_listeners.load(Ordering::Acquire)
    }
}

impl fmt::Debug for NetworkRelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkRelay")
            .field("context_id", &self.context_id)
            .field("channel", &self.channel)
            .field("listeners", &self.listener_count())
            .finish()
    }
}
