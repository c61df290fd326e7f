//! # Relay Subscribers
//!
//! Three ways to consume a channel:
//!
//! - [`ListenerHandle`]: callback driven by a delivery task (push).
//! - [`RelaySubscription`]: `recv` / `try_recv` (pull).
//! - [`RelayStream`]: `futures::Stream` for combinators.
//!
//! All three skip events published by their own context. Each reads its own
//! unbounded queue, so every event published while it is attached is
//! delivered exactly once.

use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::debug;

use crate::error::RelayError;
use crate::events::{RelayEvent, RelayFilter};
use crate::relay::{ContextId, RelayEnvelope};

type Listener = Box<dyn FnMut(RelayEvent) + Send>;
type ListenerSlot = Arc<Mutex<Option<Listener>>>;
type EnvelopeQueue = mpsc::UnboundedReceiver<RelayEnvelope>;

fn accepts(envelope: &RelayEnvelope, own: ContextId, filter: &RelayFilter) -> bool {
    envelope.origin != own && filter.matches(&envelope.event)
}

/// Handle for a callback listener.
///
/// [`ListenerHandle::unsubscribe`] (or dropping the handle) removes the
/// listener. Once it returns, the listener is never called again.
#[must_use = "dropping the handle unsubscribes the listener"]
pub struct ListenerHandle {
    slot: ListenerSlot,
    task: Option<JoinHandle<()>>,
    active: Arc<AtomicUsize>,
}

impl ListenerHandle {
    pub(crate) fn spawn(
        runtime: &Handle,
        mut receiver: EnvelopeQueue,
        own: ContextId,
        filter: RelayFilter,
        listener: Listener,
        active: Arc<AtomicUsize>,
    ) -> Self {
        let slot: ListenerSlot = Arc::new(Mutex::new(Some(listener)));
        active.fetch_add(1, Ordering::AcqRel);

        let task_slot = Arc::clone(&slot);
        let task = runtime.spawn(async move {
            while let Some(envelope) = receiver.recv().await {
                if !accepts(&envelope, own, &filter) {
                    continue;
                }
                if !deliver(&task_slot, envelope.event) {
                    break;
                }
            }
        });

        Self {
            slot,
            task: Some(task),
            active,
        }
    }

    /// Remove the listener. No deliveries happen after this returns.
    pub fn unsubscribe(mut self) {
        self.detach();
    }

    /// Whether the listener is still registered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.slot.lock().is_some()
    }

    fn detach(&mut self) {
        // Taking the slot waits for an in-flight callback to finish.
        if self.slot.lock().take().is_some() {
            self.active.fetch_sub(1, Ordering::AcqRel);
            debug!("Listener unsubscribed");
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Invoke the listener if still registered. Returns false once it is gone.
fn deliver(slot: &ListenerSlot, event: RelayEvent) -> bool {
    let mut guard = slot.lock();
    match guard.as_mut() {
        Some(listener) => {
            listener(event);
            true
        }
        None => false,
    }
}

/// Pull-style subscription. Dropping it detaches from the channel.
pub struct RelaySubscription {
    receiver: EnvelopeQueue,
    own: ContextId,
    filter: RelayFilter,
}

impl RelaySubscription {
    pub(crate) fn new(receiver: EnvelopeQueue, own: ContextId, filter: RelayFilter) -> Self {
        Self {
            receiver,
            own,
            filter,
        }
    }

    /// Receive the next matching event from another context.
    ///
    /// Returns `None` once the channel is closed.
    pub async fn recv(&mut self) -> Option<RelayEvent> {
        while let Some(envelope) = self.receiver.recv().await {
            if accepts(&envelope, self.own, &self.filter) {
                return Some(envelope.event);
            }
        }
        None
    }

    /// Try to receive the next matching event without waiting.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(event))` - An event was available and matched
    /// - `Ok(None)` - Nothing pending
    /// - `Err(RelayError::Closed)` - The channel was closed
    pub fn try_recv(&mut self) -> Result<Option<RelayEvent>, RelayError> {
        loop {
            let envelope = match self.receiver.try_recv() {
                Ok(envelope) => envelope,
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Disconnected) => return Err(RelayError::Closed),
            };
            if accepts(&envelope, self.own, &self.filter) {
                return Ok(Some(envelope.event));
            }
        }
    }

    #[must_use]
    pub fn relay_filter(&self) -> &RelayFilter {
        &self.filter
    }
}

/// A subscription as a `Stream`.
pub struct RelayStream {
    inner: UnboundedReceiverStream<RelayEnvelope>,
    own: ContextId,
    filter: RelayFilter,
}

impl RelayStream {
    pub(crate) fn new(receiver: EnvelopeQueue, own: ContextId, filter: RelayFilter) -> Self {
        Self {
            inner: UnboundedReceiverStream::new(receiver),
            own,
            filter,
        }
    }

    #[must_use]
    pub fn relay_filter(&self) -> &RelayFilter {
        &self.filter
    }
}

impl Stream for RelayStream {
    type Item = RelayEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Ready(Some(envelope)) => {
                    if accepts(&envelope, self.own, &self.filter) {
                        return Poll::Ready(Some(envelope.event));
                    }
                }
            }
        }
    }
}
