//! # Runtime
//!
//! Owns the container and the background handlers.
//!
//! ## Startup Sequence
//!
//! 1. Connect the runtime's own relay context
//! 2. Connect the operator console context and start its [`SosNotifier`]
//! 3. Sweep bank stock and publish shortages
//!
//! ## Shutdown Sequence
//!
//! 1. Signal every handler through the watch channel
//! 2. Wait (bounded) for the handler tasks to finish

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use shared_relay::NetworkRelay;
use shared_types::{AuthenticatedUser, Coordinates, EmergencyRequest};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn, Instrument};

use crate::container::ServiceContainer;
use crate::errors::RuntimeError;
use crate::flows::OnboardingFlow;
use crate::handlers::{
    broadcast_request, broadcast_sos, InventoryMonitor, NotAHospital, NotificationKind,
    RequestDraft, SosNotifier,
};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// The running Red Connect core.
pub struct RedConnectRuntime {
    container: Arc<ServiceContainer>,
    relay: Arc<NetworkRelay>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl RedConnectRuntime {
    /// Attach the runtime to its relay channel.
    ///
    /// # Errors
    /// `RuntimeError::Relay` outside an async runtime.
    pub fn new(container: ServiceContainer) -> Result<Self, RuntimeError> {
        let relay = Arc::new(container.connect_relay()?);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Ok(Self {
            container: Arc::new(container),
            relay,
            shutdown_tx,
            shutdown_rx,
            tasks: Mutex::new(Vec::new()),
        })
    }

    /// Start handlers and run the initial stock sweep.
    ///
    /// # Errors
    /// Relay or registry failure during startup.
    pub async fn start(&self) -> Result<(), RuntimeError> {
        info!(
            channel = %self.container.config.relay.channel,
            context = %self.relay.context_id(),
            "Starting Red Connect runtime"
        );

        let console = self.container.connect_relay()?;
        let notifier = SosNotifier::new(&console, Arc::clone(&self.container.notifications));
        let mut shutdown = self.shutdown_rx.clone();
        let span = rc_telemetry::subsystem_span!("sos_notifier", context = %console.context_id());
        let task = tokio::spawn(
            async move {
                tokio::select! {
                    _ = notifier.run() => {}
                    _ = shutdown.changed() => {
                        info!("SOS notifier received shutdown signal");
                    }
                }
            }
            .instrument(span),
        );
        self.tasks.lock().push(task);

        let alerts = self.inventory_monitor().sweep()?;
        info!(alerts, "Initial inventory sweep published");
        Ok(())
    }

    /// Signal handlers to stop and wait for them.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");
        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {e}");
        }

        let tasks = std::mem::take(&mut *self.tasks.lock());
        for task in tasks {
            match tokio::time::timeout(SHUTDOWN_GRACE, task).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("Handler task ended abnormally: {e}"),
                Err(_) => warn!("Handler task did not stop within {SHUTDOWN_GRACE:?}"),
            }
        }
        info!("Shutdown complete");
    }

    /// Sign-in and registration against this runtime's services.
    #[must_use]
    pub fn onboarding(&self) -> OnboardingFlow {
        OnboardingFlow::new(
            Arc::clone(&self.container.otp) as _,
            Arc::clone(&self.container.registry) as _,
        )
    }

    /// Stock monitor publishing on this runtime's relay context.
    #[must_use]
    pub fn inventory_monitor(&self) -> InventoryMonitor {
        InventoryMonitor::new(
            Arc::clone(&self.relay),
            Arc::clone(&self.container.registry) as _,
        )
    }

    /// Broadcast a one-tap SOS and note it in the local feed.
    ///
    /// # Errors
    /// [`NotAHospital`] unless `user` is a hospital.
    pub fn raise_sos(
        &self,
        user: &AuthenticatedUser,
        coordinates: Option<Coordinates>,
    ) -> Result<EmergencyRequest, NotAHospital> {
        let request = broadcast_sos(&self.relay, user, coordinates)?;
        self.container.notifications.push(
            "SOS Broadcasted to Network. Awaiting Blood Bank response...",
            NotificationKind::Success,
        );
        Ok(request)
    }

    /// Broadcast a regular request and note it in the local feed.
    ///
    /// # Errors
    /// [`NotAHospital`] unless `user` is a hospital.
    pub fn submit_request(
        &self,
        user: &AuthenticatedUser,
        draft: RequestDraft,
        coordinates: Option<Coordinates>,
    ) -> Result<EmergencyRequest, NotAHospital> {
        let request = broadcast_request(&self.relay, user, draft, coordinates)?;
        self.container.notifications.push(
            "Request broadcasted to the medical network.",
            NotificationKind::Success,
        );
        Ok(request)
    }

    #[must_use]
    pub fn container(&self) -> Arc<ServiceContainer> {
        Arc::clone(&self.container)
    }

    #[must_use]
    pub fn relay(&self) -> &NetworkRelay {
        &self.relay
    }
}
