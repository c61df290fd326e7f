//! # Service Container
//!
//! Holds every service instance and the relay hub they share, built once
//! from [`RuntimeConfig`].
//!
//! ## Build Order
//!
//! ```text
//! Store (memory | file)
//!   ├── Registry (seeded on first run)
//!   └── OTP records ── OTP service ── Mailbox
//! Relay hub (one channel per name)
//! Notification feed
//! ```

pub mod config;

use std::sync::Arc;

use rc_01_otp_verification::{CodeMailbox, KvOtpRecordStore, OtpVerificationService};
use rc_02_registry::{RegistryApi, RegistryService};
use shared_relay::{NetworkRelay, RelayError, RelayHub};
use shared_types::{InMemoryKeyValueStore, KeyValueStore};
use tracing::info;

pub use config::{ConfigError, NotificationConfig, RelayConfig, RuntimeConfig, StorageBackend};

use crate::adapters::FileKeyValueStore;
use crate::errors::RuntimeError;
use crate::handlers::NotificationFeed;

/// Central container holding all service instances.
pub struct ServiceContainer {
    pub config: RuntimeConfig,
    pub store: Arc<dyn KeyValueStore>,
    pub registry: Arc<RegistryService>,
    pub otp: Arc<OtpVerificationService>,
    pub relay_hub: Arc<RelayHub>,
    pub notifications: Arc<NotificationFeed>,
}

impl ServiceContainer {
    /// Build every service, opening the configured store and seeding the
    /// registry where collections are absent.
    ///
    /// # Errors
    /// Invalid configuration, an unopenable store, or a failed seed.
    pub fn new(config: RuntimeConfig, mailbox: Arc<dyn CodeMailbox>) -> Result<Self, RuntimeError> {
        config.validate()?;
        let store = open_store(&config.storage)?;
        Self::with_store(config, store, mailbox)
    }

    /// Same as [`ServiceContainer::new`] over an existing store.
    ///
    /// # Errors
    /// Invalid OTP configuration or a failed seed.
    pub fn with_store(
        config: RuntimeConfig,
        store: Arc<dyn KeyValueStore>,
        mailbox: Arc<dyn CodeMailbox>,
    ) -> Result<Self, RuntimeError> {
        let registry = Arc::new(RegistryService::new(Arc::clone(&store)));
        let seeded = registry.seed_if_empty()?;
        if seeded.any() {
            info!(
                donors = seeded.donors,
                blood_banks = seeded.blood_banks,
                hospitals = seeded.hospitals,
                "Registry seeded"
            );
        }

        let records = Arc::new(KvOtpRecordStore::new(Arc::clone(&store)));
        let otp = Arc::new(OtpVerificationService::new(config.otp.clone(), records, mailbox)?);

        let relay_hub = Arc::new(RelayHub::new());
        let notifications = Arc::new(NotificationFeed::new(config.notifications.feed_limit));

        info!(
            channel = %config.relay.channel,
            storage = ?config.storage,
            "Service container ready"
        );

        Ok(Self {
            config,
            store,
            registry,
            otp,
            relay_hub,
            notifications,
        })
    }

    /// Attach a new context to the configured relay channel.
    ///
    /// # Errors
    /// `RelayError::TransportUnavailable` outside an async runtime.
    pub fn connect_relay(&self) -> Result<NetworkRelay, RelayError> {
        NetworkRelay::connect(&self.relay_hub, &self.config.relay.channel)
    }
}

fn open_store(backend: &StorageBackend) -> Result<Arc<dyn KeyValueStore>, RuntimeError> {
    let store: Arc<dyn KeyValueStore> = match backend {
        StorageBackend::Memory => Arc::new(InMemoryKeyValueStore::new()),
        StorageBackend::File(dir) => Arc::new(FileKeyValueStore::open(dir)?),
    };
    Ok(store)
}
