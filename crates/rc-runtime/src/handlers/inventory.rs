//! Inventory monitor.
//!
//! Publishes `INVENTORY_ALERT` for every blood type a bank is out of or
//! critically low on, after each stock update or on a full sweep.

use std::sync::Arc;

use rc_02_registry::{RegistryApi, RegistryError};
use rc_03_matching::critical_stock;
use shared_relay::{InventoryAlertPayload, NetworkRelay, RelayEvent};
use shared_types::{BloodBank, Inventory};
use tracing::{debug, warn};

pub struct InventoryMonitor {
    relay: Arc<NetworkRelay>,
    registry: Arc<dyn RegistryApi>,
}

impl InventoryMonitor {
    pub fn new(relay: Arc<NetworkRelay>, registry: Arc<dyn RegistryApi>) -> Self {
        Self { relay, registry }
    }

    /// Publish alerts for one bank's shortages. Returns what was published.
    pub fn check_bank(&self, bank: &BloodBank) -> Vec<InventoryAlertPayload> {
        let alerts: Vec<InventoryAlertPayload> = critical_stock(bank)
            .into_iter()
            .map(|(blood_type, level)| InventoryAlertPayload {
                bank_name: bank.display_name().to_string(),
                blood_type,
                status: level.as_str().to_string(),
            })
            .collect();

        for alert in &alerts {
            warn!(
                bank_id = %bank.id,
                blood_type = %alert.blood_type,
                status = %alert.status,
                "Stock shortage"
            );
            self.relay.publish(RelayEvent::InventoryAlert(alert.clone()));
        }
        alerts
    }

    /// Replace a bank's stock and alert on any shortage.
    ///
    /// Returns `None` for an unknown bank.
    ///
    /// # Errors
    /// Registry read or write failure.
    pub fn update_stock(
        &self,
        bank_id: &str,
        inventory: Inventory,
    ) -> Result<Option<Vec<InventoryAlertPayload>>, RegistryError> {
        let Some(bank) = self.registry.update_inventory(bank_id, inventory)? else {
            debug!(bank_id, "Stock update for unknown bank ignored");
            return Ok(None);
        };
        Ok(Some(self.check_bank(&bank)))
    }

    /// Check every registered bank. Returns the number of alerts published.
    ///
    /// # Errors
    /// Registry read failure.
    pub fn sweep(&self) -> Result<usize, RegistryError> {
        let banks = self.registry.blood_banks()?;
        let published = banks.iter().map(|bank| self.check_bank(bank).len()).sum();
        debug!(banks = banks.len(), alerts = published, "Inventory sweep complete");
        Ok(published)
    }
}
