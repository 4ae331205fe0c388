use super::store::{require, save};
use crate::domain::entities::{Device, UnixSeconds};
use crate::domain::keys::{device_key, validate_device_id};
use crate::errors::ChaincodeError;
use crate::ports::LedgerStore;
use std::sync::Arc;
use tracing::{debug, info};

/// Creates and reads device records.
pub struct DeviceRegistry<L: LedgerStore> {
    ledger: Arc<L>,
}

impl<L: LedgerStore> Clone for DeviceRegistry<L> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
        }
    }
}

impl<L: LedgerStore> DeviceRegistry<L> {
    pub fn new(ledger: Arc<L>) -> Self {
        Self { ledger }
    }

    /// Register (or re-register) a device.
    ///
    /// Re-registration replaces the whole record, resetting `last_seen` to `now`.
    /// An empty `ip_address` is treated as absent.
    pub fn register(
        &self,
        id: &str,
        name: &str,
        ip_address: Option<&str>,
        now: UnixSeconds,
    ) -> Result<(), ChaincodeError> {
        validate_device_id(id)?;

        let ip_address = ip_address.filter(|ip| !ip.is_empty()).map(str::to_string);
        let device = Device::registered(id, name, ip_address, now);
        save(self.ledger.as_ref(), &device)?;

        info!(device_id = %id, name = %name, "Device registered");
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<Device, ChaincodeError> {
        let device = require(self.ledger.as_ref(), &device_key(id))?;
        debug!(device_id = %id, "Device read");
        Ok(device)
    }

    /// Returns true if a record is stored under the device's key.
    pub fn exists(&self, id: &str) -> Result<bool, ChaincodeError> {
        Ok(self.ledger.exists(&device_key(id))?)
    }
}
