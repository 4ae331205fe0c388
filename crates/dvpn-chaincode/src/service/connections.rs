use super::registry::DeviceRegistry;
use super::store::{insert_new, require, save};
use crate::domain::entities::{Connection, UnixSeconds};
use crate::domain::keys::{connection_key_with_suffix, validate_device_id};
use crate::errors::ChaincodeError;
use crate::ports::{ChaincodeMetrics, LedgerStore};
use std::sync::Arc;
use tracing::{debug, info};

/// Opens and closes VPN connections for registered devices.
pub struct ConnectionManager<L: LedgerStore, M: ChaincodeMetrics> {
    ledger: Arc<L>,
    metrics: Arc<M>,
    devices: DeviceRegistry<L>,
    /// Largest collision suffix tried before giving up.
    max_suffix: u32,
}

impl<L: LedgerStore, M: ChaincodeMetrics> ConnectionManager<L, M> {
    pub fn new(ledger: Arc<L>, metrics: Arc<M>, max_suffix: u32) -> Self {
        Self {
            devices: DeviceRegistry::new(Arc::clone(&ledger)),
            ledger,
            metrics,
            max_suffix,
        }
    }

    /// Open a connection for `device_id` at `now` and return its id.
    ///
    /// The id is `CONN_<deviceId>_<now>`. A second connection in the same second
    /// gets `_1`, then `_2`, up to the configured bound. Each candidate is
    /// claimed with an insert-if-absent, so concurrent calls never share an id.
    /// Nothing is written unless a device record is stored under `device_id`.
    pub fn establish(&self, device_id: &str, now: UnixSeconds) -> Result<String, ChaincodeError> {
        validate_device_id(device_id)?;
        // Fails with NotFound when absent and Decoding when the key holds another record kind
        self.devices.get(device_id)?;

        for n in 0..=self.max_suffix {
            let candidate = connection_key_with_suffix(device_id, now, n);
            let connection = Connection::open(candidate.clone(), device_id, now);
            if insert_new(self.ledger.as_ref(), &connection)? {
                self.metrics.connection_established();
                info!(device_id = %device_id, connection_id = %candidate, "Connection established");
                return Ok(candidate);
            }
            debug!(connection_id = %candidate, "Connection id taken, trying next suffix");
        }
        Err(ChaincodeError::Conflict(format!(
            "{} connection ids for device {} at {} are taken",
            u64::from(self.max_suffix) + 1,
            device_id,
            now
        )))
    }

    pub fn get(&self, connection_id: &str) -> Result<Connection, ChaincodeError> {
        let connection = require(self.ledger.as_ref(), connection_id)?;
        debug!(connection_id = %connection_id, "Connection read");
        Ok(connection)
    }

    /// Move an active connection to `CLOSED` at `now`.
    pub fn close(
        &self,
        connection_id: &str,
        now: UnixSeconds,
    ) -> Result<Connection, ChaincodeError> {
        let mut connection: Connection = require(self.ledger.as_ref(), connection_id)?;
        connection.close(now)?;
        save(self.ledger.as_ref(), &connection)?;
        self.metrics.connection_closed();

        info!(
            device_id = %connection.device_id,
            connection_id = %connection_id,
            duration_secs = now - connection.start_time,
            "Connection closed"
        );
        Ok(connection)
    }
}
