use super::{AccessPolicyEngine, ConnectionManager, DeviceRegistry, HealthMonitor};
use crate::config::ChaincodeConfig;
use crate::domain::entities::{AccessPolicy, Connection, Device, HealthStatus, UnixSeconds};
use crate::domain::health::HealthAlert;
use crate::domain::policy::AccessDecision;
use crate::errors::ChaincodeError;
use crate::ports::{ChaincodeMetrics, DvpnChaincodeApi, LedgerStore};
use std::sync::Arc;

/// The full chaincode: all four components over one ledger and metrics sink.
pub struct DvpnChaincode<L: LedgerStore, M: ChaincodeMetrics> {
    devices: DeviceRegistry<L>,
    connections: ConnectionManager<L, M>,
    policies: AccessPolicyEngine<L>,
    health: HealthMonitor<L, M>,
}

impl<L: LedgerStore, M: ChaincodeMetrics> DvpnChaincode<L, M> {
    pub fn new(ledger: Arc<L>, metrics: Arc<M>, config: ChaincodeConfig) -> Self {
        Self {
            devices: DeviceRegistry::new(Arc::clone(&ledger)),
            connections: ConnectionManager::new(
                Arc::clone(&ledger),
                Arc::clone(&metrics),
                config.max_connection_id_suffix,
            ),
            policies: AccessPolicyEngine::new(Arc::clone(&ledger)),
            health: HealthMonitor::new(ledger, metrics, config.metric_bounds, config.alert_rules),
        }
    }

    pub fn devices(&self) -> &DeviceRegistry<L> {
        &self.devices
    }

    pub fn connections(&self) -> &ConnectionManager<L, M> {
        &self.connections
    }

    pub fn policies(&self) -> &AccessPolicyEngine<L> {
        &self.policies
    }

    pub fn health(&self) -> &HealthMonitor<L, M> {
        &self.health
    }
}

impl<L: LedgerStore, M: ChaincodeMetrics> DvpnChaincodeApi for DvpnChaincode<L, M> {
    fn register_device(
        &self,
        id: &str,
        name: &str,
        now: UnixSeconds,
    ) -> Result<(), ChaincodeError> {
        self.devices.register(id, name, None, now)
    }

    fn register_device_with_address(
        &self,
        id: &str,
        name: &str,
        ip_address: Option<&str>,
        now: UnixSeconds,
    ) -> Result<(), ChaincodeError> {
        self.devices.register(id, name, ip_address, now)
    }

    fn get_device(&self, id: &str) -> Result<Device, ChaincodeError> {
        self.devices.get(id)
    }

    fn device_exists(&self, id: &str) -> Result<bool, ChaincodeError> {
        self.devices.exists(id)
    }

    fn establish_connection(
        &self,
        device_id: &str,
        now: UnixSeconds,
    ) -> Result<String, ChaincodeError> {
        self.connections.establish(device_id, now)
    }

    fn get_connection(&self, connection_id: &str) -> Result<Connection, ChaincodeError> {
        self.connections.get(connection_id)
    }

    fn close_connection(
        &self,
        connection_id: &str,
        now: UnixSeconds,
    ) -> Result<Connection, ChaincodeError> {
        self.connections.close(connection_id, now)
    }

    fn create_access_policy(
        &self,
        device_id: &str,
        permissions: Vec<String>,
        valid_until: UnixSeconds,
    ) -> Result<(), ChaincodeError> {
        self.policies.create(device_id, permissions, valid_until)
    }

    fn get_access_policy(&self, device_id: &str) -> Result<AccessPolicy, ChaincodeError> {
        self.policies.get(device_id)
    }

    fn check_access(
        &self,
        device_id: &str,
        permission: &str,
        now: UnixSeconds,
    ) -> Result<bool, ChaincodeError> {
        self.policies.check(device_id, permission, now)
    }

    fn evaluate_access(
        &self,
        device_id: &str,
        permission: &str,
        now: UnixSeconds,
    ) -> Result<AccessDecision, ChaincodeError> {
        self.policies.evaluate(device_id, permission, now)
    }

    fn update_health_status(
        &self,
        device_id: &str,
        cpu: f64,
        memory: f64,
        bandwidth: f64,
        now: UnixSeconds,
    ) -> Result<HealthStatus, ChaincodeError> {
        self.health.update(device_id, cpu, memory, bandwidth, now)
    }

    fn get_health_status(&self, device_id: &str) -> Result<HealthStatus, ChaincodeError> {
        self.health.get(device_id)
    }

    fn check_health_alerts(&self, device_id: &str) -> Result<Vec<HealthAlert>, ChaincodeError> {
        self.health.check_alerts(device_id)
    }
}
