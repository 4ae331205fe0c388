//! # Inbound Port
//!
//! Every operation takes the transaction timestamp it needs as an argument;
//! the chaincode never reads a clock itself.

use crate::domain::entities::{AccessPolicy, Connection, Device, HealthStatus, UnixSeconds};
use crate::domain::health::HealthAlert;
use crate::domain::policy::AccessDecision;
use crate::errors::ChaincodeError;

/// Primary API of the dVPN chaincode.
pub trait DvpnChaincodeApi: Send + Sync {
    // === Devices ===

    fn register_device(&self, id: &str, name: &str, now: UnixSeconds)
        -> Result<(), ChaincodeError>;

    fn register_device_with_address(
        &self,
        id: &str,
        name: &str,
        ip_address: Option<&str>,
        now: UnixSeconds,
    ) -> Result<(), ChaincodeError>;

    fn get_device(&self, id: &str) -> Result<Device, ChaincodeError>;

    fn device_exists(&self, id: &str) -> Result<bool, ChaincodeError>;

    // === Connections ===

    fn establish_connection(
        &self,
        device_id: &str,
        now: UnixSeconds,
    ) -> Result<String, ChaincodeError>;

    fn get_connection(&self, connection_id: &str) -> Result<Connection, ChaincodeError>;

    fn close_connection(
        &self,
        connection_id: &str,
        now: UnixSeconds,
    ) -> Result<Connection, ChaincodeError>;

    // === Access Policies ===

    fn create_access_policy(
        &self,
        device_id: &str,
        permissions: Vec<String>,
        valid_until: UnixSeconds,
    ) -> Result<(), ChaincodeError>;

    fn get_access_policy(&self, device_id: &str) -> Result<AccessPolicy, ChaincodeError>;

    fn check_access(
        &self,
        device_id: &str,
        permission: &str,
        now: UnixSeconds,
    ) -> Result<bool, ChaincodeError>;

    fn evaluate_access(
        &self,
        device_id: &str,
        permission: &str,
        now: UnixSeconds,
    ) -> Result<AccessDecision, ChaincodeError>;

    // === Health ===

    fn update_health_status(
        &self,
        device_id: &str,
        cpu: f64,
        memory: f64,
        bandwidth: f64,
        now: UnixSeconds,
    ) -> Result<HealthStatus, ChaincodeError>;

    fn get_health_status(&self, device_id: &str) -> Result<HealthStatus, ChaincodeError>;

    fn check_health_alerts(&self, device_id: &str) -> Result<Vec<HealthAlert>, ChaincodeError>;
}
