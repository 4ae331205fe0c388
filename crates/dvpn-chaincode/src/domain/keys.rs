//! # Ledger Key Naming
//!
//! Keys are shared with records written by earlier chaincode versions and must
//! stay bit-exact:
//!
//! | Record | Key |
//! |--------|-----|
//! | Device | raw `id` |
//! | Connection | `CONN_<deviceId>_<startTimeSeconds>` |
//! | AccessPolicy | `POLICY_<deviceId>` |
//! | HealthStatus | `HEALTH_<deviceId>` |
//!
//! Devices live in the same key space as everything else, so a device id may
//! not start with one of the record prefixes.

use crate::domain::entities::UnixSeconds;
use crate::errors::ChaincodeError;

pub const CONNECTION_PREFIX: &str = "CONN_";
pub const POLICY_PREFIX: &str = "POLICY_";
pub const HEALTH_PREFIX: &str = "HEALTH_";

/// Prefixes a device id must not start with.
pub const RESERVED_PREFIXES: [&str; 3] = [CONNECTION_PREFIX, POLICY_PREFIX, HEALTH_PREFIX];

#[must_use]
pub fn device_key(device_id: &str) -> String {
    device_id.to_string()
}

/// Base key of the connection a device opens at `start_time`.
#[must_use]
pub fn connection_key(device_id: &str, start_time: UnixSeconds) -> String {
    format!("{CONNECTION_PREFIX}{device_id}_{start_time}")
}

/// Key of the `n`-th additional connection opened in the same second.
///
/// `n == 0` is the base key.
#[must_use]
pub fn connection_key_with_suffix(device_id: &str, start_time: UnixSeconds, n: u32) -> String {
    if n == 0 {
        connection_key(device_id, start_time)
    } else {
        format!("{}_{n}", connection_key(device_id, start_time))
    }
}

#[must_use]
pub fn policy_key(device_id: &str) -> String {
    format!("{POLICY_PREFIX}{device_id}")
}

#[must_use]
pub fn health_key(device_id: &str) -> String {
    format!("{HEALTH_PREFIX}{device_id}")
}

/// Reject device ids that are empty or would land on another record's key.
pub fn validate_device_id(device_id: &str) -> Result<(), ChaincodeError> {
    if device_id.is_empty() {
        return Err(ChaincodeError::InvalidArgument(
            "device id must not be empty".to_string(),
        ));
    }
    if let Some(prefix) = RESERVED_PREFIXES
        .iter()
        .find(|prefix| device_id.starts_with(*prefix))
    {
        return Err(ChaincodeError::InvalidArgument(format!(
            "device id {device_id} uses reserved prefix {prefix}"
        )));
    }
    Ok(())
}
