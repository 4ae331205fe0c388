//! # Domain Entities
//!
//! The four record types persisted in the ledger.
//!
//! ## Encoding
//!
//! Field names are camelCase and status enums are upper-case strings, so records
//! written by earlier chaincode versions decode unchanged. Two leniencies keep
//! those records readable:
//!
//! - `ipAddress: ""` decodes as `None` (and `None` is written as `""`)
//! - `permissions: null` decodes as an empty list
//!
//! ## Type Decisions
//!
//! - Timestamps are `i64` seconds since the Unix epoch, the resolution of the
//!   ledger's transaction timestamp.
//! - `Connection::end_time` stays a plain `i64` (0 while active) instead of an
//!   `Option`, because stored records always carry the field.

use crate::errors::ChaincodeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Seconds since the Unix epoch, as carried by the ledger transaction timestamp.
pub type UnixSeconds = i64;

/// `end_time` value of a connection that has not been closed.
pub const OPEN_END_TIME: UnixSeconds = 0;

// =============================================================================
// RECORD KIND
// =============================================================================

/// Kind of ledger record, used in errors and logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Device,
    Connection,
    AccessPolicy,
    HealthStatus,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Device => "device",
            Self::Connection => "connection",
            Self::AccessPolicy => "access policy",
            Self::HealthStatus => "health status",
        };
        f.write_str(name)
    }
}

// =============================================================================
// STATUS ENUMS
// =============================================================================

/// Lifecycle status of a device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum DeviceStatus {
    /// Written by registration.
    Registered,
}

/// Status of a VPN connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionStatus {
    Active,
    Closed,
}

impl ConnectionStatus {
    /// Wire name of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tri-level health classification. Ordered by severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthState {
    Healthy,
    Warning,
    Critical,
}

impl HealthState {
    /// All states, least severe first.
    pub const ALL: [HealthState; 3] = [Self::Healthy, Self::Warning, Self::Critical];

    /// Wire name of the state, also used as the metric label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "HEALTHY",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// DEVICE
// =============================================================================

/// An IoT device known to the network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Caller-assigned identifier, also the ledger key.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Tunnel address, when the device reported one.
    #[serde(
        default,
        serialize_with = "none_as_empty",
        deserialize_with = "empty_as_none"
    )]
    pub ip_address: Option<String>,
    /// Lifecycle status.
    pub status: DeviceStatus,
    /// Timestamp of the last write touching this device.
    pub last_seen: UnixSeconds,
}

impl Device {
    /// A freshly registered device.
    pub fn registered(
        id: impl Into<String>,
        name: impl Into<String>,
        ip_address: Option<String>,
        now: UnixSeconds,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ip_address,
            status: DeviceStatus::Registered,
            last_seen: now,
        }
    }
}

// =============================================================================
// CONNECTION
// =============================================================================

/// A VPN connection established by a device.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    /// Connection id, also the ledger key.
    pub id: String,
    /// Device that established the connection.
    pub device_id: String,
    /// Establishment time.
    pub start_time: UnixSeconds,
    /// Close time, `OPEN_END_TIME` while active.
    #[serde(default)]
    pub end_time: UnixSeconds,
    /// Current status.
    pub status: ConnectionStatus,
}

impl Connection {
    /// A connection opened at `now`.
    pub fn open(id: impl Into<String>, device_id: impl Into<String>, now: UnixSeconds) -> Self {
        Self {
            id: id.into(),
            device_id: device_id.into(),
            start_time: now,
            end_time: OPEN_END_TIME,
            status: ConnectionStatus::Active,
        }
    }

    /// Returns true while the connection has not been closed.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == ConnectionStatus::Active
    }

    /// Close time, if the connection has been closed.
    #[must_use]
    pub fn ended_at(&self) -> Option<UnixSeconds> {
        (self.status == ConnectionStatus::Closed).then_some(self.end_time)
    }

    /// Move the connection to `CLOSED` at `now`.
    ///
    /// Only an active connection can be closed, and not before it started.
    pub fn close(&mut self, now: UnixSeconds) -> Result<(), ChaincodeError> {
        if !self.is_active() {
            return Err(ChaincodeError::InvalidTransition {
                id: self.id.clone(),
                from: self.status,
                to: ConnectionStatus::Closed,
            });
        }
        if now < self.start_time {
            return Err(ChaincodeError::InvalidArgument(format!(
                "close time {} precedes start time {} of {}",
                now, self.start_time, self.id
            )));
        }
        self.end_time = now;
        self.status = ConnectionStatus::Closed;
        Ok(())
    }
}

// =============================================================================
// ACCESS POLICY
// =============================================================================

/// Per-device permission set with an absolute expiry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessPolicy {
    /// Device the policy applies to. One policy per device.
    pub device_id: String,
    /// Capability tokens. Order is irrelevant, duplicates are kept.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub permissions: Vec<String>,
    /// Last second at which the policy is valid (inclusive).
    pub valid_until: UnixSeconds,
}

impl AccessPolicy {
    pub fn new(
        device_id: impl Into<String>,
        permissions: Vec<String>,
        valid_until: UnixSeconds,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            permissions,
            valid_until,
        }
    }

    /// Returns true once `now` is past `valid_until`.
    #[must_use]
    pub fn is_expired_at(&self, now: UnixSeconds) -> bool {
        now > self.valid_until
    }

    /// Exact-match membership test.
    #[must_use]
    pub fn grants(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

// =============================================================================
// HEALTH STATUS
// =============================================================================

/// Latest telemetry sample of a device with its derived classification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// Reporting device.
    pub device_id: String,
    /// Time the sample was recorded.
    pub timestamp: UnixSeconds,
    /// CPU usage percentage.
    pub cpu: f64,
    /// Memory usage percentage.
    pub memory: f64,
    /// Bandwidth usage percentage.
    pub bandwidth: f64,
    /// Derived from the three metrics, never caller-supplied.
    pub status: HealthState,
}

impl HealthStatus {
    /// Build a record, classifying the sample.
    pub fn classify(
        device_id: impl Into<String>,
        cpu: f64,
        memory: f64,
        bandwidth: f64,
        now: UnixSeconds,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            timestamp: now,
            cpu,
            memory,
            bandwidth,
            status: crate::domain::health::determine_status(cpu, memory, bandwidth),
        }
    }
}

// =============================================================================
// SERDE HELPERS
// =============================================================================

fn none_as_empty<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(value.as_deref().unwrap_or_default())
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
