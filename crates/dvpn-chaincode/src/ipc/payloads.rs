use crate::domain::entities::{
    AccessPolicy, Connection, Device, HealthStatus, UnixSeconds,
};
use crate::domain::health::HealthAlert;
use crate::domain::policy::AccessDecision;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A transaction submitted to the chaincode.
///
/// Wire shape: `{"txId": "...", "request": {"function": "CheckAccess", "args": {...}}}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEnvelope {
    pub tx_id: Uuid,
    pub request: TransactionRequest,
}

impl TransactionEnvelope {
    /// Wrap `request` with a fresh random transaction id.
    pub fn new(request: TransactionRequest) -> Self {
        Self {
            tx_id: Uuid::new_v4(),
            request,
        }
    }
}

/// Invocable chaincode functions and their arguments.
///
/// The transaction timestamp is not an argument: the handler stamps it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "function", content = "args", rename_all_fields = "camelCase")]
pub enum TransactionRequest {
    RegisterDevice {
        id: String,
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ip_address: Option<String>,
    },
    GetDevice {
        id: String,
    },
    EstablishConnection {
        device_id: String,
    },
    GetConnection {
        connection_id: String,
    },
    CloseConnection {
        connection_id: String,
    },
    CreateAccessPolicy {
        device_id: String,
        #[serde(default)]
        permissions: Vec<String>,
        valid_until: UnixSeconds,
    },
    GetAccessPolicy {
        device_id: String,
    },
    CheckAccess {
        device_id: String,
        permission: String,
    },
    UpdateHealthStatus {
        device_id: String,
        cpu: f64,
        memory: f64,
        bandwidth: f64,
    },
    GetHealthStatus {
        device_id: String,
    },
    CheckHealthAlerts {
        device_id: String,
    },
}

impl TransactionRequest {
    /// Function name as it appears on the wire and in metric labels.
    #[must_use]
    pub fn function_name(&self) -> &'static str {
        match self {
            Self::RegisterDevice { .. } => "RegisterDevice",
            Self::GetDevice { .. } => "GetDevice",
            Self::EstablishConnection { .. } => "EstablishConnection",
            Self::GetConnection { .. } => "GetConnection",
            Self::CloseConnection { .. } => "CloseConnection",
            Self::CreateAccessPolicy { .. } => "CreateAccessPolicy",
            Self::GetAccessPolicy { .. } => "GetAccessPolicy",
            Self::CheckAccess { .. } => "CheckAccess",
            Self::UpdateHealthStatus { .. } => "UpdateHealthStatus",
            Self::GetHealthStatus { .. } => "GetHealthStatus",
            Self::CheckHealthAlerts { .. } => "CheckHealthAlerts",
        }
    }

    /// Returns true for functions that write to the ledger.
    #[must_use]
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Self::RegisterDevice { .. }
                | Self::EstablishConnection { .. }
                | Self::CloseConnection { .. }
                | Self::CreateAccessPolicy { .. }
                | Self::UpdateHealthStatus { .. }
        )
    }
}

/// Result of a successful transaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub tx_id: Uuid,
    pub function: String,
    /// Timestamp the transaction was stamped with.
    pub timestamp: UnixSeconds,
    pub payload: TransactionPayload,
}

/// Function-specific result data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum TransactionPayload {
    /// The write was applied; nothing to return.
    Ack,
    ConnectionId(String),
    Device(Device),
    Connection(Connection),
    AccessPolicy(AccessPolicy),
    Access {
        granted: bool,
        decision: AccessDecision,
    },
    HealthStatus(HealthStatus),
    Alerts(Vec<HealthAlert>),
}
