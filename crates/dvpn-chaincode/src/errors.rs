//! # Error Types
//!
//! All error types returned by the chaincode.

use crate::domain::entities::{ConnectionStatus, RecordKind};
use crate::ports::outbound::LedgerError;
use thiserror::Error;

// =============================================================================
// CHAINCODE ERRORS
// =============================================================================

/// Errors surfaced to the caller of a chaincode operation.
///
/// A legitimate access denial is never an error: `check_access` returns
/// `Ok(false)` for a missing or expired policy.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChaincodeError {
    /// A record required by the operation is absent from the ledger.
    #[error("{kind} does not exist: {key}")]
    NotFound {
        /// Kind of the missing record.
        kind: RecordKind,
        /// Ledger key that was looked up.
        key: String,
    },

    /// The ledger failed to read or write.
    #[error("storage error: {0}")]
    Storage(#[from] LedgerError),

    /// A record could not be serialized.
    #[error("failed to encode {kind}: {reason}")]
    Encoding {
        /// Kind of record being encoded.
        kind: RecordKind,
        /// Serializer message.
        reason: String,
    },

    /// Stored bytes do not match the expected record structure.
    #[error("failed to decode record at {key}: {reason}")]
    Decoding {
        /// Ledger key (or payload name) that held the bytes.
        key: String,
        /// Deserializer message.
        reason: String,
    },

    /// An identifier or timestamp argument was rejected before touching the ledger.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A telemetry value is non-finite, or out of range under the reject policy.
    #[error("invalid {metric} value: {value}")]
    InvalidMetric {
        /// Metric name (cpu, memory, bandwidth).
        metric: &'static str,
        /// Offending value.
        value: f64,
    },

    /// The requested connection status change is not allowed.
    #[error("connection {id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Connection id.
        id: String,
        /// Current status.
        from: ConnectionStatus,
        /// Requested status.
        to: ConnectionStatus,
    },

    /// No free connection id is left for the device and second.
    #[error("connection id conflict: {0}")]
    Conflict(String),
}

impl ChaincodeError {
    /// Shorthand for a missing record.
    pub fn not_found(kind: RecordKind, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    /// Stable snake_case label used for metrics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Storage(_) => "storage",
            Self::Encoding { .. } => "encoding",
            Self::Decoding { .. } => "decoding",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::InvalidMetric { .. } => "invalid_metric",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::Conflict(_) => "conflict",
        }
    }

    /// Returns true if the error came from the ledger collaborator.
    ///
    /// Only these are worth retrying, and retrying is the collaborator's call.
    #[must_use]
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}
