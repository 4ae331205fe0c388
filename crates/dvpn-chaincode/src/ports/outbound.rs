//! # Outbound Ports
//!
//! Collaborators owned by the host: the ledger, the transaction clock and the
//! telemetry sink. All calls are synchronous point operations.

use crate::domain::entities::{HealthState, UnixSeconds};
use crate::errors::ChaincodeError;
use std::time::Duration;
use thiserror::Error;

// =============================================================================
// LEDGER
// =============================================================================

/// Failure reported by the ledger collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The ledger could not be reached or answered with an error.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    /// The ledger refused a write.
    #[error("write to {key} rejected: {reason}")]
    WriteRejected { key: String, reason: String },

    /// An in-process adapter's lock was poisoned by a panicking writer.
    #[error("ledger lock poisoned")]
    LockPoisoned,
}

/// Transactional key-value store of record.
///
/// Reads and writes are scoped to the current transaction by the host.
pub trait LedgerStore: Send + Sync {
    /// Bytes stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Create or fully replace the value under `key`.
    fn upsert(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError>;

    /// Write `value` under `key` only if the key is absent, atomically.
    ///
    /// Returns false and leaves the stored value untouched when the key exists.
    fn insert_if_absent(&self, key: &str, value: Vec<u8>) -> Result<bool, LedgerError>;

    fn exists(&self, key: &str) -> Result<bool, LedgerError> {
        Ok(self.get(key)?.is_some())
    }
}

// =============================================================================
// CLOCK
// =============================================================================

/// Source of the transaction timestamp.
///
/// Read once per invocation so every write in it carries the same time.
pub trait TxClock: Send + Sync {
    fn now(&self) -> UnixSeconds;
}

// =============================================================================
// TELEMETRY
// =============================================================================

/// Side channel for counters and gauges. Never affects ledger state.
pub trait ChaincodeMetrics: Send + Sync {
    /// A connection record was written.
    fn connection_established(&self);

    /// A connection moved to `CLOSED`.
    ///
    /// The active-connections gauge only tracks connections opened by this
    /// process and never drops below zero.
    fn connection_closed(&self);

    /// A device's health sample was stored with `status`.
    fn health_reported(&self, device_id: &str, status: HealthState);

    /// A transaction finished, successfully when `error` is `None`.
    fn transaction_finished(
        &self,
        function: &str,
        error: Option<&ChaincodeError>,
        elapsed: Duration,
    );
}
