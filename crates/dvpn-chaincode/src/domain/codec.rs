//! # Record Codec
//!
//! JSON encoding of ledger records. JSON keeps the stored bytes field-tagged and
//! readable with any ledger explorer.
//!
//! A decode failure is always `ChaincodeError::Decoding`, never `NotFound`: an
//! absent key is decided by the caller before bytes reach the codec.

use crate::domain::entities::{AccessPolicy, Connection, Device, HealthStatus, RecordKind};
use crate::domain::keys;
use crate::errors::ChaincodeError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A record type stored in the ledger under a key derived from its fields.
pub trait LedgerRecord: Serialize + DeserializeOwned {
    /// Kind reported in errors.
    const KIND: RecordKind;

    /// Key the record is stored under.
    fn ledger_key(&self) -> String;
}

impl LedgerRecord for Device {
    const KIND: RecordKind = RecordKind::Device;

    fn ledger_key(&self) -> String {
        keys::device_key(&self.id)
    }
}

impl LedgerRecord for Connection {
    const KIND: RecordKind = RecordKind::Connection;

    // The id already carries any collision suffix.
    fn ledger_key(&self) -> String {
        self.id.clone()
    }
}

impl LedgerRecord for AccessPolicy {
    const KIND: RecordKind = RecordKind::AccessPolicy;

    fn ledger_key(&self) -> String {
        keys::policy_key(&self.device_id)
    }
}

impl LedgerRecord for HealthStatus {
    const KIND: RecordKind = RecordKind::HealthStatus;

    fn ledger_key(&self) -> String {
        keys::health_key(&self.device_id)
    }
}

/// Serialize a record to its stored bytes.
pub fn encode_record<R: LedgerRecord>(record: &R) -> Result<Vec<u8>, ChaincodeError> {
    serde_json::to_vec(record).map_err(|e| ChaincodeError::Encoding {
        kind: R::KIND,
        reason: e.to_string(),
    })
}

/// Deserialize stored bytes read from `key`.
pub fn decode_record<R: LedgerRecord>(key: &str, bytes: &[u8]) -> Result<R, ChaincodeError> {
    serde_json::from_slice(bytes).map_err(|e| ChaincodeError::Decoding {
        key: key.to_string(),
        reason: e.to_string(),
    })
}
