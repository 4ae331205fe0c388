//! Typed reads and writes over the raw ledger port.

use crate::domain::codec::{decode_record, encode_record, LedgerRecord};
use crate::errors::ChaincodeError;
use crate::ports::LedgerStore;

/// Decode the record under `key`, `None` if absent.
pub(crate) fn load<R, L>(ledger: &L, key: &str) -> Result<Option<R>, ChaincodeError>
where
    R: LedgerRecord,
    L: LedgerStore + ?Sized,
{
    match ledger.get(key)? {
        Some(bytes) => decode_record(key, &bytes).map(Some),
        None => Ok(None),
    }
}

/// Decode the record under `key`, `NotFound` if absent.
pub(crate) fn require<R, L>(ledger: &L, key: &str) -> Result<R, ChaincodeError>
where
    R: LedgerRecord,
    L: LedgerStore + ?Sized,
{
    load(ledger, key)?.ok_or_else(|| ChaincodeError::not_found(R::KIND, key))
}

/// Encode and upsert `record` under its own key. Returns the key.
pub(crate) fn save<R, L>(ledger: &L, record: &R) -> Result<String, ChaincodeError>
where
    R: LedgerRecord,
    L: LedgerStore + ?Sized,
{
    let key = record.ledger_key();
    let bytes = encode_record(record)?;
    ledger.upsert(&key, bytes)?;
    Ok(key)
}

/// Encode `record` and write it only if its key is free.
///
/// Returns false, writing nothing, when the key is already taken.
pub(crate) fn insert_new<R, L>(ledger: &L, record: &R) -> Result<bool, ChaincodeError>
where
    R: LedgerRecord,
    L: LedgerStore + ?Sized,
{
    let bytes = encode_record(record)?;
    Ok(ledger.insert_if_absent(&record.ledger_key(), bytes)?)
}
