use crate::ports::{LedgerError, LedgerStore};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

/// In-memory implementation of LedgerStore for testing and local runs.
///
/// Reads or writes can be made to fail to exercise storage error paths.
pub struct InMemoryLedger {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make every subsequent `get` fail with `Unavailable`.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `upsert` fail with `WriteRejected`.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of stored keys.
    pub fn len(&self) -> Result<usize, LedgerError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| LedgerError::LockPoisoned)?;
        Ok(entries.len())
    }

    pub fn is_empty(&self) -> Result<bool, LedgerError> {
        Ok(self.len()? == 0)
    }

    /// Stored keys in lexical order.
    pub fn keys(&self) -> Result<Vec<String>, LedgerError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| LedgerError::LockPoisoned)?;
        Ok(entries.keys().cloned().collect())
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for InMemoryLedger {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(LedgerError::Unavailable(format!("read of {key} failed")));
        }
        let entries = self
            .entries
            .read()
            .map_err(|_| LedgerError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn upsert(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(LedgerError::WriteRejected {
                key: key.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        let mut entries = self
            .entries
            .write()
            .map_err(|_| LedgerError::LockPoisoned)?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn insert_if_absent(&self, key: &str, value: Vec<u8>) -> Result<bool, LedgerError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(LedgerError::WriteRejected {
                key: key.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        let mut entries = self
            .entries
            .write()
            .map_err(|_| LedgerError::LockPoisoned)?;
        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(key.to_string(), value);
        Ok(true)
    }
}
