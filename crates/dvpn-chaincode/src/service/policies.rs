use super::store::{load, require, save};
use crate::domain::entities::{AccessPolicy, UnixSeconds};
use crate::domain::keys::policy_key;
use crate::domain::policy::{evaluate_access, AccessDecision};
use crate::errors::ChaincodeError;
use crate::ports::LedgerStore;
use std::sync::Arc;
use tracing::{debug, info};

/// Stores per-device access policies and answers access checks.
pub struct AccessPolicyEngine<L: LedgerStore> {
    ledger: Arc<L>,
}

impl<L: LedgerStore> AccessPolicyEngine<L> {
    pub fn new(ledger: Arc<L>) -> Self {
        Self { ledger }
    }

    /// Store the policy for `device_id`, replacing any previous one entirely.
    ///
    /// The device does not have to be registered.
    pub fn create(
        &self,
        device_id: &str,
        permissions: Vec<String>,
        valid_until: UnixSeconds,
    ) -> Result<(), ChaincodeError> {
        let policy = AccessPolicy::new(device_id, permissions, valid_until);
        save(self.ledger.as_ref(), &policy)?;

        info!(
            device_id = %device_id,
            permissions = ?policy.permissions,
            valid_until,
            "Access policy stored"
        );
        Ok(())
    }

    pub fn get(&self, device_id: &str) -> Result<AccessPolicy, ChaincodeError> {
        require(self.ledger.as_ref(), &policy_key(device_id))
    }

    /// Decide `permission` for `device_id` at `now`, with the reason.
    ///
    /// A missing or expired policy is a denial; only ledger and decoding
    /// failures are errors.
    pub fn evaluate(
        &self,
        device_id: &str,
        permission: &str,
        now: UnixSeconds,
    ) -> Result<AccessDecision, ChaincodeError> {
        let policy: Option<AccessPolicy> = load(self.ledger.as_ref(), &policy_key(device_id))?;
        let decision = evaluate_access(policy.as_ref(), permission, now);

        debug!(
            device_id = %device_id,
            permission = %permission,
            now,
            decision = %decision,
            "Access evaluated"
        );
        Ok(decision)
    }

    pub fn check(
        &self,
        device_id: &str,
        permission: &str,
        now: UnixSeconds,
    ) -> Result<bool, ChaincodeError> {
        Ok(self.evaluate(device_id, permission, now)?.is_granted())
    }
}
