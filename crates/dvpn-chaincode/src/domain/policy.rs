//! Access policy evaluation.
//!
//! Evaluation order is fixed: a missing policy denies, then expiry, then an
//! exact membership test on the permission tokens. A denial is a decision,
//! never an error.

use crate::domain::entities::{AccessPolicy, UnixSeconds};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of an access check, with the reason for a denial.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessDecision {
    Granted,
    /// No policy stored for the device.
    NoPolicy,
    /// The policy stopped being valid after `valid_until`.
    Expired {
        #[serde(rename = "validUntil")]
        valid_until: UnixSeconds,
    },
    /// The policy is live but does not list the permission.
    PermissionMissing,
}

impl AccessDecision {
    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

impl fmt::Display for AccessDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Granted => f.write_str("granted"),
            Self::NoPolicy => f.write_str("no policy"),
            Self::Expired { valid_until } => write!(f, "expired after {valid_until}"),
            Self::PermissionMissing => f.write_str("permission missing"),
        }
    }
}

/// Decide whether `policy` grants `required` at time `now`.
#[must_use]
pub fn evaluate_access(
    policy: Option<&AccessPolicy>,
    required: &str,
    now: UnixSeconds,
) -> AccessDecision {
    let Some(policy) = policy else {
        return AccessDecision::NoPolicy;
    };
    if policy.is_expired_at(now) {
        return AccessDecision::Expired {
            valid_until: policy.valid_until,
        };
    }
    if policy.grants(required) {
        AccessDecision::Granted
    } else {
        AccessDecision::PermissionMissing
    }
}
