//! # Domain Layer
//!
//! Entities, ledger key naming, the record codec and the pure decision rules
//! (health classification, alerting, access evaluation). Nothing here touches
//! the ledger.

pub mod codec;
pub mod entities;
pub mod health;
pub mod keys;
pub mod policy;

pub use codec::{decode_record, encode_record, LedgerRecord};
pub use entities::*;
pub use health::{
    check_bounds, determine_status, evaluate_alerts, AlertLevel, AlertRule, HealthAlert,
    HealthMetric, MetricBoundsPolicy, CRITICAL_THRESHOLD, DEFAULT_ALERT_RULES,
    WARNING_THRESHOLD,
};
pub use keys::*;
pub use policy::{evaluate_access, AccessDecision};
