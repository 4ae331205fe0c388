//! # dVPN Chaincode
//!
//! State engine of the dVPN IoT network: device registration, VPN connection
//! bookkeeping, per-device access policies and device health classification,
//! all persisted as records in a transactional key-value ledger owned by the
//! host.
//!
//! ## Components
//!
//! | Component | Location | Records |
//! |-----------|----------|---------|
//! | Device Registry | `service/registry.rs` | `<deviceId>` |
//! | Connection Manager | `service/connections.rs` | `CONN_<deviceId>_<startTime>` |
//! | Access Policy Engine | `service/policies.rs` | `POLICY_<deviceId>` |
//! | Health Monitor | `service/health.rs` | `HEALTH_<deviceId>` |
//!
//! Only the connection manager calls another component (the device registry,
//! for the existence check).
//!
//! ## Outbound Dependencies
//!
//! | Port | Purpose |
//! |------|---------|
//! | `LedgerStore` | Point get / upsert of record bytes |
//! | `TxClock` | Transaction timestamp, read once per invocation |
//! | `ChaincodeMetrics` | Connection counters, health presence gauge, transaction outcomes |
//!
//! ## Invariants
//!
//! - A connection references a device that existed when it was opened.
//! - At most one access policy and one health sample per device; writes replace.
//! - Health status is derived from the sample, never supplied by the caller.
//! - A missing or expired policy denies access; only ledger and decoding
//!   failures are errors.
//!
//! ## Usage Example
//!
//! ```ignore
//! use dvpn_chaincode::prelude::*;
//! use std::sync::Arc;
//!
//! let chaincode = DvpnChaincode::new(
//!     Arc::new(InMemoryLedger::new()),
//!     Arc::new(InMemoryMetrics::new()),
//!     ChaincodeConfig::from_env(),
//! );
//! chaincode.register_device("dev1", "Gateway", 1_700_000_000)?;
//! let id = chaincode.establish_connection("dev1", 1_700_000_000)?;
//! assert_eq!(id, "CONN_dev1_1700000000");
//! ```

// Crate-level lints
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod ipc;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{
        AccessPolicy, Connection, ConnectionStatus, Device, DeviceStatus, HealthState,
        HealthStatus, RecordKind, UnixSeconds,
    };

    // Decision rules
    pub use crate::domain::health::{
        determine_status, AlertLevel, AlertRule, HealthAlert, HealthMetric, MetricBoundsPolicy,
    };
    pub use crate::domain::policy::AccessDecision;

    // Ports
    pub use crate::ports::inbound::DvpnChaincodeApi;
    pub use crate::ports::outbound::{ChaincodeMetrics, LedgerError, LedgerStore, TxClock};

    // Components
    pub use crate::service::{
        AccessPolicyEngine, ConnectionManager, DeviceRegistry, DvpnChaincode, HealthMonitor,
    };

    // Adapters
    pub use crate::adapters::{FixedClock, InMemoryLedger, InMemoryMetrics, SystemClock};
    #[cfg(feature = "prometheus")]
    pub use crate::adapters::PrometheusMetrics;

    // Transactions
    pub use crate::ipc::{
        TransactionEnvelope, TransactionHandler, TransactionPayload, TransactionRequest,
        TransactionResponse,
    };

    // Config & errors
    pub use crate::config::ChaincodeConfig;
    pub use crate::errors::ChaincodeError;
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Chaincode name as deployed on the channel.
pub const CHAINCODE_NAME: &str = "dvpn";
