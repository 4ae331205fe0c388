//! # Chaincode Components
//!
//! One component per record kind, plus the `DvpnChaincode` aggregate that
//! implements the inbound API. Components share the ledger through `Arc` and
//! call each other only in one place: the connection manager asks the device
//! registry whether a device exists.

mod chaincode;
mod connections;
mod health;
mod policies;
mod registry;
mod store;

pub use chaincode::DvpnChaincode;
pub use connections::ConnectionManager;
pub use health::HealthMonitor;
pub use policies::AccessPolicyEngine;
pub use registry::DeviceRegistry;
