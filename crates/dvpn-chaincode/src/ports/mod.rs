//! # Ports
//!
//! - `inbound`: the operations the chaincode offers
//! - `outbound`: ledger, clock and telemetry collaborators it depends on

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
