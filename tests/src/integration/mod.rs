//! # Integration Tests
//!
//! Scenarios that span more than one chaincode component or crate.

pub mod flows;
pub mod telemetry;
