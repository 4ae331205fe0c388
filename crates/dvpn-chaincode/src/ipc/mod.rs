//! # Transaction Surface
//!
//! Typed transaction envelopes and the handler that dispatches them to the
//! chaincode. The host decodes its invocation into a `TransactionEnvelope`
//! (or hands over raw JSON) and gets back a `TransactionResponse`.
//!
//! Every invocation is stamped with one `TxClock::now()` reading, runs inside a
//! span carrying `tx_id` and `function`, and is recorded in the metrics sink
//! whether it succeeds or not.

pub mod handler;
pub mod payloads;

pub use handler::*;
pub use payloads::*;
