//! # Adapters
//!
//! In-process implementations of the outbound ports, plus the Prometheus
//! telemetry adapter when the `prometheus` feature is on.

pub mod clock;
pub mod memory_ledger;
pub mod metrics;

pub use clock::{FixedClock, SystemClock};
pub use memory_ledger::InMemoryLedger;
pub use metrics::InMemoryMetrics;
#[cfg(feature = "prometheus")]
pub use metrics::PrometheusMetrics;
