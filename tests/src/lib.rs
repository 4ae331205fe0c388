//! # dVPN Chaincode Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/   # Cross-component scenarios over one ledger
//! │   ├── flows.rs       # Device → connection → policy → health lifecycles
//! │   ├── concurrency.rs # Parallel invocations through the handler
//! │   └── telemetry.rs   # Prometheus adapter and registry export
//! └── benches/           # Criterion benchmarks
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p dvpn-tests
//! cargo test -p dvpn-tests integration::flows
//! cargo bench -p dvpn-tests
//! ```

pub mod integration;

use dvpn_chaincode::prelude::*;
use std::sync::Arc;

/// Chaincode, handler and the collaborators behind them, over a fresh ledger.
pub struct TestNetwork {
    pub ledger: Arc<InMemoryLedger>,
    pub metrics: Arc<InMemoryMetrics>,
    pub clock: Arc<FixedClock>,
    pub chaincode: Arc<DvpnChaincode<InMemoryLedger, InMemoryMetrics>>,
    pub handler: TransactionHandler<
        DvpnChaincode<InMemoryLedger, InMemoryMetrics>,
        FixedClock,
        InMemoryMetrics,
    >,
}

impl TestNetwork {
    pub fn new(now: UnixSeconds) -> Self {
        Self::with_config(now, ChaincodeConfig::default())
    }

    pub fn with_config(now: UnixSeconds, config: ChaincodeConfig) -> Self {
        init_test_logging();

        let ledger = Arc::new(InMemoryLedger::new());
        let metrics = Arc::new(InMemoryMetrics::new());
        let clock = Arc::new(FixedClock::new(now));
        let chaincode = Arc::new(DvpnChaincode::new(
            Arc::clone(&ledger),
            Arc::clone(&metrics),
            config,
        ));
        let handler = TransactionHandler::new(
            Arc::clone(&chaincode),
            Arc::clone(&clock),
            Arc::clone(&metrics),
        );

        Self {
            ledger,
            metrics,
            clock,
            chaincode,
            handler,
        }
    }

    /// Invoke `request` through the handler at the current clock reading.
    pub fn invoke(&self, request: TransactionRequest) -> Result<TransactionPayload, ChaincodeError> {
        self.handler
            .invoke(TransactionEnvelope::new(request))
            .map(|response| response.payload)
    }
}

/// Route chaincode logs to the test harness writer. Safe to call repeatedly.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}
