//! # Telemetry Adapters
//!
//! - `InMemoryMetrics`: atomics and maps, readable back in tests
//! - `PrometheusMetrics`: forwards to the process-wide registry in `dvpn-telemetry`

use crate::domain::entities::HealthState;
use crate::errors::ChaincodeError;
use crate::ports::ChaincodeMetrics;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

const OUTCOME_OK: &str = "ok";
const OUTCOME_ERROR: &str = "error";

fn outcome(error: Option<&ChaincodeError>) -> &'static str {
    if error.is_some() {
        OUTCOME_ERROR
    } else {
        OUTCOME_OK
    }
}

// =============================================================================
// IN-MEMORY
// =============================================================================

/// Metrics sink that keeps everything in process memory.
#[derive(Debug, Default)]
pub struct InMemoryMetrics {
    connections_total: AtomicU64,
    active_connections: AtomicI64,
    health: RwLock<HashMap<String, HealthState>>,
    transactions: RwLock<HashMap<(String, &'static str), u64>>,
    errors: RwLock<HashMap<(String, &'static str), u64>>,
}

impl InMemoryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the established-connections counter.
    pub fn connections_total(&self) -> u64 {
        self.connections_total.load(Ordering::SeqCst)
    }

    /// Value of the active-connections gauge.
    pub fn active_connections(&self) -> i64 {
        self.active_connections.load(Ordering::SeqCst)
    }

    /// Presence gauge value for `(device_id, status)`.
    pub fn health_presence(&self, device_id: &str, status: HealthState) -> f64 {
        match self.health.read().get(device_id) {
            Some(current) if *current == status => 1.0,
            _ => 0.0,
        }
    }

    /// Status currently marked present for `device_id`.
    pub fn current_health(&self, device_id: &str) -> Option<HealthState> {
        self.health.read().get(device_id).copied()
    }

    /// Finished transactions of `function` with the given outcome (`ok` or `error`).
    pub fn transactions(&self, function: &str, outcome: &str) -> u64 {
        self.transactions
            .read()
            .iter()
            .filter(|((f, o), _)| f == function && *o == outcome)
            .map(|(_, count)| *count)
            .sum()
    }

    /// Failed transactions of `function` with the given error label.
    pub fn errors(&self, function: &str, error_type: &str) -> u64 {
        self.errors
            .read()
            .iter()
            .filter(|((f, e), _)| f == function && *e == error_type)
            .map(|(_, count)| *count)
            .sum()
    }
}

impl ChaincodeMetrics for InMemoryMetrics {
    fn connection_established(&self) {
        self.connections_total.fetch_add(1, Ordering::SeqCst);
        self.active_connections.fetch_add(1, Ordering::SeqCst);
    }

    fn connection_closed(&self) {
        // Connections opened before this process started are not counted
        let _ = self
            .active_connections
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| (v > 0).then(|| v - 1));
    }

    fn health_reported(&self, device_id: &str, status: HealthState) {
        self.health.write().insert(device_id.to_string(), status);
    }

    fn transaction_finished(
        &self,
        function: &str,
        error: Option<&ChaincodeError>,
        _elapsed: Duration,
    ) {
        *self
            .transactions
            .write()
            .entry((function.to_string(), outcome(error)))
            .or_default() += 1;

        if let Some(err) = error {
            *self
                .errors
                .write()
                .entry((function.to_string(), err.kind()))
                .or_default() += 1;
        }
    }
}

// =============================================================================
// PROMETHEUS
// =============================================================================

/// Metrics sink backed by the `dvpn-telemetry` registry.
///
/// The registry is process-wide, so every instance writes the same series.
#[cfg(feature = "prometheus")]
#[derive(Clone, Copy, Debug, Default)]
pub struct PrometheusMetrics;

#[cfg(feature = "prometheus")]
impl ChaincodeMetrics for PrometheusMetrics {
    fn connection_established(&self) {
        dvpn_telemetry::metric_inc!(dvpn_telemetry::VPN_CONNECTIONS_TOTAL);
        dvpn_telemetry::VPN_ACTIVE_CONNECTIONS.inc();
    }

    fn connection_closed(&self) {
        if dvpn_telemetry::VPN_ACTIVE_CONNECTIONS.get() > 0.0 {
            dvpn_telemetry::VPN_ACTIVE_CONNECTIONS.dec();
        }
    }

    fn health_reported(&self, device_id: &str, status: HealthState) {
        dvpn_telemetry::set_device_health(device_id, status.as_str());
    }

    fn transaction_finished(
        &self,
        function: &str,
        error: Option<&ChaincodeError>,
        elapsed: Duration,
    ) {
        dvpn_telemetry::metric_inc!(
            dvpn_telemetry::TRANSACTIONS_TOTAL,
            &[function, outcome(error)]
        );
        dvpn_telemetry::metric_observe!(
            dvpn_telemetry::TRANSACTION_DURATION,
            &[function],
            elapsed.as_secs_f64()
        );
        if let Some(err) = error {
            dvpn_telemetry::metric_inc!(dvpn_telemetry::CHAINCODE_ERRORS, &[function, err.kind()]);
        }
    }
}
