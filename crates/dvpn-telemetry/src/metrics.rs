//! Prometheus metrics for the dVPN chaincode.
//!
//! The two metrics external dashboards already poll keep their historical names
//! (`vpn_connections_total`, `device_health_status`). Everything added on top follows
//! `dvpn_<area>_<metric>_<unit>`.
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., vpn_connections_total)
//! - **Gauge**: Value that can go up or down (e.g., vpn_active_connections)
//! - **Histogram**: Distribution of values (e.g., dvpn_transaction_duration_seconds)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, GaugeVec,
    HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

/// Label values of `device_health_status{status=...}`.
pub const HEALTH_STATUS_LABELS: [&str; 3] = ["HEALTHY", "WARNING", "CRITICAL"];

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // CONNECTION METRICS
    // =========================================================================

    /// Total VPN connections established
    pub static ref VPN_CONNECTIONS_TOTAL: Counter = Counter::new(
        "vpn_connections_total",
        "Total number of VPN connections established"
    ).expect("metric creation failed");

    /// Connections established and not yet closed
    pub static ref VPN_ACTIVE_CONNECTIONS: Gauge = Gauge::new(
        "vpn_active_connections",
        "Number of active VPN connections"
    ).expect("metric creation failed");

    // =========================================================================
    // HEALTH METRICS
    // =========================================================================

    /// Presence indicator: 1 for a device's current status, 0 for the others
    pub static ref DEVICE_HEALTH_STATUS: GaugeVec = GaugeVec::new(
        Opts::new("device_health_status", "Current health status of devices"),
        &["device_id", "status"]
    ).expect("metric creation failed");

    // =========================================================================
    // TRANSACTION METRICS
    // =========================================================================

    /// Transactions handled, by function and outcome (ok/error)
    pub static ref TRANSACTIONS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("dvpn_transactions_total", "Chaincode transactions handled"),
        &["function", "outcome"]
    ).expect("metric creation failed");

    /// Transaction handling duration
    pub static ref TRANSACTION_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "dvpn_transaction_duration_seconds",
            "Time spent handling a chaincode transaction"
        ).buckets(exponential_buckets(0.00001, 2.0, 15).unwrap()),
        &["function"]
    ).expect("metric creation failed");

    // =========================================================================
    // ERROR METRICS
    // =========================================================================

    /// Chaincode errors by function and error type
    pub static ref CHAINCODE_ERRORS: CounterVec = CounterVec::new(
        Opts::new("dvpn_chaincode_errors_total", "Errors by function and type"),
        &["function", "error_type"]
    ).expect("metric creation failed");
}

/// Handle to the populated registry
pub struct MetricsHandle {
    registry: Arc<Registry>,
}

impl MetricsHandle {
    /// Registry the chaincode metrics were registered with.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

/// Register all metrics with the global registry.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Connections
        Box::new(VPN_CONNECTIONS_TOTAL.clone()),
        Box::new(VPN_ACTIVE_CONNECTIONS.clone()),
        // Health
        Box::new(DEVICE_HEALTH_STATUS.clone()),
        // Transactions
        Box::new(TRANSACTIONS_TOTAL.clone()),
        Box::new(TRANSACTION_DURATION.clone()),
        // Errors
        Box::new(CHAINCODE_ERRORS.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(MetricsHandle {
        registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Mark `status` as the current health status of `device_id`.
///
/// Clears the other two status labels for the device so exactly one reads 1.
pub fn set_device_health(device_id: &str, status: &str) {
    for label in HEALTH_STATUS_LABELS {
        let value = if label == status { 1.0 } else { 0.0 };
        DEVICE_HEALTH_STATUS
            .with_label_values(&[device_id, label])
            .set(value);
    }
}
