//! # dVPN Telemetry
//!
//! Observability for the dVPN IoT chaincode.
//!
//! ## Components
//!
//! - **Logging**: `tracing` subscriber with env-filter, pretty or JSON output
//! - **Metrics**: Prometheus registry polled by external monitoring
//!
//! Exporting (an HTTP scrape endpoint, log shipping) is left to the process that
//! hosts the chaincode; this crate only owns the registry and the subscriber.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dvpn_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env()).expect("telemetry");
//!     // chaincode runs here
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DVPN_SERVICE_NAME` | `dvpn-chaincode` | Service name in logs |
//! | `DVPN_LOG_LEVEL` | `info` | Log level filter |
//! | `DVPN_JSON_LOGS` | `false` | JSON log output |
//! | `DVPN_CHANNEL` | `dvpnchannel` | Channel the chaincode serves |

mod config;
pub mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::{init_logging, LoggingHandle};
pub use metrics::{
    encode_metrics, register_metrics, set_device_health, MetricsHandle,
    CHAINCODE_ERRORS, DEVICE_HEALTH_STATUS, HEALTH_STATUS_LABELS, REGISTRY,
    TRANSACTIONS_TOTAL, TRANSACTION_DURATION, VPN_ACTIVE_CONNECTIONS, VPN_CONNECTIONS_TOTAL,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and register metrics.
///
/// Returns a guard that must be held for the lifetime of the host process.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    if config.service_name.trim().is_empty() {
        return Err(TelemetryError::Config("service name is empty".to_string()));
    }

    // Metrics first, so anything logged during startup can already be counted
    let metrics_handle = register_metrics()?;
    let logging_handle = init_logging(&config)?;

    crate::log_event!(
        info,
        "telemetry",
        "Telemetry initialized",
        service = %config.qualified_service_name()
    );

    Ok(TelemetryGuard {
        _logging: logging_handle,
        _metrics: metrics_handle,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _logging: LoggingHandle,
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        crate::log_event!(info, "telemetry", "Shutting down telemetry...");
    }
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}

/// Convenience macro for recording a metric with a value.
#[macro_export]
macro_rules! metric_observe {
    ($metric:expr, $value:expr) => {
        $metric.observe($value)
    };
    ($metric:expr, $labels:expr, $value:expr) => {
        $metric.with_label_values($labels).observe($value)
    };
}
