//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for logging and metrics.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error)
    pub log_level: String,

    /// Whether to enable console output (for development)
    pub console_output: bool,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,

    /// Channel the chaincode is deployed on (recorded in logs only)
    pub channel: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "dvpn-chaincode".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            channel: "dvpnchannel".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DVPN_SERVICE_NAME`: Service name (default: dvpn-chaincode)
    /// - `DVPN_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `DVPN_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `DVPN_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    /// - `DVPN_CHANNEL`: Channel name (default: dvpnchannel)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("DVPN_SERVICE_NAME")
                .unwrap_or_else(|_| "dvpn-chaincode".to_string()),

            log_level: env::var("DVPN_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("DVPN_CONSOLE_OUTPUT")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),

            json_logs: env::var("DVPN_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),

            channel: env::var("DVPN_CHANNEL").unwrap_or_else(|_| "dvpnchannel".to_string()),
        }
    }

    /// Service name qualified by channel, e.g. `dvpn-chaincode@dvpnchannel`.
    pub fn qualified_service_name(&self) -> String {
        if self.channel.is_empty() {
            self.service_name.clone()
        } else {
            format!("{}@{}", self.service_name, self.channel)
        }
    }
}
