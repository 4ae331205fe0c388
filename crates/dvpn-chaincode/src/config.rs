//! Chaincode configuration from environment variables.

use crate::domain::health::{AlertRule, HealthMetric, MetricBoundsPolicy, DEFAULT_ALERT_RULES};
use std::env;
use std::str::FromStr;
use tracing::warn;

/// Default bound on the collision suffix of connection ids.
pub const DEFAULT_MAX_CONNECTION_SUFFIX: u32 = 1000;

/// Tunables of the chaincode components.
#[derive(Debug, Clone, PartialEq)]
pub struct ChaincodeConfig {
    /// Handling of metrics outside `[0, 100]`
    pub metric_bounds: MetricBoundsPolicy,

    /// Alert rules evaluated against stored health samples
    pub alert_rules: Vec<AlertRule>,

    /// Largest `_n` suffix tried when a connection id is taken
    pub max_connection_id_suffix: u32,
}

impl Default for ChaincodeConfig {
    fn default() -> Self {
        Self {
            metric_bounds: MetricBoundsPolicy::default(),
            alert_rules: DEFAULT_ALERT_RULES.to_vec(),
            max_connection_id_suffix: DEFAULT_MAX_CONNECTION_SUFFIX,
        }
    }
}

impl ChaincodeConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DVPN_METRIC_BOUNDS`: `accept` or `reject` (default: accept)
    /// - `DVPN_ALERT_CPU`: CPU warning threshold (default: 80)
    /// - `DVPN_ALERT_MEMORY`: memory warning threshold (default: 80)
    /// - `DVPN_ALERT_BANDWIDTH`: bandwidth critical threshold (default: 90)
    /// - `DVPN_MAX_CONNECTION_SUFFIX`: collision suffix bound (default: 1000)
    ///
    /// Unparseable values fall back to the default with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            metric_bounds: parse_or(&lookup, "DVPN_METRIC_BOUNDS", defaults.metric_bounds),
            alert_rules: defaults
                .alert_rules
                .iter()
                .map(|rule| AlertRule {
                    threshold: parse_threshold(&lookup, alert_variable(rule.metric), rule.threshold),
                    ..*rule
                })
                .collect(),
            max_connection_id_suffix: parse_or(
                &lookup,
                "DVPN_MAX_CONNECTION_SUFFIX",
                defaults.max_connection_id_suffix,
            ),
        }
    }
}

fn alert_variable(metric: HealthMetric) -> &'static str {
    match metric {
        HealthMetric::Cpu => "DVPN_ALERT_CPU",
        HealthMetric::Memory => "DVPN_ALERT_MEMORY",
        HealthMetric::Bandwidth => "DVPN_ALERT_BANDWIDTH",
    }
}

/// Alert thresholds must be finite; NaN would silently disable the rule.
fn parse_threshold<F>(lookup: &F, name: &str, fallback: f64) -> f64
where
    F: Fn(&str) -> Option<String>,
{
    let threshold = parse_or(lookup, name, fallback);
    if threshold.is_finite() {
        threshold
    } else {
        warn!(variable = name, value = threshold, "Ignoring non-finite alert threshold");
        fallback
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, fallback: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(variable = name, value = %raw, "Ignoring unparseable setting");
            fallback
        }),
        None => fallback,
    }
}
