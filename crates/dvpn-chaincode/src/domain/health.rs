//! # Health Classification
//!
//! Pure threshold rules over the three telemetry metrics.
//!
//! | Rule | Result |
//! |------|--------|
//! | any metric `> 90` | `CRITICAL` |
//! | else any metric `> 70` | `WARNING` |
//! | else | `HEALTHY` |
//!
//! Comparisons are strict: exactly 90 is `WARNING`, exactly 70 is `HEALTHY`.
//!
//! Alert rules are a separate, configurable layer evaluated against a stored
//! sample. They never change the stored classification.

use crate::domain::entities::{HealthState, HealthStatus};
use crate::errors::ChaincodeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A metric above this is `CRITICAL`.
pub const CRITICAL_THRESHOLD: f64 = 90.0;

/// A metric above this is at least `WARNING`.
pub const WARNING_THRESHOLD: f64 = 70.0;

/// Classify a telemetry sample.
#[must_use]
pub fn determine_status(cpu: f64, memory: f64, bandwidth: f64) -> HealthState {
    let any_above = |threshold: f64| cpu > threshold || memory > threshold || bandwidth > threshold;

    if any_above(CRITICAL_THRESHOLD) {
        HealthState::Critical
    } else if any_above(WARNING_THRESHOLD) {
        HealthState::Warning
    } else {
        HealthState::Healthy
    }
}

// =============================================================================
// METRICS & BOUNDS
// =============================================================================

/// One of the three reported metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthMetric {
    Cpu,
    Memory,
    Bandwidth,
}

impl HealthMetric {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Memory => "memory",
            Self::Bandwidth => "bandwidth",
        }
    }

    /// Value of this metric in a stored sample.
    #[must_use]
    pub fn read(self, status: &HealthStatus) -> f64 {
        match self {
            Self::Cpu => status.cpu,
            Self::Memory => status.memory,
            Self::Bandwidth => status.bandwidth,
        }
    }
}

impl fmt::Display for HealthMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do with a metric outside `[0, 100]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MetricBoundsPolicy {
    /// Store and classify the value as reported.
    #[default]
    Accept,
    /// Fail the update with `InvalidMetric`.
    Reject,
}

impl FromStr for MetricBoundsPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "accept" => Ok(Self::Accept),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown metric bounds policy: {other}")),
        }
    }
}

/// Check a sample against `policy`.
///
/// Non-finite values are rejected under either policy. Returns the metrics that
/// are out of range but were accepted, so the caller can log them.
pub fn check_bounds(
    cpu: f64,
    memory: f64,
    bandwidth: f64,
    policy: MetricBoundsPolicy,
) -> Result<Vec<(HealthMetric, f64)>, ChaincodeError> {
    let sample = [
        (HealthMetric::Cpu, cpu),
        (HealthMetric::Memory, memory),
        (HealthMetric::Bandwidth, bandwidth),
    ];

    let mut out_of_range = Vec::new();
    for (metric, value) in sample {
        if !value.is_finite() {
            return Err(ChaincodeError::InvalidMetric {
                metric: metric.as_str(),
                value,
            });
        }
        if !(0.0..=100.0).contains(&value) {
            if policy == MetricBoundsPolicy::Reject {
                return Err(ChaincodeError::InvalidMetric {
                    metric: metric.as_str(),
                    value,
                });
            }
            out_of_range.push((metric, value));
        }
    }
    Ok(out_of_range)
}

// =============================================================================
// ALERTS
// =============================================================================

/// Severity of a raised alert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Warning,
    Critical,
}

/// Raise an alert at `level` when `metric` is strictly above `threshold`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlertRule {
    pub metric: HealthMetric,
    pub threshold: f64,
    pub level: AlertLevel,
}

impl AlertRule {
    #[must_use]
    pub const fn new(metric: HealthMetric, threshold: f64, level: AlertLevel) -> Self {
        Self {
            metric,
            threshold,
            level,
        }
    }
}

/// Rules used when none are configured.
pub const DEFAULT_ALERT_RULES: [AlertRule; 3] = [
    AlertRule::new(HealthMetric::Cpu, 80.0, AlertLevel::Warning),
    AlertRule::new(HealthMetric::Memory, 80.0, AlertLevel::Warning),
    AlertRule::new(HealthMetric::Bandwidth, 90.0, AlertLevel::Critical),
];

/// An alert raised against a stored sample.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthAlert {
    pub device_id: String,
    pub metric: HealthMetric,
    pub value: f64,
    pub threshold: f64,
    pub level: AlertLevel,
    pub timestamp: i64,
}

impl HealthAlert {
    /// Human-readable summary, e.g. `High cpu usage: 85%`.
    #[must_use]
    pub fn message(&self) -> String {
        format!("High {} usage: {}%", self.metric, self.value)
    }
}

/// Evaluate `rules` against a stored sample, most severe alerts first.
#[must_use]
pub fn evaluate_alerts(status: &HealthStatus, rules: &[AlertRule]) -> Vec<HealthAlert> {
    let mut alerts: Vec<HealthAlert> = rules
        .iter()
        .filter_map(|rule| {
            let value = rule.metric.read(status);
            (value > rule.threshold).then(|| HealthAlert {
                device_id: status.device_id.clone(),
                metric: rule.metric,
                value,
                threshold: rule.threshold,
                level: rule.level,
                timestamp: status.timestamp,
            })
        })
        .collect();
    alerts.sort_by(|a, b| b.level.cmp(&a.level));
    alerts
}
