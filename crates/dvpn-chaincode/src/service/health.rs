use super::store::{require, save};
use crate::domain::entities::{HealthStatus, UnixSeconds};
use crate::domain::health::{check_bounds, evaluate_alerts, AlertRule, HealthAlert, MetricBoundsPolicy};
use crate::domain::keys::health_key;
use crate::errors::ChaincodeError;
use crate::ports::{ChaincodeMetrics, LedgerStore};
use std::sync::Arc;
use tracing::{info, warn};

/// Records device telemetry samples and classifies them.
pub struct HealthMonitor<L: LedgerStore, M: ChaincodeMetrics> {
    ledger: Arc<L>,
    metrics: Arc<M>,
    bounds: MetricBoundsPolicy,
    alert_rules: Vec<AlertRule>,
}

impl<L: LedgerStore, M: ChaincodeMetrics> HealthMonitor<L, M> {
    pub fn new(
        ledger: Arc<L>,
        metrics: Arc<M>,
        bounds: MetricBoundsPolicy,
        alert_rules: Vec<AlertRule>,
    ) -> Self {
        Self {
            ledger,
            metrics,
            bounds,
            alert_rules,
        }
    }

    /// Store the latest sample for `device_id`, replacing the previous one.
    ///
    /// The presence gauge is only touched once the record is written.
    pub fn update(
        &self,
        device_id: &str,
        cpu: f64,
        memory: f64,
        bandwidth: f64,
        now: UnixSeconds,
    ) -> Result<HealthStatus, ChaincodeError> {
        for (metric, value) in check_bounds(cpu, memory, bandwidth, self.bounds)? {
            warn!(device_id = %device_id, %metric, value, "Metric outside 0-100 accepted");
        }

        let status = HealthStatus::classify(device_id, cpu, memory, bandwidth, now);
        save(self.ledger.as_ref(), &status)?;
        self.metrics.health_reported(device_id, status.status);

        info!(
            device_id = %device_id,
            cpu,
            memory,
            bandwidth,
            status = %status.status,
            "Health status updated"
        );

        for alert in evaluate_alerts(&status, &self.alert_rules) {
            warn!(
                device_id = %device_id,
                level = ?alert.level,
                threshold = alert.threshold,
                "{}",
                alert.message()
            );
        }
        Ok(status)
    }

    pub fn get(&self, device_id: &str) -> Result<HealthStatus, ChaincodeError> {
        require(self.ledger.as_ref(), &health_key(device_id))
    }

    /// Alerts raised by the stored sample of `device_id`, most severe first.
    pub fn check_alerts(&self, device_id: &str) -> Result<Vec<HealthAlert>, ChaincodeError> {
        let status = self.get(device_id)?;
        Ok(evaluate_alerts(&status, &self.alert_rules))
    }
}
