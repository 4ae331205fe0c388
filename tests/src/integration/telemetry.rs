//! # Telemetry Integration
//!
//! The Prometheus adapter writes into the process-wide registry owned by
//! `dvpn-telemetry`; these tests read the series back through the registry and
//! the text exporter.

#[cfg(test)]
mod tests {
    use dvpn_chaincode::prelude::*;
    use dvpn_telemetry::{
        encode_metrics, register_metrics, DEVICE_HEALTH_STATUS, TRANSACTIONS_TOTAL,
        VPN_CONNECTIONS_TOTAL,
    };
    use std::sync::Arc;

    fn prometheus_chaincode() -> (
        Arc<FixedClock>,
        TransactionHandler<DvpnChaincode<InMemoryLedger, PrometheusMetrics>, FixedClock, PrometheusMetrics>,
    ) {
        crate::init_test_logging();
        // Registration fails if another test got there first
        let _ = register_metrics();

        let metrics = Arc::new(PrometheusMetrics);
        let clock = Arc::new(FixedClock::new(1_000));
        let chaincode = Arc::new(DvpnChaincode::new(
            Arc::new(InMemoryLedger::new()),
            Arc::clone(&metrics),
            ChaincodeConfig::default(),
        ));
        (
            Arc::clone(&clock),
            TransactionHandler::new(chaincode, clock, metrics),
        )
    }

    #[test]
    fn test_connection_counter_and_export() {
        let (_, handler) = prometheus_chaincode();
        handler
            .invoke(TransactionEnvelope::new(TransactionRequest::RegisterDevice {
                id: "telemetry-dev1".into(),
                name: "gateway".into(),
                ip_address: None,
            }))
            .unwrap();

        let before = VPN_CONNECTIONS_TOTAL.get();
        handler
            .invoke(TransactionEnvelope::new(
                TransactionRequest::EstablishConnection {
                    device_id: "telemetry-dev1".into(),
                },
            ))
            .unwrap();
        // Other tests share the counter, so only a lower bound holds
        assert!(VPN_CONNECTIONS_TOTAL.get() >= before + 1.0);

        let ok = TRANSACTIONS_TOTAL
            .with_label_values(&["EstablishConnection", "ok"])
            .get();
        assert!(ok >= 1.0);

        let text = encode_metrics().unwrap();
        assert!(text.contains("vpn_connections_total"));
        assert!(text.contains("dvpn_transactions_total"));
    }

    #[test]
    fn test_health_gauge_is_exclusive_per_device() {
        let (clock, handler) = prometheus_chaincode();
        for cpu in [95.0, 40.0] {
            clock.advance(1);
            handler
                .invoke(TransactionEnvelope::new(
                    TransactionRequest::UpdateHealthStatus {
                        device_id: "telemetry-dev2".into(),
                        cpu,
                        memory: 0.0,
                        bandwidth: 0.0,
                    },
                ))
                .unwrap();
        }

        let read = |status: &str| {
            DEVICE_HEALTH_STATUS
                .with_label_values(&["telemetry-dev2", status])
                .get()
        };
        assert_eq!(read("HEALTHY"), 1.0);
        assert_eq!(read("WARNING"), 0.0);
        assert_eq!(read("CRITICAL"), 0.0);
    }

    #[test]
    fn test_failed_transactions_are_labelled() {
        let (_, handler) = prometheus_chaincode();
        let err = handler
            .invoke(TransactionEnvelope::new(TransactionRequest::GetDevice {
                id: "telemetry-missing".into(),
            }))
            .unwrap_err();
        assert_eq!(err.kind(), "not_found");

        let errors = dvpn_telemetry::CHAINCODE_ERRORS
            .with_label_values(&["GetDevice", "not_found"])
            .get();
        assert!(errors >= 1.0);
    }
}
