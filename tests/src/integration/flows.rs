//! # Integration Test Flows
//!
//! End-to-end lifecycles through the transaction handler, with every component
//! sharing one ledger:
//!
//! 1. **Registration → connection**: connections only for registered devices
//! 2. **Policy → access check**: denial vs. failure, inclusive expiry
//! 3. **Health report → alerts**: classification, presence gauge, alert rules
//! 4. **Stored records**: records already on the ledger stay readable

#[cfg(test)]
mod tests {
    use crate::TestNetwork;
    use dvpn_chaincode::prelude::*;
    use serde_json::json;
    use uuid::Uuid;

    fn register(net: &TestNetwork, id: &str) {
        net.invoke(TransactionRequest::RegisterDevice {
            id: id.to_string(),
            name: format!("{id} gateway"),
            ip_address: None,
        })
        .unwrap();
    }

    fn check(net: &TestNetwork, device_id: &str, permission: &str) -> bool {
        match net
            .invoke(TransactionRequest::CheckAccess {
                device_id: device_id.to_string(),
                permission: permission.to_string(),
            })
            .unwrap()
        {
            TransactionPayload::Access { granted, .. } => granted,
            other => panic!("unexpected payload {other:?}"),
        }
    }

    // =============================================================================
    // DEVICES & CONNECTIONS
    // =============================================================================

    #[test]
    fn test_connection_lifecycle() {
        let net = TestNetwork::new(1_700_000_000);
        register(&net, "dev1");

        let id = match net
            .invoke(TransactionRequest::EstablishConnection {
                device_id: "dev1".into(),
            })
            .unwrap()
        {
            TransactionPayload::ConnectionId(id) => id,
            other => panic!("unexpected payload {other:?}"),
        };
        assert_eq!(id, "CONN_dev1_1700000000");
        assert_eq!(net.metrics.connections_total(), 1);
        assert_eq!(net.metrics.active_connections(), 1);

        net.clock.advance(90);
        let closed = net
            .invoke(TransactionRequest::CloseConnection {
                connection_id: id.clone(),
            })
            .unwrap();
        match closed {
            TransactionPayload::Connection(c) => {
                assert_eq!(c.status, ConnectionStatus::Closed);
                assert_eq!(c.end_time, 1_700_000_090);
                assert_eq!(c.ended_at(), Some(1_700_000_090));
            }
            other => panic!("unexpected payload {other:?}"),
        }
        assert_eq!(net.metrics.active_connections(), 0);

        // Closing again is an illegal transition
        assert!(matches!(
            net.invoke(TransactionRequest::CloseConnection { connection_id: id }),
            Err(ChaincodeError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_unknown_device_connection_writes_nothing() {
        let net = TestNetwork::new(10);

        let err = net
            .invoke(TransactionRequest::EstablishConnection {
                device_id: "ghost".into(),
            })
            .unwrap_err();
        assert_eq!(err.to_string(), "device does not exist: ghost");
        assert!(net.ledger.is_empty().unwrap());
        assert_eq!(net.metrics.connections_total(), 0);
    }

    #[test]
    fn test_same_second_connections_are_distinct() {
        let net = TestNetwork::new(77);
        register(&net, "dev1");

        let ids: Vec<String> = (0..3)
            .map(|_| net.chaincode.establish_connection("dev1", 77).unwrap())
            .collect();
        assert_eq!(ids, vec!["CONN_dev1_77", "CONN_dev1_77_1", "CONN_dev1_77_2"]);

        for id in &ids {
            assert!(net.chaincode.get_connection(id).unwrap().is_active());
        }
    }

    #[test]
    fn test_device_id_cannot_shadow_other_records() {
        let net = TestNetwork::new(1);
        net.chaincode
            .create_access_policy("dev1", vec!["connect".into()], 100)
            .unwrap();

        let err = net
            .invoke(TransactionRequest::RegisterDevice {
                id: "POLICY_dev1".into(),
                name: "evil".into(),
                ip_address: None,
            })
            .unwrap_err();
        assert!(matches!(err, ChaincodeError::InvalidArgument(_)));
        assert!(net.chaincode.check_access("dev1", "connect", 50).unwrap());
    }

    // =============================================================================
    // ACCESS POLICIES
    // =============================================================================

    #[test]
    fn test_access_scenario() {
        let net = TestNetwork::new(1);
        register(&net, "dev1");
        net.invoke(TransactionRequest::CreateAccessPolicy {
            device_id: "dev1".into(),
            permissions: vec!["connect".into()],
            valid_until: 1000,
        })
        .unwrap();

        net.clock.set(500);
        assert!(check(&net, "dev1", "connect"));
        assert!(!check(&net, "dev1", "admin"));

        net.clock.set(1000);
        assert!(check(&net, "dev1", "connect"));

        net.clock.set(1001);
        assert!(!check(&net, "dev1", "connect"));
    }

    #[test]
    fn test_unregistered_device_is_denied() {
        let net = TestNetwork::new(1);
        assert!(!check(&net, "nobody", "connect"));
        assert_eq!(net.metrics.transactions("CheckAccess", "ok"), 1);
    }

    #[test]
    fn test_policy_replacement() {
        let net = TestNetwork::new(1);
        net.chaincode
            .create_access_policy("dev1", vec!["connect".into()], 1000)
            .unwrap();
        net.chaincode
            .create_access_policy("dev1", vec!["admin".into(), "admin".into()], 5000)
            .unwrap();

        let policy = net.chaincode.get_access_policy("dev1").unwrap();
        assert_eq!(policy.permissions, vec!["admin", "admin"]);
        assert_eq!(policy.valid_until, 5000);
        assert!(!net.chaincode.check_access("dev1", "connect", 2).unwrap());
    }

    #[test]
    fn test_failure_is_not_denial() {
        let net = TestNetwork::new(1);
        net.chaincode
            .create_access_policy("dev1", vec!["connect".into()], 1000)
            .unwrap();

        net.ledger.fail_reads(true);
        let err = net.chaincode.check_access("dev1", "connect", 5).unwrap_err();
        assert!(err.is_storage());
        net.ledger.fail_reads(false);

        net.ledger
            .upsert("POLICY_dev1", br#"{"deviceId":"dev1","validUntil":"soon"}"#.to_vec())
            .unwrap();
        let err = net.chaincode.check_access("dev1", "connect", 5).unwrap_err();
        assert!(matches!(err, ChaincodeError::Decoding { .. }));
    }

    // =============================================================================
    // HEALTH
    // =============================================================================

    #[test]
    fn test_health_reports_and_alerts() {
        let net = TestNetwork::new(300);
        register(&net, "dev1");

        let stored = match net
            .invoke(TransactionRequest::UpdateHealthStatus {
                device_id: "dev1".into(),
                cpu: 85.0,
                memory: 40.0,
                bandwidth: 20.0,
            })
            .unwrap()
        {
            TransactionPayload::HealthStatus(status) => status,
            other => panic!("unexpected payload {other:?}"),
        };
        assert_eq!(stored.status, HealthState::Warning);
        assert_eq!(stored.timestamp, 300);

        let alerts = net.chaincode.check_health_alerts("dev1").unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].metric, HealthMetric::Cpu);
        assert_eq!(alerts[0].level, AlertLevel::Warning);
    }

    #[test]
    fn test_presence_gauge_follows_latest_report() {
        let net = TestNetwork::new(1);
        let samples = [
            (10.0, HealthState::Healthy),
            (95.0, HealthState::Critical),
            (71.0, HealthState::Warning),
        ];

        for (cpu, expected) in samples {
            net.chaincode
                .update_health_status("dev1", cpu, 0.0, 0.0, 1)
                .unwrap();
            for state in HealthState::ALL {
                let want = if state == expected { 1.0 } else { 0.0 };
                assert_eq!(net.metrics.health_presence("dev1", state), want);
            }
        }
    }

    #[test]
    fn test_reject_policy_from_config() {
        let config = ChaincodeConfig {
            metric_bounds: MetricBoundsPolicy::Reject,
            ..ChaincodeConfig::default()
        };
        let net = TestNetwork::with_config(1, config);

        let err = net
            .invoke(TransactionRequest::UpdateHealthStatus {
                device_id: "dev1".into(),
                cpu: 10.0,
                memory: 10.0,
                bandwidth: 101.0,
            })
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_metric");
        assert_eq!(net.metrics.errors("UpdateHealthStatus", "invalid_metric"), 1);
        assert!(net.chaincode.get_health_status("dev1").is_err());
    }

    #[test]
    fn test_raw_json_invocation() {
        let net = TestNetwork::new(42);
        let tx_id = Uuid::new_v4();
        let envelope = json!({
            "txId": tx_id,
            "request": {
                "function": "UpdateHealthStatus",
                "args": {"deviceId": "dev1", "cpu": 20, "memory": 91, "bandwidth": 5}
            }
        });

        let response = net
            .handler
            .invoke_json(&serde_json::to_vec(&envelope).unwrap())
            .unwrap();
        assert_eq!(response.tx_id, tx_id);
        assert_eq!(response.timestamp, 42);

        let wire = serde_json::to_value(&response).unwrap();
        assert_eq!(wire["payload"]["kind"], "healthStatus");
        assert_eq!(wire["payload"]["value"]["status"], "CRITICAL");
        assert_eq!(wire["payload"]["value"]["deviceId"], "dev1");
    }

    // =============================================================================
    // STORED RECORDS
    // =============================================================================

    #[test]
    fn test_existing_ledger_records_decode() {
        let net = TestNetwork::new(1);
        net.ledger
            .upsert(
                "dev9",
                br#"{"id":"dev9","name":"legacy","ipAddress":"","status":"REGISTERED","lastSeen":1650000000}"#
                    .to_vec(),
            )
            .unwrap();
        net.ledger
            .upsert(
                "POLICY_dev9",
                br#"{"deviceId":"dev9","permissions":null,"validUntil":1900000000}"#.to_vec(),
            )
            .unwrap();
        net.ledger
            .upsert(
                "HEALTH_dev9",
                br#"{"deviceId":"dev9","timestamp":1650000100,"cpu":91.5,"memory":12,"bandwidth":3.25,"status":"CRITICAL"}"#
                    .to_vec(),
            )
            .unwrap();

        let device = net.chaincode.get_device("dev9").unwrap();
        assert_eq!(device.ip_address, None);
        assert_eq!(device.status, DeviceStatus::Registered);

        assert!(net.chaincode.get_access_policy("dev9").unwrap().permissions.is_empty());
        assert!(!net.chaincode.check_access("dev9", "connect", 2).unwrap());

        let health = net.chaincode.get_health_status("dev9").unwrap();
        assert_eq!(health.status, HealthState::Critical);
        assert_eq!(health.memory, 12.0);

        // Existing devices can open connections
        assert_eq!(
            net.chaincode.establish_connection("dev9", 1_650_000_200).unwrap(),
            "CONN_dev9_1650000200"
        );
    }
}
