//! # dVPN Chaincode Benchmarks
//!
//! | Area | Operation |
//! |------|-----------|
//! | Health | `determine_status` over random samples |
//! | Access | `check_access` against a stored policy |
//! | Connections | `establish_connection` including collision suffixes |
//! | Transactions | `invoke_json` decode + dispatch |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dvpn_chaincode::prelude::*;
use rand::Rng;
use std::sync::Arc;

fn chaincode() -> DvpnChaincode<InMemoryLedger, InMemoryMetrics> {
    DvpnChaincode::new(
        Arc::new(InMemoryLedger::new()),
        Arc::new(InMemoryMetrics::new()),
        ChaincodeConfig::default(),
    )
}

// ============================================================================
// HEALTH CLASSIFICATION
// ============================================================================

fn bench_determine_status(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let samples: Vec<(f64, f64, f64)> = (0..1024)
        .map(|_| {
            (
                rng.gen_range(0.0..100.0),
                rng.gen_range(0.0..100.0),
                rng.gen_range(0.0..100.0),
            )
        })
        .collect();

    let mut group = c.benchmark_group("health");
    group.throughput(Throughput::Elements(samples.len() as u64));
    group.bench_function("determine_status_1024", |b| {
        b.iter(|| {
            for &(cpu, memory, bandwidth) in &samples {
                black_box(determine_status(cpu, memory, bandwidth));
            }
        })
    });

    let cc = chaincode();
    group.bench_function("update_health_status", |b| {
        let mut i = 0usize;
        b.iter(|| {
            let (cpu, memory, bandwidth) = samples[i % samples.len()];
            i += 1;
            black_box(
                cc.update_health_status("bench-dev", cpu, memory, bandwidth, 1)
                    .unwrap(),
            )
        })
    });
    group.finish();
}

// ============================================================================
// ACCESS CHECKS
// ============================================================================

fn bench_check_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("access");

    for size in [1usize, 16, 256] {
        let cc = chaincode();
        let permissions: Vec<String> = (0..size).map(|i| format!("perm-{i}")).collect();
        let last = permissions[size - 1].clone();
        cc.create_access_policy("bench-dev", permissions, i64::MAX)
            .unwrap();

        group.bench_with_input(BenchmarkId::new("check_access_last", size), &last, |b, p| {
            b.iter(|| black_box(cc.check_access("bench-dev", p, 1).unwrap()))
        });
    }

    let cc = chaincode();
    group.bench_function("check_access_no_policy", |b| {
        b.iter(|| black_box(cc.check_access("nobody", "connect", 1).unwrap()))
    });
    group.finish();
}

// ============================================================================
// CONNECTIONS
// ============================================================================

fn bench_establish_connection(c: &mut Criterion) {
    let mut group = c.benchmark_group("connections");

    group.bench_function("establish_distinct_seconds", |b| {
        let cc = chaincode();
        cc.register_device("bench-dev", "bench", 0).unwrap();
        let mut now = 0;
        b.iter(|| {
            now += 1;
            black_box(cc.establish_connection("bench-dev", now).unwrap())
        })
    });

    // Every call in one second tries every previously taken suffix first
    group.bench_function("establish_same_second_64", |b| {
        b.iter(|| {
            let cc = chaincode();
            cc.register_device("bench-dev", "bench", 0).unwrap();
            for _ in 0..64 {
                black_box(cc.establish_connection("bench-dev", 5).unwrap());
            }
        })
    });
    group.finish();
}

// ============================================================================
// TRANSACTIONS
// ============================================================================

fn bench_invoke_json(c: &mut Criterion) {
    let cc = Arc::new(chaincode());
    cc.create_access_policy("bench-dev", vec!["connect".into()], i64::MAX)
        .unwrap();
    let handler = TransactionHandler::new(
        cc,
        Arc::new(FixedClock::new(1)),
        Arc::new(InMemoryMetrics::new()),
    );
    let payload = br#"{"txId":"0f8fad5b-d9cb-469f-a165-70867728950e","request":{"function":"CheckAccess","args":{"deviceId":"bench-dev","permission":"connect"}}}"#;

    c.bench_function("invoke_json_check_access", |b| {
        b.iter(|| black_box(handler.invoke_json(payload).unwrap()))
    });
}

criterion_group!(
    benches,
    bench_determine_status,
    bench_check_access,
    bench_establish_connection,
    bench_invoke_json
);
criterion_main!(benches);
