//! Performance benchmarks for cash reconciliation.
//!
//! Covers the pure aggregation over growing ledgers, payment-type
//! normalization of legacy values, and the register snapshot endpoint.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::str::FromStr;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use bakery_pos::api::{AppState, create_router};
use bakery_pos::cash::{PaymentStreams, normalize_payment_type, recent_transactions, reconcile};
use bakery_pos::clock::FixedClock;
use bakery_pos::config::ConfigLoader;
use bakery_pos::models::{Expense, OrderPayment, Sale};
use bakery_pos::store::MemoryStore;

use axum::{body::Body, http::Request};
use chrono::{NaiveDateTime, TimeDelta};
use rust_decimal::Decimal;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

const STORED_TYPES: [&str; 5] = [
    "CASH",
    "CARD",
    r#"{"type":"TRANSFER","bank":"Bancolombia"}"#,
    "MIXED",
    "garbage",
];

fn opening_time() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2026-01-13 07:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
}

/// Builds a day with `count` payments spread over the three streams.
fn create_streams(count: usize) -> PaymentStreams {
    let start = opening_time();
    let mut streams = PaymentStreams::default();
    for i in 0..count {
        let at = start + TimeDelta::seconds(i as i64 * 20);
        let amount = Decimal::from(1000 + (i as i64 % 17) * 250);
        let payment_type = Some(STORED_TYPES[i % STORED_TYPES.len()].to_string());
        match i % 3 {
            0 => streams.sales.push(Sale {
                id: Uuid::new_v4(),
                register_id: None,
                sold_by: "emp_001".to_string(),
                items: vec![],
                total: amount,
                payment_type,
                created_at: at,
            }),
            n => {
                let payment = OrderPayment {
                    id: Uuid::new_v4(),
                    order_reference: format!("ORD-{}", i),
                    amount,
                    payment_type,
                    received_by: "emp_002".to_string(),
                    paid_at: at,
                };
                if n == 1 {
                    streams.cake_bar.push(payment);
                } else {
                    streams.custom_orders.push(payment);
                }
            }
        }
    }
    streams
}

fn create_expenses(count: usize) -> Vec<Expense> {
    (0..count)
        .map(|i| Expense {
            id: Uuid::new_v4(),
            amount: Decimal::from_str("3500.50").unwrap(),
            description: format!("Supplies {}", i),
            recorded_by: "mgr_001".to_string(),
            created_at: opening_time() + TimeDelta::minutes(i as i64),
        })
        .collect()
}

/// Benchmark: aggregation over ledgers of increasing size.
fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");
    let opening_cash = Decimal::from(100_000);
    let expenses = create_expenses(20);

    for count in [10, 100, 1000, 10_000].iter() {
        let streams = create_streams(*count);
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("payments", count), count, |b, _| {
            b.iter(|| {
                let ledger = streams.ledger();
                let summary = reconcile(black_box(opening_cash), &ledger, &expenses).unwrap();
                let recent = recent_transactions(&ledger, 10);
                black_box((summary, recent))
            })
        });
    }

    group.finish();
}

/// Benchmark: normalization of each stored payment-type shape.
fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_payment_type");
    for raw in STORED_TYPES.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(raw), raw, |b, raw| {
            b.iter(|| normalize_payment_type(black_box(Some(*raw))))
        });
    }
    group.finish();
}

/// Benchmark: GET /admin/cash-closure with a busy day in the store.
fn bench_snapshot_endpoint(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let config = ConfigLoader::load("./config/bakery").expect("Failed to load config");
    let clock = Arc::new(FixedClock::new(opening_time()));
    let state = AppState::new(config, Arc::new(MemoryStore::new()), clock.clone());
    let router = create_router(state);

    let post = |uri: &str, token: &str, body: serde_json::Value| {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .header("Cookie", format!("session={}", token))
            .body(Body::from(body.to_string()))
            .unwrap()
    };

    rt.block_on(async {
        router
            .clone()
            .oneshot(post(
                "/admin/cash-closure",
                "tok-manager-marta",
                json!({"action": "open", "openingCash": "100000"}),
            ))
            .await
            .unwrap();
        for i in 0..500 {
            clock.advance(TimeDelta::seconds(30));
            let uri = if i % 2 == 0 {
                "/cake-bar/payments"
            } else {
                "/custom-orders/payments"
            };
            router
                .clone()
                .oneshot(post(
                    uri,
                    "tok-employee-ana",
                    json!({
                        "orderReference": format!("ORD-{}", i),
                        "amount": "12500",
                        "paymentType": STORED_TYPES[i % STORED_TYPES.len()]
                    }),
                ))
                .await
                .unwrap();
        }
    });

    c.bench_function("snapshot_endpoint_500_payments", |b| {
        b.to_async(&rt).iter(|| async {
            let response = router
                .clone()
                .oneshot(
                    Request::builder()
                        .method("GET")
                        .uri("/admin/cash-closure")
                        .header("Cookie", "session=tok-manager-marta")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

criterion_group!(
    benches,
    bench_reconcile,
    bench_normalize,
    bench_snapshot_endpoint,
);
criterion_main!(benches);
