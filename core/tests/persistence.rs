//! SQLite store behavior: rows per run, insert-only reruns.

use chrono::NaiveDate;
use spendscan_core::{
    engine::DetectionEngine,
    store::SqliteResultStore,
    types::Transaction,
};

fn txn(id: &str, date: &str, amount: f64, vendor: &str) -> Transaction {
    Transaction {
        id: id.into(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        amount,
        vendor: vendor.into(),
        category: Some("dining".into()),
        description: None,
    }
}

fn corpus() -> Vec<Transaction> {
    vec![
        txn("t-1", "2024-02-01", 49.99, "Starbucks #123"),
        txn("t-2", "2024-02-01", 49.99, "Starbucks #456"),
    ]
}

#[test]
fn run_rows_and_anomaly_rows_written() {
    let store = SqliteResultStore::in_memory().unwrap();
    store.migrate().unwrap();
    let engine = DetectionEngine::with_defaults(store);

    let current = corpus();
    let result = engine.detect_anomalies(&current, &[], Some("org-1"));

    assert!(result.persistence_error.is_none());
    assert_eq!(engine.store.run_count().unwrap(), 1);
    assert_eq!(
        engine.store.anomaly_count(&result.run_id).unwrap(),
        result.anomalies.len() as i64
    );
}

/// Writes are insert-only: the same corpus twice stores two runs, each
/// under its own fresh run id.
#[test]
fn rerun_stores_duplicate_rows() {
    let store = SqliteResultStore::in_memory().unwrap();
    store.migrate().unwrap();
    let engine = DetectionEngine::with_defaults(store);

    let current = corpus();
    let first = engine.detect_anomalies(&current, &[], Some("org-1"));
    let second = engine.detect_anomalies(&current, &[], Some("org-1"));

    assert_ne!(first.run_id, second.run_id, "Run ids must be fresh per run");
    assert_eq!(engine.store.run_count().unwrap(), 2);
}

#[test]
fn empty_run_persists_zero_anomalies() {
    let store = SqliteResultStore::in_memory().unwrap();
    store.migrate().unwrap();
    let engine = DetectionEngine::with_defaults(store);

    let result = engine.detect_anomalies(&[], &[], None);

    assert!(result.persistence_error.is_none());
    assert_eq!(engine.store.run_count().unwrap(), 1);
    assert_eq!(engine.store.anomaly_count(&result.run_id).unwrap(), 0);
}

/// The result object is JSON-serializable per the output contract.
#[test]
fn result_serializes_to_json() {
    let store = SqliteResultStore::in_memory().unwrap();
    store.migrate().unwrap();
    let engine = DetectionEngine::with_defaults(store);

    let result = engine.detect_anomalies(&corpus(), &[], None);
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(
        json["statistics"]["totalTransactions"],
        serde_json::json!(2)
    );
    assert!(json["anomalies"].as_array().is_some());
}
