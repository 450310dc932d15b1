//! End-to-end engine scenarios over the full ensemble.

use chrono::NaiveDate;
use spendscan_core::{
    anomaly::{AnomalyType, Severity},
    engine::DetectionEngine,
    error::{EngineError, EngineResult},
    store::{DetectionRun, ResultStore, SqliteResultStore},
    types::Transaction,
};

fn txn(id: &str, date: &str, amount: f64, vendor: &str, category: &str) -> Transaction {
    Transaction {
        id: id.into(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        amount,
        vendor: vendor.into(),
        category: Some(category.into()),
        description: None,
    }
}

fn engine() -> DetectionEngine<SqliteResultStore> {
    let store = SqliteResultStore::in_memory().unwrap();
    store.migrate().unwrap();
    DetectionEngine::with_defaults(store)
}

/// Empty input yields an empty result with zeroed statistics, no NaN.
#[test]
fn empty_input_returns_clean_result() {
    let result = engine().detect_anomalies(&[], &[], None);

    assert!(result.anomalies.is_empty());
    assert!(result.recommendations.is_empty());
    assert_eq!(result.statistics.total_transactions, 0);
    assert_eq!(result.statistics.anomaly_rate, 0.0);
    assert_eq!(result.statistics.avg_confidence, 0.0);
    assert!(result.persistence_error.is_none());
}

/// Two same-day same-amount charges from store variants of one vendor
/// are reported as duplicates referencing both ids.
#[test]
fn duplicate_pair_detected() {
    let current = vec![
        txn("t-1", "2024-02-01", 49.99, "Starbucks #123", "dining"),
        txn("t-2", "2024-02-01", 49.99, "Starbucks #456", "dining"),
    ];

    let result = engine().detect_anomalies(&current, &[], None);

    let dup = result
        .anomalies
        .iter()
        .find(|a| a.anomaly_type == AnomalyType::DuplicateCharge)
        .expect("duplicate anomaly expected");
    assert!(
        dup.confidence >= 0.8,
        "Duplicate confidence {} should be >= 0.8",
        dup.confidence
    );
    assert!(dup.transaction_ids.contains(&"t-1".to_string()));
    assert!(dup.transaction_ids.contains(&"t-2".to_string()));
    assert_eq!(dup.severity, Severity::High);
}

/// One $5,000 charge among ~$20 charges is a statistical outlier of
/// severity high or critical.
#[test]
fn large_outlier_detected() {
    let mut current: Vec<Transaction> = (0..19)
        .map(|i| {
            txn(
                &format!("t-{i:02}"),
                &format!("2024-03-{:02}", i + 1),
                18.0 + i as f64 * 0.2,
                "Fresh Mart",
                "groceries",
            )
        })
        .collect();
    current.push(txn("t-big", "2024-03-20", 5000.0, "Luxe Imports", "shopping"));

    let result = engine().detect_anomalies(&current, &[], None);

    let outlier = result
        .anomalies
        .iter()
        .find(|a| a.anomaly_type == AnomalyType::StatisticalOutlier)
        .expect("statistical outlier expected");
    assert_eq!(outlier.transaction_ids, vec!["t-big".to_string()]);
    assert!(
        matches!(outlier.severity, Severity::High | Severity::Critical),
        "Unexpected severity {:?}",
        outlier.severity
    );
    assert!(outlier.features.contains_key("z_score"));
}

/// 3 round $600 charges out of 20 (15% > 10%) yield exactly one
/// fraud-risk anomaly referencing the qualifying transactions.
#[test]
fn round_amounts_flagged_once() {
    let mut current: Vec<Transaction> = (0..17)
        .map(|i| {
            txn(
                &format!("t-{i:02}"),
                &format!("2024-03-{:02}", i + 1),
                20.5 + i as f64,
                "Fresh Mart",
                "groceries",
            )
        })
        .collect();
    for i in 0..3 {
        current.push(txn(
            &format!("t-round-{i}"),
            &format!("2024-03-{:02}", 18 + i),
            600.0,
            "Crypto Cash ATM",
            "transfers",
        ));
    }

    let result = engine().detect_anomalies(&current, &[], None);

    let fraud: Vec<_> = result
        .anomalies
        .iter()
        .filter(|a| a.anomaly_type == AnomalyType::FraudRisk)
        .collect();
    assert_eq!(fraud.len(), 1, "Expected exactly one fraud_risk anomaly");
    assert_eq!(fraud[0].transaction_ids.len(), 3);
    assert!(result
        .recommendations
        .iter()
        .any(|r| r.contains("fraud indicators")));
}

/// Every confidence is in [0,1] and every referenced transaction id
/// exists in the corpus; the ranked list obeys the sort invariant.
#[test]
fn result_invariants_hold_on_mixed_corpus() {
    let mut current = vec![
        txn("m-1", "2024-02-01", 49.99, "Starbucks #123", "dining"),
        txn("m-2", "2024-02-01", 49.99, "Starbucks #456", "dining"),
        txn("m-3", "2024-02-02", 5000.0, "Luxe Imports", "shopping"),
        txn("m-4", "2024-02-03", 600.0, "Bitcoin ATM Cash Point", "transfers"),
    ];
    for i in 0..20 {
        current.push(txn(
            &format!("m-fill-{i:02}"),
            &format!("2024-02-{:02}", (i % 28) + 1),
            15.0 + i as f64,
            "Fresh Mart",
            "groceries",
        ));
    }
    let historical = vec![txn("h-1", "2024-01-05", 22.0, "Fresh Mart", "groceries")];

    let result = engine().detect_anomalies(&current, &historical, Some("org-77"));

    let corpus_ids: Vec<&str> = current
        .iter()
        .chain(historical.iter())
        .map(|t| t.id.as_str())
        .collect();
    for anomaly in &result.anomalies {
        assert!(
            (0.0..=1.0).contains(&anomaly.confidence),
            "Confidence {} out of range",
            anomaly.confidence
        );
        for id in &anomaly.transaction_ids {
            assert!(
                corpus_ids.contains(&id.as_str()),
                "Anomaly references unknown transaction {id}"
            );
        }
    }
    for pair in result.anomalies.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(
            a.severity.rank() > b.severity.rank()
                || (a.severity.rank() == b.severity.rank() && a.confidence >= b.confidence),
            "Ranking violated: {:?}/{} before {:?}/{}",
            a.severity,
            a.confidence,
            b.severity,
            b.confidence
        );
    }
}

struct FailingStore;

impl ResultStore for FailingStore {
    fn save_run(&self, _run: &DetectionRun<'_>) -> EngineResult<()> {
        Err(EngineError::Persistence("store unavailable".into()))
    }
}

/// A failing store never loses the analysis: the computed result comes
/// back with the persistence error surfaced on its own channel.
#[test]
fn persistence_failure_still_returns_result() {
    let current = vec![
        txn("t-1", "2024-02-01", 49.99, "Starbucks #123", "dining"),
        txn("t-2", "2024-02-01", 49.99, "Starbucks #456", "dining"),
    ];

    let engine = DetectionEngine::with_defaults(FailingStore);
    let result = engine.detect_anomalies(&current, &[], None);

    assert!(!result.anomalies.is_empty(), "Analysis should still run");
    let err = result.persistence_error.expect("persistence error expected");
    assert!(err.contains("store unavailable"), "Unexpected error: {err}");
}
