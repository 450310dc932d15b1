//! Seasonal detector behavior: spike detection, degenerate series.

use chrono::{Duration, NaiveDate};
use spendscan_core::{
    anomaly::Severity,
    config::DetectorConfig,
    detector::{AnomalyDetector, DetectionInput},
    seasonal_detector::SeasonalAnomalyDetector,
    types::Transaction,
};

fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset)
}

fn txn(id: String, date: NaiveDate, amount: f64, category: &str) -> Transaction {
    Transaction {
        id,
        date,
        amount,
        vendor: "Corner Bistro".into(),
        category: Some(category.into()),
        description: None,
    }
}

/// 120 days of alternating baseline spend with a single spike in the
/// recent window produces exactly one seasonal anomaly for that day.
#[test]
fn spike_in_recent_window_detected() {
    let mut historical = Vec::new();
    let mut current = Vec::new();
    for offset in 0..120 {
        let amount = if offset == 115 {
            500.0
        } else if offset % 2 == 0 {
            90.0
        } else {
            110.0
        };
        let t = txn(format!("s-{offset:03}"), day(offset), amount, "dining");
        if offset < 90 {
            historical.push(t);
        } else {
            current.push(t);
        }
    }

    let input = DetectionInput {
        current: &current,
        historical: &historical,
        config: &DetectorConfig::default(),
    };
    let anomalies = SeasonalAnomalyDetector.detect(&input).unwrap();

    assert_eq!(anomalies.len(), 1, "Expected exactly one seasonal spike");
    let spike = &anomalies[0];
    assert_eq!(spike.category.as_deref(), Some("dining"));
    assert_eq!(spike.period_start, Some(day(115)));
    assert_eq!(spike.transaction_ids, vec!["s-115".to_string()]);
    assert!(
        matches!(spike.severity, Severity::High | Severity::Critical),
        "Unexpected severity {:?}",
        spike.severity
    );
    assert!(spike.confidence <= 0.95);
    assert!(spike.deviation_score.unwrap() > 2.0);
}

/// A constant series has zero variance: the explicit guard means no
/// anomalies, not NaN-driven ones.
#[test]
fn constant_series_emits_nothing() {
    let current: Vec<Transaction> = (0..120)
        .map(|offset| txn(format!("c-{offset:03}"), day(offset), 100.0, "dining"))
        .collect();

    let input = DetectionInput {
        current: &current,
        historical: &[],
        config: &DetectorConfig::default(),
    };
    assert!(SeasonalAnomalyDetector.detect(&input).unwrap().is_empty());
}

/// Categories with fewer than 90 daily points are skipped entirely,
/// even when they contain an obvious spike.
#[test]
fn short_series_skipped() {
    let mut current: Vec<Transaction> = (0..60)
        .map(|offset| txn(format!("f-{offset:03}"), day(offset), 100.0, "dining"))
        .collect();
    current.push(txn("f-spike".into(), day(60), 5000.0, "dining"));

    let input = DetectionInput {
        current: &current,
        historical: &[],
        config: &DetectorConfig::default(),
    };
    assert!(SeasonalAnomalyDetector.detect(&input).unwrap().is_empty());
}

/// Only the sparse category is skipped; the long one still reports.
#[test]
fn per_category_minimum_is_independent() {
    let mut current = Vec::new();
    for offset in 0..120 {
        let amount = if offset == 115 { 600.0 } else { 100.0 + (offset % 2) as f64 * 20.0 };
        current.push(txn(format!("a-{offset:03}"), day(offset), amount, "dining"));
    }
    // Sparse category with a big spike: below the 90-point minimum.
    for offset in 0..10 {
        current.push(txn(format!("b-{offset:03}"), day(offset), 100.0, "travel"));
    }
    current.push(txn("b-spike".into(), day(10), 9000.0, "travel"));

    let input = DetectionInput {
        current: &current,
        historical: &[],
        config: &DetectorConfig::default(),
    };
    let anomalies = SeasonalAnomalyDetector.detect(&input).unwrap();

    assert!(!anomalies.is_empty());
    assert!(anomalies
        .iter()
        .all(|a| a.category.as_deref() == Some("dining")));
}
