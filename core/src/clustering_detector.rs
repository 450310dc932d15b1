//! Rare amount-bucket detection.
//!
//! Buckets the batch into five fixed amount ranges and flags every
//! transaction in a populated bucket holding less than the configured
//! fraction of the batch. Intentionally coarse: a low-precision backstop,
//! not a clustering algorithm.

use crate::{
    anomaly::{Anomaly, AnomalyType, Severity},
    detector::{AnomalyDetector, DetectionInput},
    error::EngineResult,
};

// ── Constants ────────────────────────────────────────────────────────────────

/// Fixed bucket edges over |amount|: [0,10) [10,50) [50,100) [100,500) [500,∞).
const BUCKET_EDGES: [f64; 4] = [10.0, 50.0, 100.0, 500.0];
const BUCKET_LABELS: [&str; 5] = [
    "under $10",
    "$10 to $50",
    "$50 to $100",
    "$100 to $500",
    "$500 and above",
];

pub struct ClusteringAnomalyDetector;

impl AnomalyDetector for ClusteringAnomalyDetector {
    fn name(&self) -> &'static str {
        "clustering"
    }

    fn detect(&self, input: &DetectionInput<'_>) -> EngineResult<Vec<Anomaly>> {
        let cfg = input.config;
        let total = input.current.len();
        if total == 0 {
            return Ok(Vec::new());
        }

        let mut counts = [0usize; 5];
        for txn in input.current {
            counts[bucket_index(txn.amount)] += 1;
        }

        let rare_ceiling = total as f64 * cfg.rare_bucket_fraction;
        let mut anomalies = Vec::new();
        for txn in input.current {
            let bucket = bucket_index(txn.amount);
            let count = counts[bucket];
            if (count as f64) >= rare_ceiling {
                continue;
            }

            let mut anomaly = Anomaly::new(
                AnomalyType::RareAmountCluster,
                Severity::Medium,
                cfg.rare_bucket_confidence,
                format!(
                    "Transaction of ${:.2} at '{}' falls in the {} range, which holds only {} of {} transactions",
                    txn.amount, txn.vendor, BUCKET_LABELS[bucket], count, total
                ),
                "This amount is unusual for your spending profile; confirm the charge".to_string(),
            );
            anomaly.vendor = Some(txn.vendor.clone());
            anomaly.amount = Some(txn.amount);
            anomaly.transaction_ids = vec![txn.id.clone()];
            anomalies.push(anomaly);
        }

        Ok(anomalies)
    }
}

/// Amounts are signed; bucket by magnitude so refunds still land somewhere.
fn bucket_index(amount: f64) -> usize {
    let magnitude = amount.abs();
    BUCKET_EDGES
        .iter()
        .position(|edge| magnitude < *edge)
        .unwrap_or(BUCKET_EDGES.len())
}
