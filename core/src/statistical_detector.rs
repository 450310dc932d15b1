//! Statistical outlier detection: per-transaction z-score over the
//! current batch. A zero-variance batch emits nothing.

use crate::{
    anomaly::{Anomaly, AnomalyType, Severity},
    detector::{AnomalyDetector, DetectionInput},
    error::EngineResult,
    stats::mean_std,
};

pub struct StatisticalOutlierDetector;

impl AnomalyDetector for StatisticalOutlierDetector {
    fn name(&self) -> &'static str {
        "statistical_outlier"
    }

    fn detect(&self, input: &DetectionInput<'_>) -> EngineResult<Vec<Anomaly>> {
        let cfg = input.config;
        let amounts: Vec<f64> = input.current.iter().map(|t| t.amount).collect();
        let (mean, stddev) = mean_std(&amounts);
        if stddev == 0.0 {
            return Ok(Vec::new());
        }

        let mut anomalies = Vec::new();
        for txn in input.current {
            let z = (txn.amount - mean).abs() / stddev;
            if z <= cfg.outlier_z_threshold {
                continue;
            }

            let severity = if z > cfg.outlier_z_critical {
                Severity::Critical
            } else {
                Severity::High
            };
            let confidence = (z / cfg.outlier_confidence_divisor).min(cfg.confidence_cap);

            let mut anomaly = Anomaly::new(
                AnomalyType::StatisticalOutlier,
                severity,
                confidence,
                format!(
                    "Transaction of ${:.2} at '{}' is {:.1} standard deviations from the batch average of ${:.2}",
                    txn.amount, txn.vendor, z, mean
                ),
                format!(
                    "Verify the ${:.2} charge at '{}' is one you made",
                    txn.amount, txn.vendor
                ),
            );
            anomaly.vendor = Some(txn.vendor.clone());
            anomaly.amount = Some(txn.amount);
            anomaly.expected_value = Some(mean);
            anomaly.actual_value = Some(txn.amount);
            anomaly.deviation_score = Some(z);
            anomaly.transaction_ids = vec![txn.id.clone()];
            anomaly.features.insert("z_score".into(), z);
            anomalies.push(anomaly);
        }

        Ok(anomalies)
    }
}
