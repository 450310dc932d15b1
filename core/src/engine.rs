//! The detection engine: a straight pipeline, no state between runs.
//!
//! PIPELINE (fixed, documented, never reordered):
//!   1. Run all six detectors over the same immutable snapshot
//!   2. Concatenate their findings
//!   3. Aggregate: deduplicate, rank by severity then confidence
//!   4. Synthesize recommendations
//!   5. Persist the run (best-effort) under a fresh run id
//!   6. Return the result with summary statistics
//!
//! RULES:
//!   - A failing detector is logged and contributes nothing; it never
//!     aborts the other detectors or the run.
//!   - The caller always gets a result object. Persistence failures are
//!     reported on the result's distinct error channel, not raised.

use crate::{
    aggregator,
    anomaly::{Anomaly, AnomalyDetectionResult, DetectionStatistics},
    clustering_detector::ClusteringAnomalyDetector,
    config::DetectorConfig,
    detector::{AnomalyDetector, DetectionInput},
    duplicate_detector::DuplicateDetector,
    fraud_detector::FraudIndicatorDetector,
    pattern_detector::PatternAnomalyDetector,
    recommendation,
    seasonal_detector::SeasonalAnomalyDetector,
    statistical_detector::StatisticalOutlierDetector,
    store::{DetectionRun, ResultStore},
    types::Transaction,
};
use uuid::Uuid;

/// Identifies the heuristic rule-set version stamped on persisted runs.
pub const MODEL_VERSION: &str = "heuristic-ensemble-1.0";

pub struct DetectionEngine<S: ResultStore> {
    pub store: S,
    pub config: DetectorConfig,
    detectors: Vec<Box<dyn AnomalyDetector>>,
}

impl<S: ResultStore> DetectionEngine<S> {
    /// Build a fully wired engine with all six detectors registered.
    pub fn new(store: S, config: DetectorConfig) -> Self {
        let detectors: Vec<Box<dyn AnomalyDetector>> = vec![
            Box::new(SeasonalAnomalyDetector),
            Box::new(StatisticalOutlierDetector),
            Box::new(ClusteringAnomalyDetector),
            Box::new(PatternAnomalyDetector),
            Box::new(DuplicateDetector),
            Box::new(FraudIndicatorDetector),
        ];
        Self {
            store,
            config,
            detectors,
        }
    }

    pub fn with_defaults(store: S) -> Self {
        Self::new(store, DetectorConfig::default())
    }

    /// Run the full ensemble over one snapshot.
    ///
    /// Always returns a result, possibly with zero anomalies; see the
    /// module rules for failure isolation.
    pub fn detect_anomalies(
        &self,
        current: &[Transaction],
        historical: &[Transaction],
        org_id: Option<&str>,
    ) -> AnomalyDetectionResult {
        let run_id = Uuid::new_v4().to_string();
        let input = DetectionInput {
            current,
            historical,
            config: &self.config,
        };

        let mut findings: Vec<Anomaly> = Vec::new();
        for detector in &self.detectors {
            match detector.detect(&input) {
                Ok(detected) => {
                    log::debug!(
                        "run={} detector={} findings={}",
                        run_id,
                        detector.name(),
                        detected.len()
                    );
                    findings.extend(detected);
                }
                Err(e) => {
                    // Isolated: this detector's contribution is empty.
                    log::warn!(
                        "run={} detector={} failed, skipping its findings: {}",
                        run_id,
                        detector.name(),
                        e
                    );
                }
            }
        }

        let anomalies = aggregator::aggregate(findings);
        let recommendations = recommendation::synthesize(&anomalies);
        let statistics = DetectionStatistics::compute(current.len(), &anomalies);

        let persistence_error = match self.store.save_run(&DetectionRun {
            run_id: &run_id,
            org_id,
            model_version: MODEL_VERSION,
            statistics: &statistics,
            anomalies: &anomalies,
        }) {
            Ok(()) => None,
            Err(e) => {
                log::warn!("run={} persistence failed, returning result anyway: {}", run_id, e);
                Some(e.to_string())
            }
        };

        log::info!(
            "run={} transactions={} anomalies={} rate={:.3}",
            run_id,
            statistics.total_transactions,
            anomalies.len(),
            statistics.anomaly_rate
        );

        AnomalyDetectionResult {
            run_id,
            anomalies,
            statistics,
            recommendations,
            persistence_error,
        }
    }
}
