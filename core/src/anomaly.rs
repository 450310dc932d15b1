//! The anomaly data model shared by every detector.
//!
//! Detectors emit loosely-shaped findings in the original system; here
//! they all share one base schema (`Anomaly`) with type-specific optional
//! fields, validated at construction:
//!   - confidence is clamped into [0, 1]
//!   - severity is always derived from a deviation metric or a fixed
//!     heuristic constant, never chosen freely

use crate::types::{RunId, TransactionId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordinal severity class. Ordering matters: the aggregator ranks by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Numeric rank used for sorting: critical=4 .. low=1.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Critical => 4,
            Severity::High => 3,
            Severity::Medium => 2,
            Severity::Low => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

/// Tag identifying which detection strategy produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyType {
    SeasonalSpike,
    StatisticalOutlier,
    RareAmountCluster,
    NewVendorRisk,
    DuplicateCharge,
    VelocitySpike,
    FraudRisk,
}

impl AnomalyType {
    pub fn as_str(self) -> &'static str {
        match self {
            AnomalyType::SeasonalSpike => "seasonal_spike",
            AnomalyType::StatisticalOutlier => "statistical_outlier",
            AnomalyType::RareAmountCluster => "rare_amount_cluster",
            AnomalyType::NewVendorRisk => "new_vendor_risk",
            AnomalyType::DuplicateCharge => "duplicate_charge",
            AnomalyType::VelocitySpike => "velocity_spike",
            AnomalyType::FraudRisk => "fraud_risk",
        }
    }
}

/// One flagged, scored deviation from expected transaction behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub anomaly_type: AnomalyType,
    pub severity: Severity,
    /// Always in [0, 1]; clamped by [`Anomaly::new`].
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deviation_score: Option<f64>,
    pub description: String,
    pub recommendation: String,
    /// Ids of the corpus transactions this finding refers to.
    pub transaction_ids: Vec<TransactionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_start: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_end: Option<NaiveDate>,
    /// Explainability side channel: named metrics backing the finding
    /// (e.g. the z-score for a statistical outlier).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub features: BTreeMap<String, f64>,
}

impl Anomaly {
    /// Base constructor. Clamps confidence into [0, 1]; optional fields
    /// start empty and are filled in by the emitting detector.
    pub fn new(
        anomaly_type: AnomalyType,
        severity: Severity,
        confidence: f64,
        description: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            anomaly_type,
            severity,
            confidence: confidence.clamp(0.0, 1.0),
            category: None,
            vendor: None,
            amount: None,
            expected_value: None,
            actual_value: None,
            deviation_score: None,
            description: description.into(),
            recommendation: recommendation.into(),
            transaction_ids: Vec::new(),
            period_start: None,
            period_end: None,
            features: BTreeMap::new(),
        }
    }

    /// Deduplication key for the aggregator: the joined sorted
    /// transaction ids when present, otherwise the description text.
    pub fn dedup_key(&self) -> String {
        if self.transaction_ids.is_empty() {
            self.description.clone()
        } else {
            let mut ids = self.transaction_ids.clone();
            ids.sort();
            ids.join("|")
        }
    }
}

/// Summary numbers for one run. Guarded against empty inputs: both rates
/// are 0.0 rather than NaN when there is nothing to divide by.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionStatistics {
    pub total_transactions: usize,
    pub anomaly_rate: f64,
    pub avg_confidence: f64,
}

impl DetectionStatistics {
    pub fn compute(total_transactions: usize, anomalies: &[Anomaly]) -> Self {
        let anomaly_rate = if total_transactions == 0 {
            0.0
        } else {
            anomalies.len() as f64 / total_transactions as f64
        };
        let avg_confidence = if anomalies.is_empty() {
            0.0
        } else {
            anomalies.iter().map(|a| a.confidence).sum::<f64>() / anomalies.len() as f64
        };
        Self {
            total_transactions,
            anomaly_rate,
            avg_confidence,
        }
    }
}

/// The result object handed back to the caller of every run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyDetectionResult {
    pub run_id: RunId,
    pub anomalies: Vec<Anomaly>,
    pub statistics: DetectionStatistics,
    pub recommendations: Vec<String>,
    /// Set when the terminal persistence call failed. The analysis above
    /// is still valid; persistence is best-effort.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistence_error: Option<String>,
}
