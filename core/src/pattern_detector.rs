//! New-payee risk scoring.
//!
//! Vendors never seen in the historical window are scored against a
//! fixed risk-keyword list; enough keyword hits and the new payee is
//! flagged. Scoring:
//!   - +keyword_weight per case-insensitive substring match, capped at 1.0
//!   - emit when risk > vendor_risk_threshold
//!   - high when risk > vendor_high_risk_threshold, else medium
//!
//! The original system also sketched a time-of-day check here, but the
//! transaction record carries a calendar date, not a timestamp, so that
//! check could never fire and is not implemented.

use crate::{
    anomaly::{Anomaly, AnomalyType, Severity},
    detector::{AnomalyDetector, DetectionInput},
    error::EngineResult,
};
use std::collections::HashSet;

// ── Constants ────────────────────────────────────────────────────────────────

/// Vendor-name substrings associated with hard-to-trace money movement.
const RISK_KEYWORDS: [&str; 6] = ["cash", "atm", "wire", "transfer", "crypto", "bitcoin"];

pub struct PatternAnomalyDetector;

impl AnomalyDetector for PatternAnomalyDetector {
    fn name(&self) -> &'static str {
        "pattern"
    }

    fn detect(&self, input: &DetectionInput<'_>) -> EngineResult<Vec<Anomaly>> {
        let cfg = input.config;

        let known_vendors: HashSet<String> = input
            .historical
            .iter()
            .map(|t| t.vendor.trim().to_lowercase())
            .collect();

        let mut anomalies = Vec::new();
        for txn in input.current {
            let vendor_key = txn.vendor.trim().to_lowercase();
            if known_vendors.contains(&vendor_key) {
                continue;
            }

            let hits = RISK_KEYWORDS
                .iter()
                .filter(|kw| vendor_key.contains(*kw))
                .count();
            let risk = (hits as f64 * cfg.vendor_keyword_weight).min(1.0);
            if risk <= cfg.vendor_risk_threshold {
                continue;
            }

            let severity = if risk > cfg.vendor_high_risk_threshold {
                Severity::High
            } else {
                Severity::Medium
            };

            let mut anomaly = Anomaly::new(
                AnomalyType::NewVendorRisk,
                severity,
                risk,
                format!(
                    "First charge from '{}' matches {} high-risk payment keywords",
                    txn.vendor, hits
                ),
                format!(
                    "Confirm you recognize '{}' before this payee is used again",
                    txn.vendor
                ),
            );
            anomaly.vendor = Some(txn.vendor.clone());
            anomaly.amount = Some(txn.amount);
            anomaly.transaction_ids = vec![txn.id.clone()];
            anomaly.features.insert("keyword_hits".into(), hits as f64);
            anomalies.push(anomaly);
        }

        Ok(anomalies)
    }
}
