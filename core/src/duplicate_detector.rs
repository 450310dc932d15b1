//! Duplicate-charge detection.
//!
//! Partitions the batch by (date, amount) and fuzzy-matches vendor names
//! inside each group with a normalized word-overlap ratio. Partitioning
//! first keeps the pairwise comparison bounded: groups are tiny in
//! practice, so the cost stays near O(n) over the batch.

use crate::{
    anomaly::{Anomaly, AnomalyType, Severity},
    detector::{AnomalyDetector, DetectionInput},
    error::EngineResult,
    types::Transaction,
};
use chrono::NaiveDate;
use std::collections::HashMap;

pub struct DuplicateDetector;

impl AnomalyDetector for DuplicateDetector {
    fn name(&self) -> &'static str {
        "duplicate"
    }

    fn detect(&self, input: &DetectionInput<'_>) -> EngineResult<Vec<Anomaly>> {
        let cfg = input.config;

        // Amounts keyed in cents so f64 noise cannot split a group.
        let mut groups: HashMap<(NaiveDate, i64), Vec<&Transaction>> = HashMap::new();
        for txn in input.current {
            groups
                .entry((txn.date, (txn.amount * 100.0).round() as i64))
                .or_default()
                .push(txn);
        }

        let mut keys: Vec<(NaiveDate, i64)> = groups.keys().copied().collect();
        keys.sort_unstable();

        let mut anomalies = Vec::new();
        for key in keys {
            let group = &groups[&key];
            if group.len() < 2 {
                continue;
            }

            let first = group[0];
            let similarity = group[1..]
                .iter()
                .map(|t| vendor_similarity(&first.vendor, &t.vendor))
                .sum::<f64>()
                / (group.len() - 1) as f64;

            if similarity <= cfg.duplicate_similarity_threshold {
                continue;
            }

            let (date, _) = key;
            let mut anomaly = Anomaly::new(
                AnomalyType::DuplicateCharge,
                Severity::High,
                similarity,
                format!(
                    "{} charges of ${:.2} on {} from near-identical vendors starting with '{}'",
                    group.len(),
                    first.amount,
                    date,
                    first.vendor
                ),
                "Review these charges and dispute the duplicates to avoid paying twice"
                    .to_string(),
            );
            anomaly.vendor = Some(first.vendor.clone());
            anomaly.amount = Some(first.amount);
            anomaly.transaction_ids = group.iter().map(|t| t.id.clone()).collect();
            anomaly.period_start = Some(date);
            anomaly.period_end = Some(date);
            anomalies.push(anomaly);
        }

        Ok(anomalies)
    }
}

/// Word-overlap ratio of two vendor names: |common| / max(|a|, |b|) over
/// lowercased alphabetic tokens. Store-number tokens like "#123" carry no
/// identity and are dropped before comparison.
fn vendor_similarity(a: &str, b: &str) -> f64 {
    let words_a = name_tokens(a);
    let words_b = name_tokens(b);
    let longest = words_a.len().max(words_b.len());
    if longest == 0 {
        return 0.0;
    }
    let common = words_a.iter().filter(|w| words_b.contains(*w)).count();
    common as f64 / longest as f64
}

fn name_tokens(name: &str) -> Vec<String> {
    name.split_whitespace()
        .map(|w| {
            w.chars()
                .filter(|c| c.is_ascii_alphabetic())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}
