//! Aggregation: merge, deduplicate, and rank detector findings.
//!
//! Dedup key: the joined sorted transaction ids of a finding, or its
//! description when it references no transactions. First occurrence wins.
//! Ranking: severity rank descending, then confidence descending. The
//! sort is stable, so equal pairs keep detector-emission order, and
//! re-aggregating an already ranked list yields the identical list.

use crate::anomaly::Anomaly;
use std::cmp::Ordering;
use std::collections::HashSet;

pub fn aggregate(findings: Vec<Anomaly>) -> Vec<Anomaly> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut unique: Vec<Anomaly> = Vec::with_capacity(findings.len());
    for anomaly in findings {
        if seen.insert(anomaly.dedup_key()) {
            unique.push(anomaly);
        }
    }

    unique.sort_by(|a, b| {
        b.severity
            .rank()
            .cmp(&a.severity.rank())
            .then_with(|| {
                b.confidence
                    .partial_cmp(&a.confidence)
                    .unwrap_or(Ordering::Equal)
            })
    });
    unique
}
