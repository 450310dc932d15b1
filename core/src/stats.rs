//! Small shared statistics helpers for the detectors.

use crate::types::Transaction;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Population mean and standard deviation. Empty input yields (0, 0).
pub fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Sum of amounts per calendar day, in date order.
pub fn daily_totals<'a, I>(transactions: I) -> BTreeMap<NaiveDate, f64>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for txn in transactions {
        *totals.entry(txn.date).or_insert(0.0) += txn.amount;
    }
    totals
}
