//! Seasonal anomaly detection: per-category time-series deviation.
//!
//! This detector:
//!   1. Builds a daily spend series per category over current + historical
//!   2. Skips categories with fewer than the configured minimum of points
//!   3. Computes population mean/stddev of the full series
//!   4. Flags recent days whose total exceeds `mean + sigma * stddev`
//!
//! A constant series (stddev 0) emits nothing for that category. The
//! guard is explicit, not NaN suppression.

use crate::{
    anomaly::{Anomaly, AnomalyType, Severity},
    detector::{AnomalyDetector, DetectionInput},
    error::EngineResult,
    stats::mean_std,
    types::TransactionId,
};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

pub struct SeasonalAnomalyDetector;

struct DailyPoint {
    total: f64,
    transaction_ids: Vec<TransactionId>,
}

impl AnomalyDetector for SeasonalAnomalyDetector {
    fn name(&self) -> &'static str {
        "seasonal"
    }

    fn detect(&self, input: &DetectionInput<'_>) -> EngineResult<Vec<Anomaly>> {
        let cfg = input.config;
        let mut anomalies = Vec::new();

        // category -> date -> (daily total, contributing ids)
        let mut by_category: HashMap<&str, BTreeMap<NaiveDate, DailyPoint>> = HashMap::new();
        for txn in input.all() {
            let point = by_category
                .entry(txn.category_or_default())
                .or_default()
                .entry(txn.date)
                .or_insert_with(|| DailyPoint {
                    total: 0.0,
                    transaction_ids: Vec::new(),
                });
            point.total += txn.amount;
            point.transaction_ids.push(txn.id.clone());
        }

        // Deterministic output order across runs.
        let mut categories: Vec<&str> = by_category.keys().copied().collect();
        categories.sort_unstable();

        for category in categories {
            let series = &by_category[category];
            if series.len() < cfg.seasonal_min_points {
                log::debug!(
                    "seasonal: skipping '{}' ({} of {} required points)",
                    category,
                    series.len(),
                    cfg.seasonal_min_points
                );
                continue;
            }

            let values: Vec<f64> = series.values().map(|p| p.total).collect();
            let (mean, stddev) = mean_std(&values);
            if stddev == 0.0 {
                // Constant series: no deviation to measure.
                continue;
            }

            let threshold = mean + cfg.seasonal_sigma * stddev;
            if threshold == 0.0 {
                continue;
            }

            let recent_start = series.len().saturating_sub(cfg.seasonal_recent_days);
            for (date, point) in series.iter().skip(recent_start) {
                if point.total <= threshold {
                    continue;
                }

                let deviation_score = (point.total - mean) / stddev;
                let confidence =
                    ((point.total - threshold) / threshold).min(cfg.confidence_cap);
                let severity = severity_from_ratio(point.total / threshold);

                let mut anomaly = Anomaly::new(
                    AnomalyType::SeasonalSpike,
                    severity,
                    confidence,
                    format!(
                        "Spending in '{}' on {} was ${:.2}, {:.1} standard deviations above the daily average of ${:.2}",
                        category, date, point.total, deviation_score, mean
                    ),
                    format!(
                        "Review '{}' charges on {}; set a budget alert if this was unplanned",
                        category, date
                    ),
                );
                anomaly.category = Some(category.to_string());
                anomaly.expected_value = Some(mean);
                anomaly.actual_value = Some(point.total);
                anomaly.deviation_score = Some(deviation_score);
                anomaly.transaction_ids = point.transaction_ids.clone();
                anomaly.period_start = Some(*date);
                anomaly.period_end = Some(*date);
                anomalies.push(anomaly);
            }
        }

        Ok(anomalies)
    }
}

/// Severity from the value/threshold ratio.
fn severity_from_ratio(ratio: f64) -> Severity {
    if ratio > 3.0 {
        Severity::Critical
    } else if ratio > 2.0 {
        Severity::High
    } else if ratio > 1.5 {
        Severity::Medium
    } else {
        Severity::Low
    }
}
