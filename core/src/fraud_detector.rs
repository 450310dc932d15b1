//! Fraud indicator detection.
//!
//! Two independent checks over the current batch:
//!   1. Velocity: any day whose total spend exceeds mean + sigma * stddev
//!      of the daily totals is a spike
//!   2. Round amounts: a disproportionate share of large round amounts
//!      (exact multiples of $100 above $500) is a fraud-risk signal

use crate::{
    anomaly::{Anomaly, AnomalyType, Severity},
    detector::{AnomalyDetector, DetectionInput},
    error::EngineResult,
    stats::{daily_totals, mean_std},
    types::Transaction,
};

pub struct FraudIndicatorDetector;

impl AnomalyDetector for FraudIndicatorDetector {
    fn name(&self) -> &'static str {
        "fraud_indicator"
    }

    fn detect(&self, input: &DetectionInput<'_>) -> EngineResult<Vec<Anomaly>> {
        let mut anomalies = detect_velocity_spikes(input);
        anomalies.extend(detect_round_amounts(input));
        Ok(anomalies)
    }
}

fn detect_velocity_spikes(input: &DetectionInput<'_>) -> Vec<Anomaly> {
    let cfg = input.config;
    let totals = daily_totals(input.current.iter());
    let values: Vec<f64> = totals.values().copied().collect();
    let (mean, stddev) = mean_std(&values);
    if stddev == 0.0 {
        return Vec::new();
    }

    let threshold = mean + cfg.velocity_sigma * stddev;
    let mut anomalies = Vec::new();
    for (date, total) in &totals {
        if *total <= threshold {
            continue;
        }

        let day_txns: Vec<&Transaction> =
            input.current.iter().filter(|t| t.date == *date).collect();

        let mut anomaly = Anomaly::new(
            AnomalyType::VelocitySpike,
            Severity::High,
            cfg.velocity_confidence,
            format!(
                "{} transactions totaling ${:.2} on {}, far above the daily average of ${:.2}",
                day_txns.len(),
                total,
                date,
                mean
            ),
            format!("Check the charges on {} for unauthorized activity", date),
        );
        anomaly.expected_value = Some(mean);
        anomaly.actual_value = Some(*total);
        anomaly.deviation_score = Some((*total - mean) / stddev);
        anomaly.transaction_ids = day_txns.iter().map(|t| t.id.clone()).collect();
        anomaly.period_start = Some(*date);
        anomaly.period_end = Some(*date);
        anomalies.push(anomaly);

        log::debug!(
            "fraud_indicator: velocity spike on {} (${:.2} vs mean ${:.2})",
            date,
            total,
            mean
        );
    }
    anomalies
}

fn detect_round_amounts(input: &DetectionInput<'_>) -> Vec<Anomaly> {
    let cfg = input.config;
    let total = input.current.len();
    if total == 0 {
        return Vec::new();
    }

    let round: Vec<&Transaction> = input
        .current
        .iter()
        .filter(|t| t.amount > cfg.round_amount_floor && t.amount % cfg.round_amount_modulus == 0.0)
        .collect();

    if (round.len() as f64) <= total as f64 * cfg.round_amount_fraction {
        return Vec::new();
    }

    let round_sum: f64 = round.iter().map(|t| t.amount).sum();
    let mut anomaly = Anomaly::new(
        AnomalyType::FraudRisk,
        Severity::High,
        cfg.round_amount_confidence,
        format!(
            "{} of {} transactions are large round amounts totaling ${:.2}, a common fraud pattern",
            round.len(),
            total,
            round_sum
        ),
        "Review these round-amount charges immediately and contact your bank if unrecognized"
            .to_string(),
    );
    anomaly.actual_value = Some(round.len() as f64);
    anomaly.expected_value = Some(total as f64 * cfg.round_amount_fraction);
    anomaly.transaction_ids = round.iter().map(|t| t.id.clone()).collect();
    vec![anomaly]
}
