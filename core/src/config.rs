//! Detection thresholds, hoisted into one documented structure.
//!
//! RULE: No detector hardcodes a tuning constant. Every threshold lives
//! here with a default equal to the original rule-set literal, so a
//! changed number is a visible, reviewable config change.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    // ── Seasonal (per-category daily series) ─────────────────────────

    /// Minimum daily data points a category needs before the seasonal
    /// check runs at all. Shorter series are skipped, not errored.
    pub seasonal_min_points: usize,
    /// How many of the most recent daily values are evaluated.
    pub seasonal_recent_days: usize,
    /// Spike threshold is `mean + seasonal_sigma * stddev`.
    pub seasonal_sigma: f64,
    /// Ceiling applied to derived confidences (seasonal and outlier).
    pub confidence_cap: f64,

    // ── Statistical outlier (per-transaction z-score) ────────────────

    /// Emit an outlier when `|amount - mean| / stddev` exceeds this.
    pub outlier_z_threshold: f64,
    /// Above this z-score the outlier is critical instead of high.
    pub outlier_z_critical: f64,
    /// Confidence is `min(cap, z / outlier_confidence_divisor)`.
    pub outlier_confidence_divisor: f64,

    // ── Amount clustering (rare bucket backstop) ─────────────────────

    /// A populated bucket holding less than this fraction of the batch
    /// is a rare pattern.
    pub rare_bucket_fraction: f64,
    /// Fixed confidence for rare-bucket findings.
    pub rare_bucket_confidence: f64,

    // ── New-vendor pattern ───────────────────────────────────────────

    /// Risk added per risk-keyword substring match in a new vendor name.
    pub vendor_keyword_weight: f64,
    /// Emit a finding when the summed risk exceeds this.
    pub vendor_risk_threshold: f64,
    /// Above this risk the finding is high instead of medium.
    pub vendor_high_risk_threshold: f64,

    // ── Duplicate charges ────────────────────────────────────────────

    /// Average vendor-name similarity a `(date, amount)` group must
    /// exceed to be reported as duplicates.
    pub duplicate_similarity_threshold: f64,

    // ── Fraud indicators ─────────────────────────────────────────────

    /// A day's total spend above `mean + velocity_sigma * stddev` of the
    /// daily totals is a velocity spike.
    pub velocity_sigma: f64,
    /// Fixed confidence for velocity spikes.
    pub velocity_confidence: f64,
    /// Round amounts only count above this floor.
    pub round_amount_floor: f64,
    /// An amount is "round" when it is an exact multiple of this.
    pub round_amount_modulus: f64,
    /// Share of the batch that must be round before the fraud-risk
    /// finding fires.
    pub round_amount_fraction: f64,
    /// Fixed confidence for the round-amount fraud finding.
    pub round_amount_confidence: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            seasonal_min_points: 90,
            seasonal_recent_days: 30,
            seasonal_sigma: 2.0,
            confidence_cap: 0.95,

            outlier_z_threshold: 3.0,
            outlier_z_critical: 4.0,
            outlier_confidence_divisor: 5.0,

            rare_bucket_fraction: 0.01,
            rare_bucket_confidence: 0.75,

            vendor_keyword_weight: 0.2,
            vendor_risk_threshold: 0.5,
            vendor_high_risk_threshold: 0.8,

            duplicate_similarity_threshold: 0.8,

            velocity_sigma: 3.0,
            velocity_confidence: 0.8,
            round_amount_floor: 500.0,
            round_amount_modulus: 100.0,
            round_amount_fraction: 0.10,
            round_amount_confidence: 0.85,
        }
    }
}
