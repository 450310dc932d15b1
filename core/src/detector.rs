//! Detector trait and shared input snapshot.
//!
//! RULE: Every detection strategy implements AnomalyDetector as a pure
//! function over the immutable snapshot. Detectors share no state and
//! never call each other; the engine runs them independently and joins
//! their findings before aggregation, so one failing detector can be
//! isolated without touching the others.

use crate::{anomaly::Anomaly, config::DetectorConfig, error::EngineResult, types::Transaction};

/// The immutable per-run snapshot every detector sees.
pub struct DetectionInput<'a> {
    /// Transactions of the period under analysis.
    pub current: &'a [Transaction],
    /// Optional lookback window; empty slice when none was supplied.
    pub historical: &'a [Transaction],
    pub config: &'a DetectorConfig,
}

impl<'a> DetectionInput<'a> {
    /// Current and historical transactions chained, for checks that run
    /// over the full corpus.
    pub fn all(&self) -> impl Iterator<Item = &'a Transaction> {
        self.current.iter().chain(self.historical.iter())
    }
}

/// The contract every detection strategy fulfills.
pub trait AnomalyDetector: Send {
    /// Unique stable name, used in logs when a detector is isolated.
    fn name(&self) -> &'static str;

    /// Scan the snapshot and return findings. Degenerate inputs (empty
    /// batch, zero variance) return an empty vec, never an error.
    fn detect(&self, input: &DetectionInput<'_>) -> EngineResult<Vec<Anomaly>>;
}
