//! spendscan-core: transaction anomaly detection engine.
//!
//! An ensemble of six deterministic detection strategies over a finite
//! batch of transactions, followed by deduplication/ranking and
//! recommendation synthesis. Findings are advisory, ranked signals for
//! human review, not fraud determinations.

pub mod aggregator;
pub mod anomaly;
pub mod clustering_detector;
pub mod config;
pub mod detector;
pub mod duplicate_detector;
pub mod engine;
pub mod error;
pub mod fraud_detector;
pub mod pattern_detector;
pub mod recommendation;
pub mod seasonal_detector;
pub mod statistical_detector;
pub mod stats;
pub mod store;
pub mod types;
