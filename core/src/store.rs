//! Persistence of detection runs.
//!
//! RULE: Only store.rs talks to the database. The engine sees the narrow
//! [`ResultStore`] port; production and tests differ only at this
//! boundary. Writes are insert-only and not idempotent: re-running the
//! same corpus stores a second set of rows under a new run id.

use crate::{
    anomaly::{Anomaly, DetectionStatistics},
    error::EngineResult,
};
use rusqlite::{params, Connection};
use std::time::Duration;

/// One run's worth of findings, annotated for storage.
pub struct DetectionRun<'a> {
    pub run_id: &'a str,
    pub org_id: Option<&'a str>,
    /// Fixed identifier of the heuristic rule-set version that produced
    /// the findings.
    pub model_version: &'a str,
    pub statistics: &'a DetectionStatistics,
    pub anomalies: &'a [Anomaly],
}

/// The persistence port the engine depends on.
pub trait ResultStore: Send {
    fn save_run(&self, run: &DetectionRun<'_>) -> EngineResult<()>;
}

/// SQLite-backed store.
pub struct SqliteResultStore {
    conn: Connection,
}

impl SqliteResultStore {
    /// Open (or create) the findings database at `path`.
    pub fn open(path: &str) -> EngineResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode: better concurrent read performance.
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        // Bound the only blocking call in a run.
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> EngineResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> EngineResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_anomaly.sql"))?;
        Ok(())
    }

    // ── Queries (tests and tooling) ────────────────────────────────

    pub fn run_count(&self) -> EngineResult<i64> {
        let count =
            self.conn
                .query_row("SELECT COUNT(*) FROM detection_run", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn anomaly_count(&self, run_id: &str) -> EngineResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM anomaly WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

impl ResultStore for SqliteResultStore {
    fn save_run(&self, run: &DetectionRun<'_>) -> EngineResult<()> {
        self.conn.execute(
            "INSERT INTO detection_run
                 (run_id, org_id, model_version, total_transactions,
                  anomaly_rate, avg_confidence, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                run.run_id,
                run.org_id,
                run.model_version,
                run.statistics.total_transactions as i64,
                run.statistics.anomaly_rate,
                run.statistics.avg_confidence,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;

        for anomaly in run.anomalies {
            self.conn.execute(
                "INSERT INTO anomaly
                     (run_id, anomaly_type, severity, confidence, category,
                      vendor, amount, expected_value, actual_value,
                      deviation_score, description, recommendation,
                      transaction_ids, period_start, period_end)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                params![
                    run.run_id,
                    anomaly.anomaly_type.as_str(),
                    anomaly.severity.as_str(),
                    anomaly.confidence,
                    anomaly.category,
                    anomaly.vendor,
                    anomaly.amount,
                    anomaly.expected_value,
                    anomaly.actual_value,
                    anomaly.deviation_score,
                    anomaly.description,
                    anomaly.recommendation,
                    serde_json::to_string(&anomaly.transaction_ids)?,
                    anomaly.period_start.map(|d| d.to_string()),
                    anomaly.period_end.map(|d| d.to_string()),
                ],
            )?;
        }

        Ok(())
    }
}
