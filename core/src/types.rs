//! Shared primitive types used across the detection engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A stable, unique identifier for a transaction. Owned by the corpus.
pub type TransactionId = String;

/// Identifier of the organization the corpus belongs to.
pub type OrgId = String;

/// The canonical identifier of one detection run.
pub type RunId = String;

/// Category assigned to transactions that carry none.
pub const UNCATEGORIZED: &str = "uncategorized";

/// One transaction record from the external corpus.
///
/// Immutable input: the engine reads these, it never mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub date: NaiveDate,
    /// Signed amount: positive for charges, negative for credits/refunds.
    pub amount: f64,
    pub vendor: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Transaction {
    /// Category for grouping purposes; absent categories collapse to
    /// [`UNCATEGORIZED`].
    pub fn category_or_default(&self) -> &str {
        self.category.as_deref().unwrap_or(UNCATEGORIZED)
    }
}
