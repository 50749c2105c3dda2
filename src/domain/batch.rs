//! Batch result types for one verification run.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::outcome::VerificationOutcome;

/// Unique identifier for a verification batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BatchId(pub Uuid);

impl From<Uuid> for BatchId {
    fn from(uuid: Uuid) -> Self {
        BatchId(uuid)
    }
}

impl std::ops::Deref for BatchId {
    type Target = Uuid;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// The complete, ordered result of one verification run.
///
/// Outcomes are index-aligned with the credentials submitted to the runner:
/// outcome `i` belongs to input credential `i`, regardless of which network
/// call settled first. A result is immutable once produced; the next run
/// replaces it wholesale.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub id: BatchId,
    /// Run generation that produced this result. Only the most recent
    /// generation is ever published by the runner.
    pub generation: u64,
    pub outcomes: Vec<VerificationOutcome>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl BatchResult {
    /// Number of outcomes, equal to the number of submitted credentials.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Counts of outcomes per status, derived from a batch result.
///
/// Recomputed on demand by [`crate::classify::counts`], never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregateCounts {
    pub invalid: usize,
    pub valid_no_balance: usize,
    pub valid_with_balance: usize,
}

impl AggregateCounts {
    /// Sum of all three buckets; always equals the batch length.
    pub fn total(&self) -> usize {
        self.invalid + self.valid_no_balance + self.valid_with_balance
    }
}
