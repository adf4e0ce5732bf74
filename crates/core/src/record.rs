// crates/core/src/record.rs
//! Per-job result record and its lifecycle states.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::job::{JobId, SearchJob};

/// Lifecycle state of a search job.
///
/// `Pending` is the only non-terminal state. A record transitions exactly
/// once, to `Finished` (full fan-out completed, possibly with backends
/// contributing nothing) or `TimedOut` (the job deadline expired mid
/// fan-out; the record carries whatever was gathered up to that point).
/// There is no failed state: backend errors degrade to empty contributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    Pending,
    Finished,
    TimedOut,
}

impl SearchStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, SearchStatus::Pending)
    }
}

/// One matched item, exactly as a backend server returned it.
///
/// Opaque to the engine: no parsing, no re-ranking, no deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedItem {
    /// Item id on the backend server that held it.
    pub id: u64,
    /// Raw item body.
    pub data: String,
}

/// Mutable per-job state kept in the result store.
///
/// Created by the worker at the moment it dequeues the job — never by the
/// submitter — and mutated in place exactly once, by the worker, when the
/// fan-out ends. Records are never evicted; the store grows for the process
/// lifetime.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
    pub id: JobId,
    pub status: SearchStatus,
    pub tube: String,
    pub query: String,
    pub limit: usize,
    pub created_at: DateTime<Utc>,
    /// Concatenation of per-server result sequences, in configured server
    /// order, each preserving the order the backend returned.
    pub results: Vec<MatchedItem>,
}

impl SearchRecord {
    /// Materialize the initial record for a freshly dequeued job.
    pub fn pending(job: &SearchJob) -> Self {
        Self {
            id: job.id.clone(),
            status: SearchStatus::Pending,
            tube: job.tube.clone(),
            query: job.query.clone(),
            limit: job.limit,
            created_at: Utc::now(),
            results: Vec::new(),
        }
    }
}

/// Identifier + status pair returned by the list operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub id: JobId,
    pub status: SearchStatus,
    pub created_at: DateTime<Utc>,
}
