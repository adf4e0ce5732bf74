// crates/engine/src/store.rs
//! Shared result store: one writer (the worker), many concurrent readers.

use std::collections::HashMap;
use std::sync::RwLock;

use tubescout_core::{JobSummary, MatchedItem, SearchRecord, SearchStatus};

/// Process-wide mapping from job id to result record.
///
/// Created once at engine start and kept for the process lifetime; records
/// are never evicted. All access goes through the `RwLock` — lookup calls
/// from any number of request-handling tasks may race with the worker's
/// final write, and the guard is what makes that race safe. Poisoned-lock
/// reads degrade to "not found" with an error log rather than propagating
/// the panic.
pub struct ResultStore {
    records: RwLock<HashMap<String, SearchRecord>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Insert the freshly materialized Pending record for a dequeued job.
    /// Worker-only.
    pub(crate) fn insert(&self, record: SearchRecord) {
        match self.records.write() {
            Ok(mut records) => {
                records.insert(record.id.clone(), record);
            }
            Err(e) => tracing::error!("RwLock poisoned inserting record: {e}"),
        }
    }

    /// Apply the single terminal transition for a job: attach the aggregated
    /// results and flip the status in place. Worker-only.
    pub(crate) fn finalize(&self, id: &str, results: Vec<MatchedItem>, status: SearchStatus) {
        match self.records.write() {
            Ok(mut records) => match records.get_mut(id) {
                Some(record) if record.status == SearchStatus::Pending => {
                    record.results = results;
                    record.status = status;
                }
                Some(record) => tracing::warn!(
                    job_id = %id,
                    status = ?record.status,
                    "refusing to finalize a job twice"
                ),
                None => tracing::warn!(job_id = %id, "finalize for unknown job"),
            },
            Err(e) => tracing::error!("RwLock poisoned finalizing record: {e}"),
        }
    }

    /// Snapshot one record. `None` covers both never-issued ids and ids the
    /// worker has not picked up yet; the two are deliberately not
    /// distinguished.
    pub fn get(&self, id: &str) -> Option<SearchRecord> {
        match self.records.read() {
            Ok(records) => records.get(id).cloned(),
            Err(e) => {
                tracing::error!("RwLock poisoned reading record: {e}");
                None
            }
        }
    }

    /// Snapshot every known job, oldest first (creation time, then id —
    /// the map itself has no useful order).
    pub fn list(&self) -> Vec<JobSummary> {
        let mut summaries: Vec<JobSummary> = match self.records.read() {
            Ok(records) => records
                .values()
                .map(|r| JobSummary {
                    id: r.id.clone(),
                    status: r.status,
                    created_at: r.created_at,
                })
                .collect(),
            Err(e) => {
                tracing::error!("RwLock poisoned listing records: {e}");
                Vec::new()
            }
        };
        summaries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        summaries
    }

    pub fn len(&self) -> usize {
        match self.records.read() {
            Ok(records) => records.len(),
            Err(e) => {
                tracing::error!("RwLock poisoned reading store length: {e}");
                0
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new()
    }
}
