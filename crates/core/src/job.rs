// crates/core/src/job.rs
//! Search-job descriptor and the user-tube naming convention.

use uuid::Uuid;

/// Unique identifier for a search job.
pub type JobId = String;

/// Immutable description of one search request, handed from a submitter to
/// the worker over the bounded queue.
///
/// The identifier is assigned here, at construction time, so the submitter
/// can return it to the caller before the worker has even seen the job.
#[derive(Debug, Clone)]
pub struct SearchJob {
    pub id: JobId,
    /// Target tube, derived from the owning user via [`user_tube`].
    pub tube: String,
    /// Item state the search is restricted to (e.g. `"ready"`).
    pub state: String,
    /// Opaque predicate, interpreted by the backend client.
    pub query: String,
    /// Upper bound on matches per backend server. Always >= 1.
    pub limit: usize,
}

impl SearchJob {
    /// Build a descriptor with a freshly generated, collision-free id.
    pub fn new(
        tube: impl Into<String>,
        state: impl Into<String>,
        query: impl Into<String>,
        limit: usize,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tube: tube.into(),
            state: state.into(),
            query: query.into(),
            limit,
        }
    }
}

/// Derive the outbound tube name owned by a user.
///
/// Must stay a pure function of `user_id`: the gateway creates the tube with
/// the same formula, and the presence probe and the search both rely on
/// deriving an identical name.
pub fn user_tube(prefix: &str, user_id: &str) -> String {
    format!("{prefix}{user_id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_user_tube_concatenates_prefix_and_id() {
        assert_eq!(user_tube("mt-sms-smpp-out-", "42"), "mt-sms-smpp-out-42");
        assert_eq!(user_tube("", "abc"), "abc");
    }

    #[test]
    fn test_search_job_carries_fields() {
        let job = SearchJob::new("mt-sms-smpp-out-42", "ready", "hello", 10);
        assert_eq!(job.tube, "mt-sms-smpp-out-42");
        assert_eq!(job.state, "ready");
        assert_eq!(job.query, "hello");
        assert_eq!(job.limit, 10);
        assert!(!job.id.is_empty());
    }

    #[test]
    fn test_search_job_ids_are_distinct() {
        let ids: HashSet<JobId> = (0..1000)
            .map(|_| SearchJob::new("t", "ready", "q", 1).id)
            .collect();
        assert_eq!(ids.len(), 1000);
    }
}
