// crates/engine/src/service.rs
//! The engine service object: owns the hand-off queue, the result store,
//! and the worker task.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use tubescout_core::{
    EnqueueError, JobId, JobSummary, QueueBackend, SearchJob, SearchRecord, Settings, TubePresence,
};

use crate::store::ResultStore;
use crate::worker::Worker;

/// Asynchronous search-job engine.
///
/// Constructed once at startup and shared by handle; there is no ambient
/// global state. Submissions go through [`enqueue`](Self::enqueue), which
/// suspends while the bounded hand-off queue is full — with the default
/// depth of 1 that reproduces the crude admission control of a synchronous
/// hand-off: at most one job in flight on the worker and one waiting.
pub struct SearchEngine {
    settings: Settings,
    backend: Arc<dyn QueueBackend>,
    store: Arc<ResultStore>,
    tx: mpsc::Sender<SearchJob>,
    shutdown: CancellationToken,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl SearchEngine {
    /// Spawn the worker task and return the engine handle.
    pub fn start(settings: Settings, backend: Arc<dyn QueueBackend>) -> Arc<Self> {
        let (tx, rx) = mpsc::channel(settings.queue_depth.max(1));
        let store = Arc::new(ResultStore::new());
        let shutdown = CancellationToken::new();

        let worker = Worker::new(
            rx,
            Arc::clone(&store),
            Arc::clone(&backend),
            settings.clone(),
            shutdown.clone(),
        );
        let handle = tokio::spawn(worker.run());

        Arc::new(Self {
            settings,
            backend,
            store,
            tx,
            shutdown,
            worker: Mutex::new(Some(handle)),
        })
    }

    /// Submit a search across the configured servers on behalf of a user.
    ///
    /// Validates first — an invalid limit or empty user id fails fast and
    /// nothing is queued — then probes for the user's tube and rejects
    /// submissions whose tube exists nowhere. On success the caller gets a
    /// job id to poll; the call has suspended until the hand-off queue
    /// accepted the descriptor, so submitters serialize in arrival order.
    ///
    /// Two identical submissions are two independent jobs.
    pub async fn enqueue(
        &self,
        user_id: &str,
        state: &str,
        query: &str,
        limit: usize,
    ) -> Result<JobId, EnqueueError> {
        if user_id.trim().is_empty() {
            return Err(EnqueueError::EmptyUserId);
        }
        if limit == 0 {
            return Err(EnqueueError::InvalidLimit { limit });
        }

        match self.tube_presence(user_id).await {
            TubePresence::Exists => {}
            TubePresence::Absent => {
                return Err(EnqueueError::TubeNotFound {
                    user_id: user_id.to_string(),
                })
            }
            TubePresence::Unknown => {
                return Err(EnqueueError::TubeUnknown {
                    user_id: user_id.to_string(),
                })
            }
        }

        let job = SearchJob::new(self.settings.user_tube(user_id), state, query, limit);
        let id = job.id.clone();
        self.tx
            .send(job)
            .await
            .map_err(|_| EnqueueError::ShuttingDown)?;
        Ok(id)
    }

    /// Probe the configured servers, in order, for the user's tube.
    ///
    /// Short-circuits on the first server that has it. A probe error or
    /// timeout is logged and remembered: if no server confirms the tube and
    /// any probe failed, the answer is `Unknown` rather than `Absent`, so a
    /// transient outage is not reported as a missing tube.
    pub async fn tube_presence(&self, user_id: &str) -> TubePresence {
        let tube = self.settings.user_tube(user_id);
        let mut probe_failed = false;

        for server in &self.settings.servers {
            let probe = self.backend.tube_exists(server, &tube);
            match timeout(self.settings.backend_timeout(), probe).await {
                Ok(Ok(true)) => return TubePresence::Exists,
                Ok(Ok(false)) => {}
                Ok(Err(e)) => {
                    warn!(server = %server, tube = %tube, error = %e, "tube existence check failed");
                    probe_failed = true;
                }
                Err(_) => {
                    warn!(server = %server, tube = %tube, "tube existence check timed out");
                    probe_failed = true;
                }
            }
        }

        if probe_failed {
            TubePresence::Unknown
        } else {
            TubePresence::Absent
        }
    }

    /// Look up one job. `None` for ids that were never issued — and for
    /// issued ids the worker has not dequeued yet, since only the worker
    /// creates records.
    pub fn poll(&self, job_id: &str) -> Option<SearchRecord> {
        self.store.get(job_id)
    }

    /// Every known job with its current status, oldest first.
    pub fn list(&self) -> Vec<JobSummary> {
        self.store.list()
    }

    /// Raise the process-wide shutdown signal and wait for the worker to
    /// exit.
    ///
    /// The worker finishes the job it is currently on; jobs accepted into
    /// the hand-off queue but not yet dequeued are discarded and never
    /// appear in the store. Subsequent `enqueue` calls fail with
    /// [`EnqueueError::ShuttingDown`].
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        let handle = match self.worker.lock() {
            Ok(mut worker) => worker.take(),
            Err(e) => {
                tracing::error!("worker handle mutex poisoned: {e}");
                None
            }
        };
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::error!("search worker task panicked: {e}");
            }
        }
    }
}
