// crates/engine/src/worker.rs
//! The single worker task that drains the hand-off queue and performs the
//! backend fan-out for each job.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{timeout, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use tubescout_core::{QueueBackend, SearchJob, SearchRecord, SearchStatus, Settings};

use crate::store::ResultStore;

/// State owned by the worker task. Exactly one of these runs per engine, so
/// job processing is strictly sequential and the store has a single writer.
pub(crate) struct Worker {
    rx: mpsc::Receiver<SearchJob>,
    store: Arc<ResultStore>,
    backend: Arc<dyn QueueBackend>,
    settings: Settings,
    shutdown: CancellationToken,
}

impl Worker {
    pub(crate) fn new(
        rx: mpsc::Receiver<SearchJob>,
        store: Arc<ResultStore>,
        backend: Arc<dyn QueueBackend>,
        settings: Settings,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            rx,
            store,
            backend,
            settings,
            shutdown,
        }
    }

    /// Run until the shutdown token is cancelled or every sender is gone.
    ///
    /// Cancellation is only observed between jobs: an in-progress fan-out
    /// always runs to its own completion (or deadline). The select is
    /// biased toward shutdown, so once the token is cancelled no further
    /// job is dequeued — anything still sitting in the channel is dropped
    /// with the channel. That loss is part of the engine's contract.
    pub(crate) async fn run(mut self) {
        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    info!("search worker shutting down; queued jobs are discarded");
                    break;
                }
                job = self.rx.recv() => match job {
                    Some(job) => self.process(job).await,
                    None => break,
                },
            }
        }
    }

    /// Fan one job out to every configured server, sequentially, in
    /// configuration order.
    async fn process(&self, job: SearchJob) {
        debug!(job_id = %job.id, tube = %job.tube, "search job dequeued");
        self.store.insert(SearchRecord::pending(&job));

        let deadline = Instant::now() + self.settings.job_deadline();
        let mut results = Vec::new();
        let mut deadline_hit = false;

        for server in &self.settings.servers {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                warn!(job_id = %job.id, server = %server, "job deadline spent; skipping remaining servers");
                deadline_hit = true;
                break;
            }

            let budget = remaining.min(self.settings.backend_timeout());
            let search = self
                .backend
                .search_ready(server, &job.tube, &job.query, job.limit);
            match timeout(budget, search).await {
                Ok(Ok(mut found)) => {
                    debug!(job_id = %job.id, server = %server, matches = found.len(), "server contributed results");
                    results.append(&mut found);
                }
                Ok(Err(e)) => {
                    // Degrade, never fail the job: this server contributes nothing.
                    warn!(job_id = %job.id, server = %server, error = %e, "backend search failed");
                }
                Err(_) if budget < self.settings.backend_timeout() => {
                    // The job deadline, not the per-server budget, cut this
                    // call short. Stop the fan-out and keep what we have.
                    warn!(job_id = %job.id, server = %server, "job deadline expired mid fan-out");
                    deadline_hit = true;
                    break;
                }
                Err(_) => {
                    warn!(job_id = %job.id, server = %server, "backend search timed out");
                }
            }
        }

        let status = if deadline_hit {
            SearchStatus::TimedOut
        } else {
            SearchStatus::Finished
        };
        debug!(job_id = %job.id, status = ?status, matches = results.len(), "search job finalized");
        self.store.finalize(&job.id, results, status);
    }
}
