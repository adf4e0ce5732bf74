// crates/core/src/backend.rs
//! Backend queue-server client interface.

use async_trait::async_trait;
use thiserror::Error;

use crate::record::MatchedItem;

/// Errors a backend client call can surface.
///
/// The engine never escalates these: during fan-out a failing server simply
/// contributes zero results, and during a presence probe it makes the
/// outcome [`TubePresence::Unknown`].
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("cannot reach {server}: {source}")]
    Connect {
        server: String,
        #[source]
        source: std::io::Error,
    },

    #[error("protocol error from {server}: {message}")]
    Protocol { server: String, message: String },
}

/// Outcome of probing the configured servers for a tube.
///
/// `Unknown` means no reachable server had the tube but at least one probe
/// failed, so absence could not be established.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TubePresence {
    Exists,
    Absent,
    Unknown,
}

/// Client for one kind of backend queue server.
///
/// A single client instance serves every configured server; the address is
/// passed per call. Implementations live with the console (the real
/// beanstalkd TCP client) and in the engine's tests (scripted doubles).
#[async_trait]
pub trait QueueBackend: Send + Sync {
    /// Check whether `tube` exists on `server`.
    async fn tube_exists(&self, server: &str, tube: &str) -> Result<bool, BackendError>;

    /// Scan up to `limit` ready items in `tube` on `server` and return the
    /// ones whose body matches `query`, in the order the server yields them.
    async fn search_ready(
        &self,
        server: &str,
        tube: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<MatchedItem>, BackendError>;
}
