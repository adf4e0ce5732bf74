// crates/core/src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to a submitter before anything is queued.
///
/// These are the only failures a caller ever sees from the engine: backend
/// trouble during a running fan-out is absorbed by the worker and degrades
/// to missing contributions, never to an error here.
#[derive(Debug, Error)]
pub enum EnqueueError {
    #[error("user id must not be empty")]
    EmptyUserId,

    #[error("search limit must be a positive integer, got {limit}")]
    InvalidLimit { limit: usize },

    #[error("no tube found for user {user_id} on any configured server")]
    TubeNotFound { user_id: String },

    #[error("could not determine whether a tube exists for user {user_id}")]
    TubeUnknown { user_id: String },

    #[error("engine is shutting down")]
    ShuttingDown,
}

/// Errors that can occur when loading engine settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config {path}: {message}")]
    Malformed { path: PathBuf, message: String },
}

impl ConfigError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enqueue_error_display() {
        let err = EnqueueError::InvalidLimit { limit: 0 };
        assert!(err.to_string().contains("positive integer"));

        let err = EnqueueError::TubeNotFound {
            user_id: "42".into(),
        };
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn test_config_error_io_classification() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = ConfigError::io("/etc/tubescout.toml", io_err);
        assert!(matches!(err, ConfigError::NotFound { .. }));

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ConfigError::io("/etc/tubescout.toml", io_err);
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
