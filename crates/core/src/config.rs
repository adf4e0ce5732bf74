// crates/core/src/config.rs
//! Engine configuration.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::job::user_tube;

/// Tube prefix the SMS gateway uses for per-user outbound tubes.
const DEFAULT_TUBE_PREFIX: &str = "mt-sms-smpp-out-";

/// Engine settings, normally deserialized from the console's TOML config.
///
/// `servers` order matters: the worker fans out in exactly this order and
/// the aggregated results follow it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Backend queue servers (`host:port`), in query order.
    pub servers: Vec<String>,
    /// Prefix prepended to a user id to form that user's tube name.
    pub tube_prefix: String,
    /// Hand-off queue depth. Submitters suspend when it is full; depth 1
    /// keeps admission serialized behind the single worker.
    pub queue_depth: usize,
    /// Budget for one backend call (search or presence probe).
    pub backend_timeout_ms: u64,
    /// Overall deadline for one job's fan-out across all servers. When it
    /// expires the job finalizes as timed out with partial results.
    pub job_deadline_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            servers: Vec::new(),
            tube_prefix: DEFAULT_TUBE_PREFIX.into(),
            queue_depth: 1,
            backend_timeout_ms: 5_000,
            job_deadline_ms: 30_000,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file. Missing keys fall back to defaults.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::io(path, source))?;
        toml::from_str(&raw).map_err(|e| ConfigError::Malformed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Tube name owned by `user_id` under the configured prefix.
    pub fn user_tube(&self, user_id: &str) -> String {
        user_tube(&self.tube_prefix, user_id)
    }

    pub fn backend_timeout(&self) -> Duration {
        Duration::from_millis(self.backend_timeout_ms)
    }

    pub fn job_deadline(&self) -> Duration {
        Duration::from_millis(self.job_deadline_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.servers.is_empty());
        assert_eq!(settings.tube_prefix, "mt-sms-smpp-out-");
        assert_eq!(settings.queue_depth, 1);
        assert_eq!(settings.backend_timeout(), Duration::from_secs(5));
        assert_eq!(settings.job_deadline(), Duration::from_secs(30));
    }

    #[test]
    fn test_user_tube_uses_configured_prefix() {
        let settings = Settings {
            tube_prefix: "out-".into(),
            ..Settings::default()
        };
        assert_eq!(settings.user_tube("42"), "out-42");
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "servers = [\"127.0.0.1:11300\", \"127.0.0.1:11301\"]\nbackend_timeout_ms = 250"
        )
        .unwrap();

        let settings = Settings::from_toml_file(file.path()).unwrap();
        assert_eq!(
            settings.servers,
            vec!["127.0.0.1:11300".to_string(), "127.0.0.1:11301".to_string()]
        );
        assert_eq!(settings.backend_timeout_ms, 250);
        // Unspecified keys keep their defaults.
        assert_eq!(settings.tube_prefix, "mt-sms-smpp-out-");
    }

    #[test]
    fn test_from_toml_file_missing() {
        let err = Settings::from_toml_file("/no/such/config.toml").unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_from_toml_file_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "servers = \"not-a-list\"").unwrap();

        let err = Settings::from_toml_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }));
    }
}
