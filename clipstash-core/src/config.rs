//! Runtime configuration shared by the two binaries.

use std::path::PathBuf;
use std::time::Duration;

use crate::capture::{Backend, CaptureLimits};
use crate::store::{EntryStore, StoreResult};

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Everything the daemon needs to start: where to read, what to enforce,
/// how often, and where to store.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub backend: Backend,
    pub limits: CaptureLimits,
    pub interval: Duration,
    /// Explicit storage directory; `None` means the per-user default.
    pub storage_dir: Option<PathBuf>,
}

impl DaemonConfig {
    pub fn storage_root(&self) -> StoreResult<PathBuf> {
        match &self.storage_dir {
            Some(dir) => Ok(dir.clone()),
            None => EntryStore::default_root(),
        }
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            backend: Backend::detect(),
            limits: CaptureLimits::default(),
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            storage_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_dir_wins_over_default() {
        let config = DaemonConfig {
            storage_dir: Some(PathBuf::from("/somewhere/else")),
            ..DaemonConfig::default()
        };
        assert_eq!(
            config.storage_root().unwrap(),
            PathBuf::from("/somewhere/else")
        );
    }

    #[test]
    fn baseline_defaults() {
        let config = DaemonConfig::default();
        assert_eq!(config.interval, Duration::from_millis(500));
        assert_eq!(config.limits.max_total_bytes, 1024 * 1024);
        assert_eq!(config.limits.max_line_bytes, 10 * 1024);
    }
}
