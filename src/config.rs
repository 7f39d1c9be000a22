use crate::paths;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for a [`LogCollector`] and its runner task.
///
/// All fields have defaults so embedders can write `CollectorConfig::default()`
/// and only override what they need.
///
/// [`LogCollector`]: crate::collector::LogCollector
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CollectorConfig {
    /// Base directory for log storage. The `LogFile/` subdirectory is created
    /// beneath it. When `None`, the platform data directory is used.
    #[serde(default)]
    pub base_dir: Option<PathBuf>,
    /// Interval between file-readiness checks, in milliseconds. Default: 1000.
    #[serde(default = "default_readiness_interval_ms")]
    pub readiness_interval_ms: u64,
    /// Interval between drain steps, in milliseconds. Stands in for the host's
    /// per-frame update cadence. Default: 50.
    #[serde(default = "default_drain_interval_ms")]
    pub drain_interval_ms: u64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            readiness_interval_ms: default_readiness_interval_ms(),
            drain_interval_ms: default_drain_interval_ms(),
        }
    }
}

fn default_readiness_interval_ms() -> u64 {
    1000
}

fn default_drain_interval_ms() -> u64 {
    50
}

impl CollectorConfig {
    /// Resolves the configured base directory, falling back to the platform
    /// data directory.
    pub fn resolve_base_dir(&self) -> Result<PathBuf> {
        match &self.base_dir {
            Some(dir) => Ok(dir.clone()),
            None => paths::default_base_dir(),
        }
    }

    /// Readiness-check cadence as a [`Duration`].
    pub fn readiness_interval(&self) -> Duration {
        Duration::from_millis(self.readiness_interval_ms)
    }

    /// Drain cadence as a [`Duration`].
    pub fn drain_interval(&self) -> Duration {
        Duration::from_millis(self.drain_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CollectorConfig::default();
        assert!(config.base_dir.is_none());
        assert_eq!(config.readiness_interval(), Duration::from_secs(1));
        assert_eq!(config.drain_interval(), Duration::from_millis(50));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: CollectorConfig =
            serde_json::from_str(r#"{"base_dir": "/tmp/logs"}"#).expect("Failed to parse config");
        assert_eq!(config.base_dir, Some(PathBuf::from("/tmp/logs")));
        assert_eq!(config.readiness_interval_ms, 1000);
        assert_eq!(config.drain_interval_ms, 50);
    }

    #[test]
    fn test_explicit_base_dir_resolves_verbatim() {
        let config = CollectorConfig {
            base_dir: Some(PathBuf::from("/tmp/daylog-test")),
            ..Default::default()
        };
        let resolved = config.resolve_base_dir().expect("Failed to resolve");
        assert_eq!(resolved, PathBuf::from("/tmp/daylog-test"));
    }
}
