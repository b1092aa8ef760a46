use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Root directory bundles are stored and extracted under.
    #[serde(default = "default_storage_root")]
    pub storage_root: String,
    #[serde(default)]
    pub pool: PoolConfig,
}

/// Worker pool sizing: a small core of concurrent workers, a larger
/// burst ceiling, and a bounded backlog queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    #[serde(default = "default_core_workers")]
    pub core_workers: usize,
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            storage_root: default_storage_root(),
            pool: PoolConfig::default(),
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            core_workers: default_core_workers(),
            max_workers: default_max_workers(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

fn default_storage_root() -> String {
    let root = if let Some(home) = dirs::home_dir() {
        home.join("logsift-storage")
    } else {
        PathBuf::from("logsift-storage")
    };
    root.to_string_lossy().into_owned()
}

fn default_core_workers() -> usize {
    4
}

fn default_max_workers() -> usize {
    16
}

fn default_queue_capacity() -> usize {
    500
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pool_sizing() {
        let config = IngestConfig::default();
        assert_eq!(config.pool.core_workers, 4);
        assert_eq!(config.pool.max_workers, 16);
        assert_eq!(config.pool.queue_capacity, 500);
        assert!(!config.storage_root.is_empty());
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config: IngestConfig = toml::from_str("storage_root = \"/var/lib/logsift\"").unwrap();
        assert_eq!(config.storage_root, "/var/lib/logsift");
        assert_eq!(config.pool.core_workers, 4);
    }
}
