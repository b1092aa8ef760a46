//! Load — config loading from file and environment variables.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::model::{IngestConfig, PoolConfig};

impl IngestConfig {
    /// Load configuration from file or environment variables
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = std::env::var("INGEST_CONFIG_FILE")
            .unwrap_or_else(|_| "/etc/logsift/ingest.toml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            tracing::info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            tracing::info!(
                "Config file not found at {}, using environment variables",
                config_path
            );
            Self::from_env()
        };

        // Environment variables override file config
        if let Ok(root) = std::env::var("INGEST_STORAGE_ROOT") {
            config.storage_root = root;
        }

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: IngestConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> Self {
        let mut config = IngestConfig::default();
        if let Ok(root) = std::env::var("INGEST_STORAGE_ROOT") {
            config.storage_root = root;
        }
        config.pool = PoolConfig::from_env(config.pool);
        config
    }

    /// Validate that configuration values are sane
    pub fn validate(&self) -> Result<(), String> {
        if self.storage_root.is_empty() {
            return Err("storage_root must not be empty".to_string());
        }
        self.pool.validate()
    }
}

impl PoolConfig {
    /// Overlay pool sizing from environment variables onto `base`.
    pub fn from_env(base: PoolConfig) -> Self {
        Self {
            core_workers: env_usize("INGEST_CORE_WORKERS").unwrap_or(base.core_workers),
            max_workers: env_usize("INGEST_MAX_WORKERS").unwrap_or(base.max_workers),
            queue_capacity: env_usize("INGEST_QUEUE_CAPACITY").unwrap_or(base.queue_capacity),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.core_workers == 0 {
            return Err("core_workers must be > 0".to_string());
        }
        if self.max_workers < self.core_workers {
            return Err("max_workers must be >= core_workers".to_string());
        }
        if self.queue_capacity == 0 {
            return Err("queue_capacity must be > 0".to_string());
        }
        Ok(())
    }
}

fn env_usize(name: &str) -> Option<usize> {
    std::env::var(name).ok().and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(IngestConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_core_workers() {
        let mut config = IngestConfig::default();
        config.pool.core_workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_max_below_core() {
        let mut config = IngestConfig::default();
        config.pool.core_workers = 8;
        config.pool.max_workers = 4;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_storage_root() {
        let mut config = IngestConfig::default();
        config.storage_root = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ingest.toml");
        std::fs::write(
            &path,
            "storage_root = \"/srv/bundles\"\n\n[pool]\ncore_workers = 2\nmax_workers = 8\nqueue_capacity = 50\n",
        )
        .unwrap();

        let config = IngestConfig::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.storage_root, "/srv/bundles");
        assert_eq!(config.pool.core_workers, 2);
        assert_eq!(config.pool.max_workers, 8);
        assert_eq!(config.pool.queue_capacity, 50);
    }
}
