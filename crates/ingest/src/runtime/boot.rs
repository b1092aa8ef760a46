//! Boot — logging init, config load, state and worker pool creation.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::conf::IngestConfig;
use crate::pipeline::IngestPool;
use crate::state::{IngestState, SharedState};
use crate::store::MemoryStore;

/// Initialise the tracing / logging subsystem.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ingest=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Load config, prepare the storage root, build shared state and start
/// the worker pool.
///
/// Returns `(SharedState, IngestPool)` on success.
pub async fn boot() -> Result<(SharedState, Arc<IngestPool>), Box<dyn std::error::Error>> {
    info!("Starting logsift ingest v0.0.1");

    let config = IngestConfig::load()?;
    config.validate()?;
    info!("Loaded configuration: storage_root={}", config.storage_root);
    info!(
        "Worker pool: core={}, max={}, queue={}",
        config.pool.core_workers, config.pool.max_workers, config.pool.queue_capacity
    );

    std::fs::create_dir_all(&config.storage_root)?;

    let store = Arc::new(MemoryStore::new());
    let state: SharedState = Arc::new(IngestState::new(config, store));
    info!(
        "Initialized shared application state ({} parsers registered)",
        state.registry.len()
    );

    let pool = IngestPool::start(Arc::clone(&state));
    Ok((state, pool))
}
