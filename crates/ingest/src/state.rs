//! Shared state — configuration, record store, parser registry.

use std::sync::Arc;

use dashmap::DashMap;

use crate::conf::IngestConfig;
use crate::parser::ParserRegistry;
use crate::store::RecordStore;

pub struct IngestState {
    pub config: IngestConfig,
    pub store: Arc<dyn RecordStore>,
    pub registry: ParserRegistry,
    /// Bundle ids with a pipeline run currently in flight. Guards the
    /// per-bundle extraction directory against concurrent re-submission.
    pub inflight: DashMap<String, ()>,
}

impl IngestState {
    pub fn new(config: IngestConfig, store: Arc<dyn RecordStore>) -> Self {
        Self {
            config,
            store,
            registry: ParserRegistry::new(),
            inflight: DashMap::new(),
        }
    }
}

pub type SharedState = Arc<IngestState>;
