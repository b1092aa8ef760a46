//! Intake — accept an on-disk artifact into the storage layout.
//!
//! Upload and download mechanics live outside the core; by the time a
//! bundle reaches intake its content is already a local file. Intake
//! copies it under `<root>/<yyyymmdd>/<uuid>/`, creates the `Stored`
//! record and submits the id for asynchronous processing.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use super::model::Bundle;
use crate::pipeline::{IngestPool, SubmitError};
use crate::state::SharedState;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("source is not a regular file: {0}")]
    MissingSource(PathBuf),
    #[error("source file is empty: {0}")]
    EmptySource(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("record store failure: {0}")]
    Store(#[from] StoreError),
    #[error("submission failed: {0}")]
    Submit(#[from] SubmitError),
}

pub struct Intake {
    state: SharedState,
    pool: Arc<IngestPool>,
}

impl Intake {
    pub fn new(state: SharedState, pool: Arc<IngestPool>) -> Self {
        Self { state, pool }
    }

    /// Store a local file as a new bundle and submit it for processing.
    /// Returns the assigned bundle id.
    pub async fn ingest_local(&self, source: &Path) -> Result<String, IntakeError> {
        if !source.is_file() {
            return Err(IntakeError::MissingSource(source.to_path_buf()));
        }
        if fs::metadata(source)?.len() == 0 {
            return Err(IntakeError::EmptySource(source.to_path_buf()));
        }

        let original_name = source
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.to_string())
            .unwrap_or_else(|| "unknown_file".to_string());

        let id = Uuid::new_v4().to_string();
        let dir = self.prepare_dir(&id)?;
        let target = dir.join(&original_name);
        fs::copy(source, &target)?;

        self.state
            .store
            .insert_bundle(Bundle::stored(id.clone(), original_name, target))
            .await?;
        info!("stored bundle {}, submitting for processing", id);
        self.pool.submit(&id)?;
        Ok(id)
    }

    fn prepare_dir(&self, id: &str) -> Result<PathBuf, std::io::Error> {
        let date_prefix = chrono::Local::now().format("%Y%m%d").to_string();
        let dir = Path::new(&self.state.config.storage_root)
            .join(date_prefix)
            .join(id);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}
