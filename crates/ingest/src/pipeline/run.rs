//! Run — the end-to-end job for one bundle.
//!
//! Drives `Stored → Extracted → Parsed`, transitioning to `Failed` with
//! the underlying message when an unrecoverable error stops the run.
//! Finer-grained problems (a skipped archive entry, a failed parser
//! attempt, an unparseable nested archive) are absorbed and logged so
//! the rest of the bundle still makes progress.

use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::bundle::{Bundle, BundleStatus};
use crate::extract::{self, ExtractError};
use crate::state::SharedState;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),
    #[error("directory walk failed: {0}")]
    Walk(#[from] std::io::Error),
    #[error("record store failure: {0}")]
    Store(#[from] StoreError),
}

/// Process one bundle end to end.
///
/// Never returns an error to the caller: completion is observable only
/// through the bundle's status. A submission for a bundle that is
/// already in flight is dropped with a warning and no state change.
pub async fn process(state: &SharedState, bundle_id: &str) {
    if state.inflight.insert(bundle_id.to_string(), ()).is_some() {
        warn!(
            "bundle {} already has a run in flight, ignoring re-submission",
            bundle_id
        );
        return;
    }
    run(state, bundle_id).await;
    state.inflight.remove(bundle_id);
}

async fn run(state: &SharedState, bundle_id: &str) {
    // Lookup failure aborts before any state mutation.
    let mut bundle = match state.store.get_bundle(bundle_id).await {
        Ok(Some(bundle)) => bundle,
        Ok(None) => {
            error!("no bundle record found for id {}", bundle_id);
            return;
        }
        Err(e) => {
            error!("bundle lookup failed for id {}: {}", bundle_id, e);
            return;
        }
    };

    if let Err(e) = advance(state, &mut bundle).await {
        error!("failed to extract/parse bundle {}: {}", bundle_id, e);
        bundle.status = BundleStatus::Failed;
        bundle.message = Some(e.to_string());
        if let Err(e) = state.store.update_bundle(bundle).await {
            error!("could not record failure for bundle {}: {}", bundle_id, e);
        }
    }
}

async fn advance(state: &SharedState, bundle: &mut Bundle) -> Result<(), PipelineError> {
    let extracted = extract::extract(&bundle.stored_path)?;
    bundle.extracted_path = Some(extracted.clone());
    bundle.status = BundleStatus::Extracted;
    state.store.update_bundle(bundle.clone()).await?;
    info!("bundle {} extracted to {}", bundle.id, extracted.display());

    descend(state, &extracted, &bundle.id).await?;

    bundle.status = BundleStatus::Parsed;
    state.store.update_bundle(bundle.clone()).await?;
    info!("bundle {} parsed", bundle.id);
    Ok(())
}

/// Walk a directory tree, unpacking nested archives and dispatching
/// regular files to the parser registry.
///
/// A nested archive is extracted into its own sibling `extracted/`
/// directory, and that directory is descended into before the walk of
/// the current level continues. Recursion depth is unbounded.
fn descend<'a>(
    state: &'a SharedState,
    dir: &'a Path,
    bundle_id: &'a str,
) -> Pin<Box<dyn Future<Output = Result<(), PipelineError>> + Send + 'a>> {
    Box::pin(async move {
        let mut entries: Vec<PathBuf> = Vec::new();
        for entry in fs::read_dir(dir)? {
            entries.push(entry?.path());
        }
        entries.sort();

        for path in entries {
            if path.is_dir() {
                descend(state, &path, bundle_id).await?;
                continue;
            }
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();
            if extract::is_archive_name(name) {
                match extract::extract(&path) {
                    Ok(sub) => descend(state, &sub, bundle_id).await?,
                    Err(e) => {
                        warn!(
                            "failed to extract nested archive {}: {}",
                            path.display(),
                            e
                        );
                    }
                }
            } else {
                let events = state.registry.dispatch(&path);
                if !events.is_empty() {
                    let count = events.len();
                    let events = events.into_iter().map(|e| e.bind(bundle_id)).collect();
                    state.store.append_events(events).await?;
                    info!("parsed {} events from {}", count, path.display());
                }
            }
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conf::IngestConfig;
    use crate::state::IngestState;
    use crate::store::{MemoryStore, RecordStore};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn make_state(store: Arc<MemoryStore>) -> SharedState {
        Arc::new(IngestState::new(IngestConfig::default(), store))
    }

    async fn seed_bundle(store: &MemoryStore, dir: &TempDir, content: &str) -> String {
        let stored = dir.path().join("b-1").join("device.log");
        fs::create_dir_all(stored.parent().unwrap()).unwrap();
        fs::write(&stored, content).unwrap();
        let bundle = Bundle::stored("b-1".into(), "device.log".into(), stored);
        store.insert_bundle(bundle).await.unwrap();
        "b-1".to_string()
    }

    #[tokio::test]
    async fn test_plain_file_reaches_parsed() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(MemoryStore::new());
        let id = seed_bundle(
            &store,
            &dir,
            "[I]|2025-06-30 15:08:56.004|MOD|TAG123|hello world\n",
        )
        .await;
        let state = make_state(Arc::clone(&store));

        process(&state, &id).await;

        let bundle = store.get_bundle(&id).await.unwrap().unwrap();
        assert_eq!(bundle.status, BundleStatus::Parsed);
        assert!(bundle.extracted_path.is_some());
        assert_eq!(store.list_events(&id).await.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_bundle_mutates_nothing() {
        let store = Arc::new(MemoryStore::new());
        let state = make_state(Arc::clone(&store));

        process(&state, "ghost").await;

        assert!(store.get_bundle("ghost").await.unwrap().is_none());
        assert!(state.inflight.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_archive_fails_with_message() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(MemoryStore::new());
        let stored = dir.path().join("b-1").join("broken.zip");
        fs::create_dir_all(stored.parent().unwrap()).unwrap();
        fs::write(&stored, b"not really a zip").unwrap();
        store
            .insert_bundle(Bundle::stored("b-1".into(), "broken.zip".into(), stored))
            .await
            .unwrap();
        let state = make_state(Arc::clone(&store));

        process(&state, "b-1").await;

        let bundle = store.get_bundle("b-1").await.unwrap().unwrap();
        assert_eq!(bundle.status, BundleStatus::Failed);
        assert!(!bundle.message.as_deref().unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn test_inflight_marker_drops_duplicate_submission() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(MemoryStore::new());
        let id = seed_bundle(
            &store,
            &dir,
            "[I]|2025-06-30 15:08:56.004|MOD|TAG123|hello world\n",
        )
        .await;
        let state = make_state(Arc::clone(&store));

        // Simulate a run already holding the marker.
        state.inflight.insert(id.clone(), ());
        process(&state, &id).await;

        let bundle = store.get_bundle(&id).await.unwrap().unwrap();
        assert_eq!(bundle.status, BundleStatus::Stored);
        assert!(store.list_events(&id).await.is_empty());
        // The marker belongs to the other run and must survive.
        assert!(state.inflight.contains_key(&id));
    }

    #[tokio::test]
    async fn test_marker_released_after_run() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(MemoryStore::new());
        let id = seed_bundle(&store, &dir, "noise only\n").await;
        let state = make_state(Arc::clone(&store));

        process(&state, &id).await;

        assert!(state.inflight.is_empty());
        let bundle = store.get_bundle(&id).await.unwrap().unwrap();
        // No parser matched anything; the walk still completed.
        assert_eq!(bundle.status, BundleStatus::Parsed);
    }
}
