//! Pool — bounded worker pool for bundle processing.
//!
//! Triggering ingestion returns immediately to the caller while the run
//! proceeds on a pool worker. A fixed core of long-lived workers drains
//! a bounded queue; when the queue is full, jobs run on ephemeral burst
//! workers up to the configured ceiling. A submission that finds both
//! the queue and the burst capacity exhausted fails fast — it never
//! blocks and never silently drops work.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::{Mutex, Semaphore};
use tracing::{debug, warn};

use super::run;
use crate::state::SharedState;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("ingest queue is full")]
    QueueFull,
    #[error("ingest pool is shut down")]
    Closed,
}

pub struct IngestPool {
    state: SharedState,
    queue: mpsc::Sender<String>,
    burst: Arc<Semaphore>,
    /// Receiver shared with the core workers; held here so the queue
    /// stays open for the lifetime of the pool handle.
    _queue_rx: Arc<Mutex<mpsc::Receiver<String>>>,
}

impl IngestPool {
    /// Spawn the core workers and return the pool handle.
    pub fn start(state: SharedState) -> Arc<Self> {
        let sizing = state.config.pool.clone();
        let (queue, rx) = mpsc::channel::<String>(sizing.queue_capacity);
        let rx = Arc::new(Mutex::new(rx));

        for worker in 0..sizing.core_workers {
            let rx = Arc::clone(&rx);
            let state = Arc::clone(&state);
            tokio::spawn(async move {
                debug!("ingest worker {} started", worker);
                loop {
                    let job = {
                        let mut rx = rx.lock().await;
                        rx.recv().await
                    };
                    match job {
                        Some(bundle_id) => run::process(&state, &bundle_id).await,
                        None => break,
                    }
                }
                debug!("ingest worker {} stopped", worker);
            });
        }

        let burst_permits = sizing.max_workers.saturating_sub(sizing.core_workers);
        Arc::new(Self {
            state,
            queue,
            burst: Arc::new(Semaphore::new(burst_permits)),
            _queue_rx: rx,
        })
    }

    /// Submit a bundle for asynchronous processing.
    ///
    /// Fire-and-forget: the outcome of the run is observable only via
    /// the bundle's status.
    pub fn submit(&self, bundle_id: &str) -> Result<(), SubmitError> {
        match self.queue.try_send(bundle_id.to_string()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Closed(_)) => Err(SubmitError::Closed),
            Err(TrySendError::Full(bundle_id)) => {
                match Arc::clone(&self.burst).try_acquire_owned() {
                    Ok(permit) => {
                        let state = Arc::clone(&self.state);
                        tokio::spawn(async move {
                            run::process(&state, &bundle_id).await;
                            drop(permit);
                        });
                        Ok(())
                    }
                    Err(_) => {
                        warn!("ingest queue full, rejecting bundle {}", bundle_id);
                        Err(SubmitError::QueueFull)
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::{Bundle, BundleStatus};
    use crate::conf::{IngestConfig, PoolConfig};
    use crate::parser::LogEvent;
    use crate::state::IngestState;
    use crate::store::{MemoryStore, RecordStore, StoreError};
    use std::fs;
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Store whose lookups never resolve, pinning workers in place.
    struct StalledStore;

    impl RecordStore for StalledStore {
        fn insert_bundle(
            &self,
            _bundle: Bundle,
        ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>> {
            Box::pin(std::future::pending())
        }

        fn get_bundle<'a>(
            &'a self,
            _id: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Option<Bundle>, StoreError>> + Send + 'a>>
        {
            Box::pin(std::future::pending())
        }

        fn update_bundle(
            &self,
            _bundle: Bundle,
        ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>> {
            Box::pin(std::future::pending())
        }

        fn append_events(
            &self,
            _events: Vec<LogEvent>,
        ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>> {
            Box::pin(std::future::pending())
        }
    }

    fn make_config(core: usize, max: usize, queue: usize) -> IngestConfig {
        IngestConfig {
            pool: PoolConfig {
                core_workers: core,
                max_workers: max,
                queue_capacity: queue,
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_full_queue_fails_fast_without_burst() {
        let state = Arc::new(IngestState::new(
            make_config(1, 1, 1),
            Arc::new(StalledStore),
        ));
        let pool = IngestPool::start(Arc::clone(&state));

        pool.submit("a").unwrap();
        // Let the worker pick up "a" and stall inside the store.
        tokio::time::sleep(Duration::from_millis(50)).await;
        pool.submit("b").unwrap();
        assert!(matches!(pool.submit("c"), Err(SubmitError::QueueFull)));
    }

    #[tokio::test]
    async fn test_burst_worker_absorbs_overflow_up_to_ceiling() {
        let state = Arc::new(IngestState::new(
            make_config(1, 2, 1),
            Arc::new(StalledStore),
        ));
        let pool = IngestPool::start(Arc::clone(&state));

        pool.submit("a").unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        pool.submit("b").unwrap();
        // Queue full, but one burst permit is available.
        pool.submit("c").unwrap();
        // Queue and burst ceiling both exhausted.
        assert!(matches!(pool.submit("d"), Err(SubmitError::QueueFull)));
    }

    #[tokio::test]
    async fn test_pool_drains_submitted_bundle() {
        let dir = TempDir::new().unwrap();
        let stored = dir.path().join("b-1").join("device.log");
        fs::create_dir_all(stored.parent().unwrap()).unwrap();
        fs::write(&stored, "[I]|2025-06-30 15:08:56.004|MOD|TAG1|hi\n").unwrap();

        let store = Arc::new(MemoryStore::new());
        store
            .insert_bundle(Bundle::stored("b-1".into(), "device.log".into(), stored))
            .await
            .unwrap();
        let state = Arc::new(IngestState::new(make_config(2, 4, 10), store.clone()));
        let pool = IngestPool::start(Arc::clone(&state));

        pool.submit("b-1").unwrap();

        let mut status = BundleStatus::Stored;
        for _ in 0..50 {
            tokio::time::sleep(Duration::from_millis(20)).await;
            status = store.get_bundle("b-1").await.unwrap().unwrap().status;
            if status.is_terminal() {
                break;
            }
        }
        assert_eq!(status, BundleStatus::Parsed);
    }
}
