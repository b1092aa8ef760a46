use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::bundle::Bundle;
use crate::parser::LogEvent;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("bundle not found: {0}")]
    BundleNotFound(String),
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Persistence operations the pipeline needs from a record store.
///
/// Lookup-by-id plus status writes for bundles, and bulk inserts for
/// extracted events. Range queries, pagination and deletion belong to
/// the surrounding service, not to this contract.
pub trait RecordStore: Send + Sync {
    /// Create a new bundle record. Fails on a duplicate id.
    fn insert_bundle(
        &self,
        bundle: Bundle,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>>;

    /// Look up a bundle by id; `Ok(None)` when no record exists.
    fn get_bundle<'a>(
        &'a self,
        id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Bundle>, StoreError>> + Send + 'a>>;

    /// Persist an updated bundle record (status transitions).
    fn update_bundle(
        &self,
        bundle: Bundle,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>>;

    /// Bulk-insert events, each already bound to its owning bundle.
    fn append_events(
        &self,
        events: Vec<LogEvent>,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>>;
}
