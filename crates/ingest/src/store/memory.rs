//! Memory — in-process record store.
//!
//! Implements [`RecordStore`] over mutex-guarded in-memory state. Backs
//! the runtime when no external database is wired in, and gives tests a
//! deterministic collaborator. Also carries the event query surface a
//! listing layer builds on.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use chrono::NaiveDateTime;
use tokio::sync::Mutex;

use crate::bundle::Bundle;
use crate::parser::LogEvent;
use crate::store::traits::{RecordStore, StoreError};

/// Filter for event queries. Empty fields match everything; the
/// timestamp bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    pub level: Option<String>,
    pub tag: Option<String>,
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

/// Mutable inner state protected by a mutex.
#[derive(Default)]
struct Inner {
    bundles: HashMap<String, Bundle>,
    events: HashMap<String, Vec<LogEvent>>,
}

pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    /// All events for a bundle, in insertion order.
    pub async fn list_events(&self, bundle_id: &str) -> Vec<LogEvent> {
        let state = self.inner.lock().await;
        state.events.get(bundle_id).cloned().unwrap_or_default()
    }

    /// Filtered events for a bundle, in ascending timestamp order
    /// (events without a timestamp sort first).
    ///
    /// Level matching honours the short/full alias pairs used by the
    /// mobile formats: `Error↔E`, `Warn↔W`, `Info↔I`, `Debug↔D`.
    pub async fn query_events(&self, bundle_id: &str, query: &EventQuery) -> Vec<LogEvent> {
        let state = self.inner.lock().await;
        let mut matched: Vec<LogEvent> = state
            .events
            .get(bundle_id)
            .map(|events| {
                events
                    .iter()
                    .filter(|e| query_matches(query, e))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        matched.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        matched
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn query_matches(query: &EventQuery, event: &LogEvent) -> bool {
    if let Some(level) = &query.level {
        if !level_matches(level, &event.level) {
            return false;
        }
    }
    if let Some(tag) = &query.tag {
        if &event.tag != tag {
            return false;
        }
    }
    if let Some(from) = &query.from {
        match event.timestamp {
            Some(ts) if ts >= *from => {}
            _ => return false,
        }
    }
    if let Some(to) = &query.to {
        match event.timestamp {
            Some(ts) if ts <= *to => {}
            _ => return false,
        }
    }
    true
}

fn level_matches(wanted: &str, actual: &str) -> bool {
    if wanted.eq_ignore_ascii_case(actual) {
        return true;
    }
    matches!(
        (wanted.to_ascii_lowercase().as_str(), actual),
        ("error", "E")
            | ("warn", "W")
            | ("info", "I")
            | ("debug", "D")
            | ("e", "Error")
            | ("w", "Warn")
            | ("i", "Info")
            | ("d", "Debug")
    )
}

impl RecordStore for MemoryStore {
    fn insert_bundle(
        &self,
        bundle: Bundle,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>> {
        Box::pin(async move {
            let mut state = self.inner.lock().await;
            if state.bundles.contains_key(&bundle.id) {
                return Err(StoreError::Backend(format!(
                    "duplicate bundle id: {}",
                    bundle.id
                )));
            }
            state.bundles.insert(bundle.id.clone(), bundle);
            Ok(())
        })
    }

    fn get_bundle<'a>(
        &'a self,
        id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Bundle>, StoreError>> + Send + 'a>> {
        Box::pin(async move {
            let state = self.inner.lock().await;
            Ok(state.bundles.get(id).cloned())
        })
    }

    fn update_bundle(
        &self,
        bundle: Bundle,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>> {
        Box::pin(async move {
            let mut state = self.inner.lock().await;
            if !state.bundles.contains_key(&bundle.id) {
                return Err(StoreError::BundleNotFound(bundle.id.clone()));
            }
            state.bundles.insert(bundle.id.clone(), bundle);
            Ok(())
        })
    }

    fn append_events(
        &self,
        events: Vec<LogEvent>,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>> {
        Box::pin(async move {
            let mut state = self.inner.lock().await;
            for event in events {
                state
                    .events
                    .entry(event.bundle_id.clone())
                    .or_default()
                    .push(event);
            }
            Ok(())
        })
    }
}
