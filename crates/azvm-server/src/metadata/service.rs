use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

use azvm_core::error::ServiceError;
use azvm_core::metadata::{extract, AttributeSet};

use super::cache::MetadataCache;
use super::source::MetadataSource;

/// Outcome of the last refresh, kept for callers that queued behind it.
#[derive(Default)]
struct RefreshState {
    last_error: Option<ServiceError>,
}

/// Cache-fronted access to the VM attribute set.
///
/// Shared by the HTTP handler and the startup enrichment path. Concurrent
/// misses are collapsed: one caller refreshes while the others wait on the
/// refresh lock, then take its result (the fresh entry, or a clone of its
/// error) instead of fetching again.
pub struct MetadataService {
    source: Arc<dyn MetadataSource>,
    cache: MetadataCache,
    stale_on_error: bool,
    refresh: Mutex<RefreshState>,
    /// Completed refreshes; bumped while `refresh` is held.
    completed: AtomicU64,
}

impl MetadataService {
    pub fn new(source: Arc<dyn MetadataSource>, ttl: Duration, stale_on_error: bool) -> Self {
        Self {
            source,
            cache: MetadataCache::new(ttl),
            stale_on_error,
            refresh: Mutex::new(RefreshState::default()),
            completed: AtomicU64::new(0),
        }
    }

    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    pub async fn attributes(&self) -> Result<Arc<AttributeSet>, ServiceError> {
        if let Some(attrs) = self.cache.get() {
            tracing::debug!("metadata cache hit");
            return Ok(attrs);
        }

        let seen = self.completed.load(Ordering::Acquire);
        let mut state = self.refresh.lock().await;

        if let Some(attrs) = self.cache.get() {
            tracing::debug!("metadata filled by concurrent refresh");
            return Ok(attrs);
        }
        if self.completed.load(Ordering::Acquire) != seen {
            if let Some(err) = state.last_error.clone() {
                tracing::debug!(error = %err, "sharing failed concurrent refresh");
                return self.fallback(err);
            }
        }

        tracing::debug!("metadata cache miss");
        let outcome = self.refresh().await;
        state.last_error = outcome.as_ref().err().cloned();
        self.completed.fetch_add(1, Ordering::Release);
        drop(state);

        outcome.or_else(|err| self.fallback(err))
    }

    async fn refresh(&self) -> Result<Arc<AttributeSet>, ServiceError> {
        let started = Instant::now();

        let raw = self.source.fetch().await.inspect_err(|e| {
            tracing::warn!(error = %e, "metadata fetch failed");
        })?;
        let attrs = extract(&raw).inspect_err(|e| {
            tracing::warn!(error = %e, "metadata payload rejected");
        })?;

        tracing::info!(
            attrs = attrs.len(),
            elapsed = ?started.elapsed(),
            ttl_secs = self.cache.ttl().as_secs(),
            "metadata refreshed"
        );
        Ok(self.cache.put(attrs))
    }

    fn fallback(&self, err: ServiceError) -> Result<Arc<AttributeSet>, ServiceError> {
        if self.stale_on_error {
            if let Some(stale) = self.cache.get_stale() {
                tracing::warn!(error = %err, "serving stale metadata");
                return Ok(stale);
            }
        }
        Err(err)
    }
}
