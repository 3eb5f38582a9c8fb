use std::sync::{Arc, PoisonError, RwLock};

use tokio::time::{Duration, Instant};

use azvm_core::metadata::AttributeSet;

#[derive(Debug)]
struct CacheEntry {
    attrs: Arc<AttributeSet>,
    stored_at: Instant,
}

impl CacheEntry {
    /// Fresh iff `now < stored_at + ttl`.
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        self.stored_at
            .checked_add(ttl)
            .map_or(true, |expires_at| now < expires_at)
    }
}

/// Single-entry TTL cache for the VM attribute set.
///
/// Readers always see a whole entry: the set and its timestamp are swapped
/// together under the write lock. The entry is never removed, only replaced,
/// so an expired set stays reachable through [`MetadataCache::get_stale`].
#[derive(Debug)]
pub struct MetadataCache {
    ttl: Duration,
    entry: RwLock<Option<CacheEntry>>,
}

impl MetadataCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: RwLock::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Stored set if still fresh, `None` when empty or expired.
    pub fn get(&self) -> Option<Arc<AttributeSet>> {
        let now = Instant::now();
        let entry = self.entry.read().unwrap_or_else(PoisonError::into_inner);
        entry
            .as_ref()
            .filter(|e| e.is_fresh(now, self.ttl))
            .map(|e| Arc::clone(&e.attrs))
    }

    /// Last stored set regardless of age.
    pub fn get_stale(&self) -> Option<Arc<AttributeSet>> {
        let entry = self.entry.read().unwrap_or_else(PoisonError::into_inner);
        entry.as_ref().map(|e| Arc::clone(&e.attrs))
    }

    /// Replace the entry wholesale and restart its TTL.
    pub fn put(&self, attrs: AttributeSet) -> Arc<AttributeSet> {
        let attrs = Arc::new(attrs);
        let fresh = CacheEntry {
            attrs: Arc::clone(&attrs),
            stored_at: Instant::now(),
        };
        *self.entry.write().unwrap_or_else(PoisonError::into_inner) = Some(fresh);
        attrs
    }
}
