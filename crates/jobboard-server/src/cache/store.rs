//! Ephemeral TTL cache backed by a `DashMap`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

/// Default entry lifetime when the caller gives none.
pub const DEFAULT_TTL: Duration = Duration::from_millis(300_000);

/// A cached entry with TTL support.
///
/// The data is wrapped in `Arc` so a hit hands back the stored value itself,
/// not a copy.
#[derive(Debug)]
pub struct CachedEntry<V> {
    pub data: Arc<V>,
    pub stored_at: Instant,
    pub ttl: Duration,
}

impl<V> CachedEntry<V> {
    /// Create a new entry stamped with the current time.
    pub fn new(data: Arc<V>, ttl: Duration) -> Self {
        Self {
            data,
            stored_at: Instant::now(),
            ttl,
        }
    }

    /// An entry stays visible while `now - stored_at <= ttl`.
    pub fn is_expired(&self) -> bool {
        self.stored_at.elapsed() > self.ttl
    }
}

/// Process-local key/value store with per-entry TTL.
///
/// ## Semantics
///
/// - `set` overwrites unconditionally, resetting timestamp and TTL
/// - `get` removes an expired entry the first time it sees it (lazy expiry)
/// - no background sweep, no capacity bound, no eviction
///
/// Concurrent writers to the same key race; the last write wins. Each
/// instance is independent: build one per key-space and share it by cloning
/// the handle.
pub struct EphemeralCache<V> {
    entries: Arc<DashMap<String, CachedEntry<V>>>,
    default_ttl: Duration,
}

impl<V> Clone for EphemeralCache<V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            default_ttl: self.default_ttl,
        }
    }
}

impl<V> Default for EphemeralCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for EphemeralCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EphemeralCache")
            .field("entries", &self.entries.len())
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

impl<V> EphemeralCache<V> {
    /// Create an empty cache with the 300 000 ms default TTL.
    pub fn new() -> Self {
        Self::with_default_ttl(DEFAULT_TTL)
    }

    /// Create an empty cache whose `set_default` uses `default_ttl`.
    pub fn with_default_ttl(default_ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Look up `key`.
    ///
    /// Returns `None` on a miss. A stale entry is deleted and reported as a
    /// miss.
    pub fn get(&self, key: &str) -> Option<Arc<V>> {
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                tracing::debug!(key = %key, "cache hit");
                return Some(Arc::clone(&entry.data));
            }
            Some(_) => {}
            None => {
                tracing::debug!(key = %key, "cache miss");
                return None;
            }
        }

        // A writer may have refreshed the key since the read guard dropped.
        if self.evict_if_expired(key) {
            return None;
        }

        // Refreshed by a concurrent writer: serve the new entry.
        self.get_fresh(key)
    }

    /// Deletes `key` only if the entry currently stored is stale.
    fn evict_if_expired(&self, key: &str) -> bool {
        let evicted = self
            .entries
            .remove_if(key, |_, entry| entry.is_expired())
            .is_some();
        if evicted {
            tracing::debug!(key = %key, "cache entry expired");
        }
        evicted
    }

    fn get_fresh(&self, key: &str) -> Option<Arc<V>> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| Arc::clone(&entry.data))
    }

    /// Store `data` under `key` for `ttl`, replacing any previous entry.
    pub fn set(&self, key: impl Into<String>, data: impl Into<Arc<V>>, ttl: Duration) {
        let key = key.into();
        tracing::debug!(key = %key, ttl_ms = %ttl.as_millis(), "cache set");
        self.entries
            .insert(key, CachedEntry::new(data.into(), ttl));
    }

    /// Store `data` under `key` with the default TTL.
    pub fn set_default(&self, key: impl Into<String>, data: impl Into<Arc<V>>) {
        self.set(key, data, self.default_ttl);
    }

    /// Return the cached value or run `fetch` and cache its result.
    ///
    /// Errors from `fetch` are returned and never cached. Concurrent misses
    /// on the same key each run their own fetch.
    pub async fn get_or_try_fetch<F, Fut, E>(
        &self,
        key: &str,
        ttl: Duration,
        fetch: F,
    ) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(hit) = self.get(key) {
            return Ok(hit);
        }

        let data = Arc::new(fetch().await?);
        self.set(key, Arc::clone(&data), ttl);
        Ok(data)
    }

    /// Remove `key` regardless of freshness. Returns `true` if it was present.
    pub fn invalidate(&self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            tracing::debug!(key = %key, "cache invalidated");
        }
        removed
    }

    /// Raw lookup that ignores expiry and never deletes.
    pub fn contains_raw(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            default_ttl_ms: u64::try_from(self.default_ttl.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub default_ttl_ms: u64,
}
