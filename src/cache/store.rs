//! Concurrent reading store with staleness tracking.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::model::{LocationId, Reading};
use crate::observability::metrics;

/// Default freshness window.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// The last known reading for one location.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub reading: Reading,
    pub acquired_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn is_stale(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        is_stale(self, now, ttl)
    }
}

/// True when the entry is older than `ttl` at `now`.
///
/// An entry exactly `ttl` old is still fresh. Entries stamped in the future
/// (clock skew) count as fresh.
pub fn is_stale(entry: &CacheEntry, now: DateTime<Utc>, ttl: Duration) -> bool {
    let age = now.signed_duration_since(entry.acquired_at);
    match chrono::Duration::from_std(ttl) {
        Ok(ttl) => age > ttl,
        // A ttl too large for chrono never expires.
        Err(_) => false,
    }
}

/// Thread-safe cache keyed by location id.
///
/// Clones share the same map.
#[derive(Debug, Clone)]
pub struct ReadingCache {
    inner: Arc<DashMap<LocationId, CacheEntry>>,
    ttl: Duration,
}

impl ReadingCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, id: &LocationId) -> Option<CacheEntry> {
        self.inner.get(id).map(|r| r.value().clone())
    }

    /// Store a complete reading, replacing any previous entry for `id`.
    pub fn put(&self, id: LocationId, reading: Reading, acquired_at: DateTime<Utc>) {
        self.inner.insert(id, CacheEntry { reading, acquired_at });
        metrics::record_cache_size(self.inner.len());
    }

    /// The cached reading if present and not stale at `now`.
    pub fn fresh(&self, id: &LocationId, now: DateTime<Utc>) -> Option<Reading> {
        let entry = self.inner.get(id)?;
        if entry.is_stale(now, self.ttl) {
            None
        } else {
            Some(entry.reading.clone())
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Copy of every entry, for inspection.
    pub fn snapshot(&self) -> Vec<(LocationId, CacheEntry)> {
        self.inner
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect()
    }
}

impl Default for ReadingCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
