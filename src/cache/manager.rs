//! Typed result cache with statistics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::key::CacheKey;
use super::store::ExpiringCache;

#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
}

impl CacheStats {
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Default)]
struct AtomicStats {
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
}

impl AtomicStats {
    fn to_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            sets: self.sets.load(Ordering::Relaxed),
        }
    }
}

/// [`ExpiringCache`] keyed by [`CacheKey`], with a default TTL and
/// hit/miss accounting. One instance per cached result shape.
pub struct ResultCache<V> {
    store: ExpiringCache<CacheKey, V>,
    default_ttl: Duration,
    stats: AtomicStats,
}

impl<V: Clone> ResultCache<V> {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            store: ExpiringCache::new(),
            default_ttl,
            stats: AtomicStats::default(),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<V> {
        match self.store.get(key) {
            Some(v) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                Some(v)
            }
            None => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn put(&self, key: CacheKey, value: V) {
        self.put_with_ttl(key, value, self.default_ttl);
    }

    pub fn put_with_ttl(&self, key: CacheKey, value: V, ttl: Duration) {
        self.store.set(key, value, ttl);
        self.stats.sets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn sweep(&self) -> usize {
        self.store.sweep()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn clear(&self) {
        self.store.clear();
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.to_stats()
    }
}
