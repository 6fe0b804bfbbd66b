//! 实例池模块：有上限的实例池，压力下整体重置而非逐条淘汰。
//!
//! # Bounded Instance Pool Module
//!
//! Memoizes expensive-to-construct instances (e.g. provider clients bound
//! to API credentials) behind a size ceiling. Eviction is reset-on-pressure:
//! when inserting a new key would exceed the ceiling, the whole pool is
//! cleared first. Construction is assumed cheap enough that a full reset is
//! an acceptable trade against recency bookkeeping.
//!
//! A wall-clock cleanup check runs on every `acquire`, so a pool that is
//! never touched never grows stale silently. [`InstancePool::cleanup`] is
//! additionally safe to call from external triggers at any time.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::Result;

struct PoolState<K, V> {
    instances: HashMap<K, V>,
    last_cleanup: Instant,
}

pub struct InstancePool<K, V> {
    state: RwLock<PoolState<K, V>>,
    max_size: usize,
    cleanup_interval: Duration,
}

impl<K: Eq + Hash, V: Clone> InstancePool<K, V> {
    pub fn new(max_size: usize, cleanup_interval: Duration) -> Self {
        Self {
            state: RwLock::new(PoolState {
                instances: HashMap::new(),
                last_cleanup: Instant::now(),
            }),
            max_size: max_size.max(1),
            cleanup_interval,
        }
    }

    /// Return the cached instance for `key`, constructing it via `factory`
    /// on a miss. A factory failure propagates to the caller and nothing is
    /// cached under the failing key.
    ///
    /// The whole sequence runs under one lock guard: cleanup check, lookup,
    /// pressure reset, construction, insertion.
    pub fn acquire(&self, key: K, factory: impl FnOnce() -> Result<V>) -> Result<V> {
        let mut state = self.state.write().unwrap();
        Self::maybe_cleanup_locked(&mut state, self.cleanup_interval);

        if let Some(existing) = state.instances.get(&key) {
            return Ok(existing.clone());
        }
        if state.instances.len() >= self.max_size {
            tracing::debug!(
                discarded = state.instances.len(),
                max_size = self.max_size,
                "instance pool at capacity, resetting"
            );
            state.instances.clear();
        }
        let value = factory()?;
        state.instances.insert(key, value.clone());
        Ok(value)
    }

    /// Discard all instances unconditionally. Idempotent on an empty pool.
    /// Returns how many instances were dropped.
    pub fn cleanup(&self) -> usize {
        let mut state = self.state.write().unwrap();
        let removed = state.instances.len();
        state.instances.clear();
        state.last_cleanup = Instant::now();
        removed
    }

    /// Run the wall-clock cleanup if the interval has elapsed; otherwise do
    /// nothing. Suitable for a shared sweep schedule.
    pub fn maybe_cleanup(&self) -> usize {
        let mut state = self.state.write().unwrap();
        Self::maybe_cleanup_locked(&mut state, self.cleanup_interval)
    }

    fn maybe_cleanup_locked(state: &mut PoolState<K, V>, interval: Duration) -> usize {
        if state.last_cleanup.elapsed() < interval {
            return 0;
        }
        let removed = state.instances.len();
        state.instances.clear();
        state.last_cleanup = Instant::now();
        removed
    }

    pub fn len(&self) -> usize {
        self.state.read().unwrap().instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
