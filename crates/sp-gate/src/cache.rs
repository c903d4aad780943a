//! TTL cache with lazy expiry and a best-effort capacity guard.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use crate::clock::{Clock, SystemClock};

/// Cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    /// Entries dropped to stay under `max_items`.
    pub evictions: u64,
    /// Entries dropped because their TTL ran out.
    pub expirations: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 { 0.0 } else { self.hits as f64 / total as f64 }
    }
}

#[derive(Debug)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

#[derive(Debug)]
struct Inner<V> {
    entries: HashMap<String, CacheEntry<V>>,
    stats: CacheStats,
}

/// Key → value store with per-entry expiry. No background sweeper: expired
/// entries go on `get` of that key or on the sweep at the start of `set`.
/// Capacity eviction picks arbitrary entries; it is not LRU.
pub struct TtlCache<V> {
    ttl: Duration,
    max_items: usize,
    clock: Arc<dyn Clock>,
    inner: Mutex<Inner<V>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration, max_items: usize) -> Self {
        Self::with_clock(ttl, max_items, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, max_items: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            max_items,
            clock,
            inner: Mutex::new(Inner { entries: HashMap::new(), stats: CacheStats::default() }),
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let expired = inner.entries.get(key).map(|e| now > e.expires_at);
        let live = match expired {
            Some(false) => inner.entries.get(key).map(|e| e.value.clone()),
            Some(true) => {
                inner.entries.remove(key);
                inner.stats.expirations += 1;
                trace!(key, "cache entry expired");
                None
            }
            None => None,
        };

        if live.is_some() {
            inner.stats.hits += 1;
        } else {
            inner.stats.misses += 1;
        }
        live
    }

    pub fn set(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        let now = self.clock.now();
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let before = inner.entries.len();
        inner.entries.retain(|_, e| now <= e.expires_at);
        inner.stats.expirations += (before - inner.entries.len()) as u64;

        // Overwrites do not grow the store.
        if !inner.entries.contains_key(&key) {
            while inner.entries.len() >= self.max_items {
                let Some(victim) = inner.entries.keys().next().cloned() else { break };
                inner.entries.remove(&victim);
                inner.stats.evictions += 1;
                debug!(key = %victim, "cache entry evicted for capacity");
            }
        }

        inner.entries.insert(key, CacheEntry { value, expires_at: now + self.ttl });
        inner.stats.sets += 1;
    }

    pub fn remove(&self, key: &str) -> Option<V> {
        self.inner.lock().entries.remove(key).map(|e| e.value)
    }

    pub fn clear(&self) {
        self.inner.lock().entries.clear();
    }

    /// Stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats
    }

    pub fn reset_stats(&self) {
        self.inner.lock().stats = CacheStats::default();
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }
}
