//! Bounded LRU cache for optimization results.
//!
//! # Responsibilities
//! - Map (content, options) keys to previously computed results
//! - Evict the least-recently-used entry once full
//! - Track hit/miss counters for the observability surface
//!
//! # Design Decisions
//! - One mutex guards the map and the recency clock together: a `get` must
//!   refresh recency atomically with the lookup
//! - Entries are cloned out; callers never hold references into the cache
//! - A miss is never an error — callers fall through to the full pipeline

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::SystemTime;

use serde::Serialize;

use crate::cache::key::CacheKey;
use crate::observability::metrics;

/// A cached optimization result.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The optimized (and possibly case-converted) document.
    pub result: String,
    pub original_size: usize,
    pub optimized_size: usize,
    pub inserted_at: SystemTime,
    /// Security warnings produced when this entry was computed, replayed on
    /// hits so cached responses match the original one.
    pub warnings: Vec<String>,
}

impl CacheEntry {
    pub fn new(result: String, original_size: usize, warnings: Vec<String>) -> Self {
        let optimized_size = result.len();
        Self {
            result,
            original_size,
            optimized_size,
            inserted_at: SystemTime::now(),
            warnings,
        }
    }
}

struct Slot {
    entry: CacheEntry,
    last_access: u64,
}

struct Inner {
    map: HashMap<CacheKey, Slot>,
    /// Monotonic recency clock; bumped on every get/insert.
    clock: u64,
}

/// Aggregate counters exposed to dashboards. The cache is never exposed as a
/// key/value interface.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
    pub max_size: usize,
    pub hit_rate: String,
}

/// Thread-safe bounded result cache.
pub struct OptimizationCache {
    inner: Mutex<Inner>,
    hits: AtomicU64,
    misses: AtomicU64,
    max_entries: usize,
}

impl OptimizationCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                map: HashMap::new(),
                clock: 0,
            }),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            max_entries,
        }
    }

    /// Look up an entry, refreshing its recency on hit.
    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        let mut inner = self.inner.lock().expect("cache mutex poisoned");
        inner.clock += 1;
        let clock = inner.clock;

        match inner.map.get_mut(key) {
            Some(slot) => {
                slot.last_access = clock;
                self.hits.fetch_add(1, Ordering::Relaxed);
                metrics::record_cache_lookup(true);
                Some(slot.entry.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                metrics::record_cache_lookup(false);
                None
            }
        }
    }

    /// Insert an entry, evicting the least-recently-used slot when full.
    /// Re-inserting an existing key overwrites it (last write wins).
    pub fn insert(&self, key: CacheKey, entry: CacheEntry) {
        let mut inner = self.inner.lock().expect("cache mutex poisoned");
        inner.clock += 1;
        let clock = inner.clock;

        if !inner.map.contains_key(&key) && inner.map.len() >= self.max_entries {
            let victim = inner
                .map
                .iter()
                .min_by_key(|(_, slot)| slot.last_access)
                .map(|(k, _)| *k);
            if let Some(victim) = victim {
                inner.map.remove(&victim);
                tracing::debug!(key = %victim, "Evicted least-recently-used cache entry");
            }
        }

        inner.map.insert(
            key,
            Slot {
                entry,
                last_access: clock,
            },
        );
        metrics::record_cache_size(inner.map.len());
    }

    /// Snapshot of the aggregate counters.
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;
        let hit_rate = if lookups == 0 {
            "0%".to_string()
        } else {
            format!("{:.1}%", hits as f64 * 100.0 / lookups as f64)
        };

        let size = self.inner.lock().expect("cache mutex poisoned").map.len();
        CacheStats {
            hits,
            misses,
            size,
            max_size: self.max_entries,
            hit_rate,
        }
    }
}
