//! In-memory response cache with a fixed time-to-live and a bounded entry count.
//!
//! Entries expire `ttl` after they were written; reading never extends an entry's
//! life or its eviction rank. When the cache is full, the entry that was written
//! (or replaced) longest ago is evicted first.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio::time::Instant;

use crate::params::QueryParams;

const KEY_NAMESPACE: &str = "fred";

/// Builds the request signature for an endpoint and its normalized parameters.
///
/// Keys are sorted, so two maps with the same pairs map to the same signature
/// regardless of how they were assembled.
pub fn cache_key(endpoint: &str, params: &QueryParams) -> String {
    let joined = params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("{KEY_NAMESPACE}:{endpoint}:{joined}")
}

/// Size snapshot reported by the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
}

#[derive(Debug)]
struct CacheEntry {
    body: Value,
    written_at: Instant,
    generation: u64,
}

#[derive(Debug, Default)]
struct CacheInner {
    map: HashMap<String, CacheEntry>,
    /// Write order: lowest generation is the least recently written key.
    order: BTreeMap<u64, String>,
    next_generation: u64,
}

impl CacheInner {
    fn remove(&mut self, key: &str) {
        if let Some(entry) = self.map.remove(key) {
            self.order.remove(&entry.generation);
        }
    }

    fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.order.pop_first()?;
        self.map.remove(&key);
        Some(key)
    }
}

/// Thread-safe TTL + LRU cache for upstream response bodies.
#[derive(Debug)]
pub struct ResponseCache {
    inner: Mutex<CacheInner>,
    max_entries: usize,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(CacheInner::default()),
            max_entries: max_entries.max(1),
            ttl,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(crate::config::DEFAULT_CACHE_MAX_ENTRIES, crate::config::DEFAULT_CACHE_TTL)
    }

    // Every critical section leaves map and order consistent, so a poisoned
    // lock still guards valid state.
    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the cached body if present and younger than the TTL.
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut inner = self.lock();
        let expired = {
            let entry = inner.map.get(key)?;
            if entry.written_at.elapsed() <= self.ttl {
                return Some(entry.body.clone());
            }
            true
        };

        if expired {
            inner.remove(key);
        }
        None
    }

    /// Inserts or replaces an entry, restarting its TTL and making it the most
    /// recently written key.
    pub fn set(&self, key: impl Into<String>, body: Value) {
        let key = key.into();
        let mut inner = self.lock();
        inner.remove(&key);

        let generation = inner.next_generation;
        inner.next_generation += 1;
        inner.order.insert(generation, key.clone());
        inner.map.insert(
            key,
            CacheEntry {
                body,
                written_at: Instant::now(),
                generation,
            },
        );

        while inner.map.len() > self.max_entries {
            if let Some(evicted) = inner.evict_oldest() {
                tracing::debug!(key = %evicted, "evicted least recently written cache entry");
            }
        }
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.map.clear();
        inner.order.clear();
    }

    /// Number of stored entries, including expired ones not yet read.
    pub fn len(&self) -> usize {
        self.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.len(),
            max_size: self.max_entries,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
