//! In-memory TTL result cache owned by each service.

use super::key::CacheKey;
use crate::config::CacheConfig;
use mini_moka::sync::Cache;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Hit/miss counters for one service cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub name: String,
    pub hits: u64,
    pub misses: u64,
    /// Approximate number of live entries.
    pub entries: u64,
}

/// Bounded, TTL-expiring map from [`CacheKey`] to a computed result.
///
/// Expired entries are treated as misses on lookup; there is no background
/// sweep.
pub struct ResultCache<V> {
    name: &'static str,
    /// `None` when caching is disabled.
    inner: Option<Cache<CacheKey, V>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V> ResultCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(name: &'static str, config: &CacheConfig) -> Self {
        let inner = config.enabled.then(|| {
            Cache::builder()
                .time_to_live(config.ttl)
                .max_capacity(config.max_entries)
                .build()
        });
        Self {
            name,
            inner,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<V> {
        let cache = self.inner.as_ref()?;
        match cache.get(key) {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("{} cache hit {}", self.name, key.to_hex());
                Some(value)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!("{} cache miss {}", self.name, key.to_hex());
                None
            }
        }
    }

    pub fn insert(&self, key: CacheKey, value: V) {
        if let Some(cache) = &self.inner {
            cache.insert(key, value);
        }
    }

    /// Return the cached value for `key`, or compute and store it.
    ///
    /// A `None` key (unhashable parameters) always computes and never stores.
    pub fn get_or_compute<F>(&self, key: Option<CacheKey>, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        let Some(key) = key else {
            return compute();
        };
        if let Some(value) = self.get(&key) {
            return value;
        }
        let value = compute();
        self.insert(key, value.clone());
        value
    }

    /// Drop every cached entry.
    pub fn clear(&self) {
        if let Some(cache) = &self.inner {
            cache.invalidate_all();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            name: self.name.to_string(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.inner.as_ref().map_or(0, |c| c.entry_count()),
        }
    }
}
