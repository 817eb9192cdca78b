//! Cache Metrics System
//!
//! The library is `no_std` and does not log. Instead each cache keeps a set of
//! plain counters that callers can read directly or export through the
//! [`CacheMetrics`] trait as a `BTreeMap<String, f64>`.
//!
//! BTreeMap keeps the exported keys in a stable order, so two runs over the
//! same trace print identical reports and tests can compare maps directly.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

pub mod lfu;

pub use lfu::FrequencyCacheMetrics;

/// Counters shared by every cache in this crate.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CoreCacheMetrics {
    /// Total number of lookups (`get` and `get_mut`)
    pub requests: u64,

    /// Number of lookups that found the key
    pub cache_hits: u64,

    /// Number of new entries stored
    pub insertions: u64,

    /// Number of writes that replaced the value of a present key
    pub replacements: u64,

    /// Number of entries evicted to make room for a new key
    pub evictions: u64,

    /// Number of entries removed explicitly (`remove` or `pop`)
    pub removals: u64,

    /// Number of writes refused because the capacity is zero
    pub rejections: u64,
}

impl CoreCacheMetrics {
    /// Records a lookup that found its key.
    #[inline]
    pub fn record_hit(&mut self) {
        self.requests += 1;
        self.cache_hits += 1;
    }

    /// Records a lookup that did not find its key.
    ///
    /// Misses are not stored separately; they are `requests - cache_hits`.
    #[inline]
    pub fn record_miss(&mut self) {
        self.requests += 1;
    }

    #[inline]
    pub fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    #[inline]
    pub fn record_replacement(&mut self) {
        self.replacements += 1;
    }

    #[inline]
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    #[inline]
    pub fn record_removal(&mut self) {
        self.removals += 1;
    }

    #[inline]
    pub fn record_rejection(&mut self) {
        self.rejections += 1;
    }

    /// Number of lookups that missed.
    #[inline]
    pub fn cache_misses(&self) -> u64 {
        self.requests - self.cache_hits
    }

    /// Calculates the cache hit rate
    ///
    /// # Returns
    /// A value between 0.0 and 1.0, or 0.0 if no requests have been made
    pub fn hit_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_hits as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Calculates the cache miss rate
    ///
    /// # Returns
    /// A value between 0.0 and 1.0, or 0.0 if no requests have been made
    pub fn miss_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_misses() as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Adds every counter of `other` into `self`.
    pub fn merge(&mut self, other: &CoreCacheMetrics) {
        self.requests += other.requests;
        self.cache_hits += other.cache_hits;
        self.insertions += other.insertions;
        self.replacements += other.replacements;
        self.evictions += other.evictions;
        self.removals += other.removals;
        self.rejections += other.rejections;
    }

    /// Convert core metrics to BTreeMap for reporting
    ///
    /// # Returns
    /// A BTreeMap containing all core metrics with consistent key ordering
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        // Counters
        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert("cache_misses".to_string(), self.cache_misses() as f64);
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("rejections".to_string(), self.rejections as f64);
        metrics.insert("removals".to_string(), self.removals as f64);
        metrics.insert("replacements".to_string(), self.replacements as f64);
        metrics.insert("requests".to_string(), self.requests as f64);

        // Rates (0.0 to 1.0)
        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        if self.requests > 0 {
            metrics.insert(
                "eviction_rate".to_string(),
                self.evictions as f64 / self.requests as f64,
            );
        }

        metrics
    }
}

/// Trait that all caches implement for metrics reporting
///
/// Gives the simulator and callers one uniform way to pull counters out of a
/// sequential or a concurrent cache and compare them.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs in deterministic order
    ///
    /// # Returns
    /// A BTreeMap where keys are metric names and values are metric values as f64
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Algorithm name for identification (e.g. "LFU", "ConcurrentLFU")
    fn algorithm_name(&self) -> &'static str;
}
