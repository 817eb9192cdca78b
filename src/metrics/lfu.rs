//! Frequency Cache Metrics
//!
//! Metrics specific to the LFU eviction policy: how often entries climb
//! frequency levels and how the population is spread across those levels.

extern crate alloc;

use super::{CacheMetrics, CoreCacheMetrics};
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// LFU-specific metrics (extends CoreCacheMetrics)
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FrequencyCacheMetrics {
    /// Core metrics common to all caches
    pub core: CoreCacheMetrics,

    /// Total number of frequency increments (every hit and every replacement)
    pub total_frequency_increments: u64,

    /// Lowest frequency currently populated, 0 when empty
    pub min_frequency: u64,

    /// Highest frequency currently populated, 0 when empty
    pub max_frequency: u64,

    /// Number of distinct frequency levels currently populated
    pub active_frequency_levels: u64,
}

impl FrequencyCacheMetrics {
    /// Records a hit that moved an entry from `old_frequency` to `new_frequency`.
    pub fn record_frequency_hit(&mut self, old_frequency: usize, new_frequency: usize) {
        self.core.record_hit();
        self.record_frequency_increment(old_frequency, new_frequency);
    }

    /// Records a value replacement, which also promotes the entry.
    pub fn record_replacement(&mut self, old_frequency: usize, new_frequency: usize) {
        self.core.record_replacement();
        self.record_frequency_increment(old_frequency, new_frequency);
    }

    fn record_frequency_increment(&mut self, old_frequency: usize, new_frequency: usize) {
        if new_frequency > old_frequency {
            self.total_frequency_increments += 1;
        }
    }

    /// Refreshes the gauges from the current shape of the frequency index.
    ///
    /// # Arguments
    /// * `min` - Lowest populated frequency, `None` when the cache is empty
    /// * `max` - Highest populated frequency, `None` when the cache is empty
    /// * `levels` - Number of populated frequencies
    pub fn update_frequency_levels(&mut self, min: Option<usize>, max: Option<usize>, levels: usize) {
        self.min_frequency = min.unwrap_or(0) as u64;
        self.max_frequency = max.unwrap_or(0) as u64;
        self.active_frequency_levels = levels as u64;
    }

    /// Calculates the average number of increments per hit
    ///
    /// # Returns
    /// Average frequency increments per hit, or 0.0 if no hits have occurred
    pub fn average_frequency(&self) -> f64 {
        if self.core.cache_hits > 0 {
            self.total_frequency_increments as f64 / self.core.cache_hits as f64
        } else {
            0.0
        }
    }

    /// Calculates the frequency range (max - min)
    pub fn frequency_range(&self) -> u64 {
        self.max_frequency.saturating_sub(self.min_frequency)
    }

    /// Folds the metrics of another segment into these.
    ///
    /// Counters are summed. Frequency bounds are combined only from segments
    /// that currently hold entries; levels are summed, so the same frequency
    /// populated in two segments counts twice.
    pub fn merge(&mut self, other: &FrequencyCacheMetrics) {
        let self_populated = self.active_frequency_levels > 0;
        let other_populated = other.active_frequency_levels > 0;

        self.core.merge(&other.core);
        self.total_frequency_increments += other.total_frequency_increments;

        match (self_populated, other_populated) {
            (_, false) => {}
            (false, true) => {
                self.min_frequency = other.min_frequency;
                self.max_frequency = other.max_frequency;
            }
            (true, true) => {
                self.min_frequency = self.min_frequency.min(other.min_frequency);
                self.max_frequency = self.max_frequency.max(other.max_frequency);
            }
        }
        self.active_frequency_levels += other.active_frequency_levels;
    }

    /// Converts the metrics to a BTreeMap for reporting
    ///
    /// # Returns
    /// Core metrics plus the frequency gauges and counters
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap();

        metrics.insert("min_frequency".to_string(), self.min_frequency as f64);
        metrics.insert("max_frequency".to_string(), self.max_frequency as f64);
        metrics.insert("frequency_range".to_string(), self.frequency_range() as f64);
        metrics.insert(
            "total_frequency_increments".to_string(),
            self.total_frequency_increments as f64,
        );
        metrics.insert(
            "active_frequency_levels".to_string(),
            self.active_frequency_levels as f64,
        );
        metrics.insert("average_frequency".to_string(), self.average_frequency());

        if self.core.requests > 0 {
            metrics.insert(
                "frequency_increment_rate".to_string(),
                self.total_frequency_increments as f64 / self.core.requests as f64,
            );
        }

        metrics
    }
}

impl CacheMetrics for FrequencyCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "LFU"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hits_and_replacements_count_increments() {
        let mut metrics = FrequencyCacheMetrics::default();
        metrics.record_frequency_hit(0, 1);
        metrics.record_frequency_hit(1, 2);
        metrics.record_replacement(2, 3);

        assert_eq!(metrics.core.cache_hits, 2);
        assert_eq!(metrics.core.replacements, 1);
        assert_eq!(metrics.total_frequency_increments, 3);
        assert_eq!(metrics.average_frequency(), 1.5);
    }

    #[test]
    fn test_saturated_hit_is_not_an_increment() {
        let mut metrics = FrequencyCacheMetrics::default();
        metrics.record_frequency_hit(usize::MAX, usize::MAX);
        assert_eq!(metrics.core.cache_hits, 1);
        assert_eq!(metrics.total_frequency_increments, 0);
    }

    #[test]
    fn test_levels_reset_when_empty() {
        let mut metrics = FrequencyCacheMetrics::default();
        metrics.update_frequency_levels(Some(2), Some(7), 3);
        assert_eq!(metrics.frequency_range(), 5);

        metrics.update_frequency_levels(None, None, 0);
        assert_eq!(metrics.min_frequency, 0);
        assert_eq!(metrics.max_frequency, 0);
        assert_eq!(metrics.active_frequency_levels, 0);
    }

    #[test]
    fn test_merge_ignores_bounds_of_empty_segments() {
        let mut total = FrequencyCacheMetrics::default();

        let mut empty = FrequencyCacheMetrics::default();
        empty.core.record_miss();

        let mut busy = FrequencyCacheMetrics::default();
        busy.record_frequency_hit(3, 4);
        busy.update_frequency_levels(Some(4), Some(9), 2);

        let mut other = FrequencyCacheMetrics::default();
        other.update_frequency_levels(Some(1), Some(5), 2);

        total.merge(&empty);
        total.merge(&busy);
        total.merge(&other);

        assert_eq!(total.core.requests, 2);
        assert_eq!(total.min_frequency, 1);
        assert_eq!(total.max_frequency, 9);
        assert_eq!(total.active_frequency_levels, 4);
        assert_eq!(total.total_frequency_increments, 1);
    }

    #[test]
    fn test_btreemap_keys() {
        let metrics = FrequencyCacheMetrics::default();
        let map = metrics.metrics();
        for key in [
            "active_frequency_levels",
            "average_frequency",
            "cache_hits",
            "max_frequency",
            "min_frequency",
            "total_frequency_increments",
        ] {
            assert!(map.contains_key(key), "missing {key}");
        }
        assert_eq!(metrics.algorithm_name(), "LFU");
    }
}
