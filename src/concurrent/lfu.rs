//! Concurrent LFU cache with lock-striped segments.

extern crate alloc;

use crate::config::{ConcurrentFrequencyCacheConfig, FrequencyCacheConfig};
use crate::error::InvariantError;
use crate::lfu::{FrequencySegment, PutOutcome};
use crate::metrics::{CacheMetrics, FrequencyCacheMetrics};
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use parking_lot::Mutex;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;

/// A thread-safe LFU cache with segmented storage.
///
/// The configured capacity is the total across all segments: it is split as
/// evenly as possible, with the remainder going to the first segments. The
/// segment count is clamped so that every segment can hold at least one entry.
///
/// # Type Parameters
///
/// - `K`: Key type. Must implement `Hash + Eq + Clone`.
/// - `V`: Value type. `get` returns clones, so it must implement `Clone`.
/// - `S`: Hash builder type, used both for sharding and inside each segment.
///
/// # Example
///
/// ```
/// use frequency_cache::concurrent::ConcurrentFrequencyCache;
/// use frequency_cache::config::{ConcurrentCacheConfig, FrequencyCacheConfig};
///
/// let config = ConcurrentCacheConfig {
///     base: FrequencyCacheConfig { capacity: 1 },
///     segments: 1,
/// };
/// let cache = ConcurrentFrequencyCache::init(config, None);
///
/// cache.put("key".to_string(), 42);
/// assert_eq!(cache.get("key"), Some(42));
/// assert_eq!(cache.frequency("key"), Some(1));
/// ```
pub struct ConcurrentFrequencyCache<K, V, S = DefaultHashBuilder> {
    segments: Box<[Mutex<FrequencySegment<K, V, S>>]>,
    hash_builder: S,
}

impl<K, V> ConcurrentFrequencyCache<K, V, DefaultHashBuilder>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Creates a cache with `capacity` total entries and the default segment count.
    pub fn new(capacity: usize) -> Self {
        Self::with_segments(capacity, super::default_segment_count())
    }

    /// Creates a cache with `capacity` total entries spread over `segments` segments.
    pub fn with_segments(capacity: usize, segments: usize) -> Self {
        Self::init(
            ConcurrentFrequencyCacheConfig {
                base: FrequencyCacheConfig { capacity },
                segments,
            },
            None,
        )
    }

    /// Creates a cache from a configuration with an optional hasher.
    ///
    /// # Arguments
    ///
    /// * `config` - Total capacity and number of segments
    /// * `hasher` - Optional hash builder. If `None`, uses `DefaultHashBuilder`
    pub fn init(config: ConcurrentFrequencyCacheConfig, hasher: Option<DefaultHashBuilder>) -> Self {
        Self::init_with_hasher(config, hasher.unwrap_or_default())
    }
}

impl<K, V, S> ConcurrentFrequencyCache<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher + Clone,
{
    /// Creates a cache with a custom hash builder, cloned into every segment.
    pub fn init_with_hasher(config: ConcurrentFrequencyCacheConfig, hash_builder: S) -> Self {
        let capacity = config.base.capacity;
        let segment_count = config.segments.clamp(1, capacity.max(1));

        let per_segment = capacity / segment_count;
        let remainder = capacity % segment_count;

        let segments: Vec<_> = (0..segment_count)
            .map(|i| {
                let capacity = per_segment + usize::from(i < remainder);
                Mutex::new(FrequencySegment::with_hasher(
                    FrequencyCacheConfig { capacity },
                    hash_builder.clone(),
                ))
            })
            .collect();

        Self {
            segments: segments.into_boxed_slice(),
            hash_builder,
        }
    }

    #[inline]
    fn segment_for<Q>(&self, key: &Q) -> &Mutex<FrequencySegment<K, V, S>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash,
    {
        let idx = (self.hash_builder.hash_one(key) as usize) % self.segments.len();
        &self.segments[idx]
    }

    /// Returns the total capacity across all segments.
    pub fn capacity(&self) -> usize {
        self.segments.iter().map(|s| s.lock().cap()).sum()
    }

    /// Returns the number of segments in the cache.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Returns the total number of entries across all segments.
    ///
    /// Segments are locked one after another, so under concurrent writes the
    /// result may already be stale when it returns.
    pub fn len(&self) -> usize {
        self.segments.iter().map(|s| s.lock().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|s| s.lock().is_empty())
    }

    /// Retrieves a clone of the value and raises the key's frequency.
    ///
    /// For reads that don't need ownership, use [`get_with()`](Self::get_with).
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment_for(key).lock().get(key).cloned()
    }

    /// Applies `f` to the value while holding the segment lock.
    ///
    /// Counts as an access exactly like [`get()`](Self::get).
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        self.segment_for(key).lock().get(key).map(f)
    }

    /// Applies `f` to a mutable reference of the value while holding the lock.
    pub fn get_mut_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&mut V) -> R,
    {
        self.segment_for(key).lock().get_mut(key).map(f)
    }

    /// Returns a clone of the value without touching its frequency.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment_for(key).lock().peek(key).cloned()
    }

    /// Returns the recorded frequency of `key`.
    pub fn frequency<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment_for(key).lock().frequency(key)
    }

    /// Inserts a key-value pair into the segment the key hashes to.
    ///
    /// Same outcomes as [`FrequencyCache::put`](crate::FrequencyCache::put),
    /// with eviction limited to that segment.
    pub fn put(&self, key: K, value: V) -> PutOutcome<K, V> {
        self.segment_for(&key).lock().put(key, value)
    }

    /// Removes a key from the cache, returning its value if it was present.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment_for(key).lock().remove(key)
    }

    /// Returns `true` if the key is cached. Does not count as an access.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment_for(key).lock().contains(key)
    }

    /// Removes all entries from all segments, one segment at a time.
    pub fn clear(&self) {
        for segment in self.segments.iter() {
            segment.lock().clear();
        }
    }

    /// Sums the counters of every segment.
    pub fn frequency_metrics(&self) -> FrequencyCacheMetrics {
        let mut total = FrequencyCacheMetrics::default();
        for segment in self.segments.iter() {
            total.merge(segment.lock().metrics());
        }
        total
    }

    /// Checks every segment's frequency index against its entry table.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.segments
            .iter()
            .try_for_each(|segment| segment.lock().check_invariants())
    }
}

impl<K, V, S> CacheMetrics for ConcurrentFrequencyCache<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher + Clone,
{
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.frequency_metrics().to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "ConcurrentLFU"
    }
}

impl<K, V, S> core::fmt::Debug for ConcurrentFrequencyCache<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher + Clone,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConcurrentFrequencyCache")
            .field("segment_count", &self.segments.len())
            .field("total_len", &self.len())
            .finish()
    }
}
