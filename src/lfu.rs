//! Least Frequently Used Cache Implementation.
//!
//! The cache evicts the entry with the lowest access frequency when it is full.
//! Entries sharing the lowest frequency are evicted in the order they arrived
//! at that frequency, oldest first, which is LRU order within a frequency.
//!
//! ```text
//!   frequency index (ascending)             entry table
//!   ┌────┐                                 ┌─────┬──────────┐
//!   │ 0  │ ─► c ◄─► e                      │ key │ slot     │
//!   ├────┤                                 ├─────┼──────────┤
//!   │ 2  │ ─► b                            │  a  │ f=5      │
//!   ├────┤                                 │  b  │ f=2      │
//!   │ 5  │ ─► a                            │  c  │ f=0      │
//!   └────┘                                 │  e  │ f=0      │
//!                                          └─────┴──────────┘
//!   next victim: head of the first bucket = c
//! ```
//!
//! Frequency counting:
//!
//! - A new key starts at frequency 0.
//! - Every successful `get`/`get_mut` raises the frequency by one and moves the
//!   key to the tail of its new bucket.
//! - Writing a present key replaces its value and promotes it the same way.
//! - A miss changes nothing.

extern crate alloc;

use crate::config::FrequencyCacheConfig;
use crate::error::InvariantError;
use crate::index::{FrequencyIndex, Iter};
use crate::list::SlotId;
use crate::metrics::{CacheMetrics, FrequencyCacheMetrics};
use alloc::collections::BTreeMap;
use alloc::string::String;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;

/// What a [`FrequencyCache::put`] did with the entry it was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutOutcome<K, V> {
    /// The key was new and there was room for it.
    Inserted,
    /// The key was present; carries the value it held before.
    Replaced(V),
    /// The key was new and the cache was full; carries the evicted entry.
    Evicted(K, V),
    /// The cache has capacity 0; the entry is handed back untouched.
    Rejected(K, V),
}

impl<K, V> PutOutcome<K, V> {
    /// Returns `true` unless the write was rejected.
    #[inline]
    pub fn is_stored(&self) -> bool {
        !self.is_rejected()
    }

    #[inline]
    pub fn is_rejected(&self) -> bool {
        matches!(self, PutOutcome::Rejected(..))
    }

    /// The entry evicted to make room, if any.
    pub fn evicted(self) -> Option<(K, V)> {
        match self {
            PutOutcome::Evicted(key, value) => Some((key, value)),
            _ => None,
        }
    }

    /// The value replaced by the write, if any.
    pub fn replaced(self) -> Option<V> {
        match self {
            PutOutcome::Replaced(value) => Some(value),
            _ => None,
        }
    }
}

/// Internal LFU segment containing the actual cache algorithm.
///
/// Shared by [`FrequencyCache`] and the concurrent cache, which keeps one
/// segment per lock.
pub(crate) struct FrequencySegment<K, V, S = DefaultHashBuilder> {
    config: FrequencyCacheConfig,
    index: FrequencyIndex<K, V, S>,
    metrics: FrequencyCacheMetrics,
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> FrequencySegment<K, V, S> {
    pub(crate) fn with_hasher(config: FrequencyCacheConfig, hash_builder: S) -> Self {
        FrequencySegment {
            config,
            index: FrequencyIndex::with_hasher(config.capacity, hash_builder),
            metrics: FrequencyCacheMetrics::default(),
        }
    }

    #[inline]
    pub(crate) fn cap(&self) -> usize {
        self.config.capacity
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[inline]
    pub(crate) fn metrics(&self) -> &FrequencyCacheMetrics {
        &self.metrics
    }

    fn refresh_levels(&mut self) {
        self.metrics.update_frequency_levels(
            self.index.min_frequency(),
            self.index.max_frequency(),
            self.index.levels(),
        );
    }

    #[inline]
    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.index.contains(key)
    }

    #[inline]
    pub(crate) fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.index.peek(key)
    }

    #[inline]
    pub(crate) fn frequency<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.index.frequency(key)
    }

    /// Looks up `key`, promoting it on a hit. Records the hit or miss.
    fn touch<Q>(&mut self, key: &Q) -> Option<SlotId>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let Some(id) = self.index.slot_of(key) else {
            self.metrics.core.record_miss();
            return None;
        };
        let (old, new) = self.index.promote(id);
        self.metrics.record_frequency_hit(old, new);
        self.refresh_levels();
        Some(id)
    }

    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.touch(key)?;
        Some(self.index.value(id))
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.touch(key)?;
        Some(self.index.value_mut(id))
    }

    pub(crate) fn put(&mut self, key: K, value: V) -> PutOutcome<K, V> {
        if let Some(id) = self.index.slot_of(&key) {
            let (previous, old, new) = self.index.replace(id, value);
            self.metrics.record_replacement(old, new);
            self.refresh_levels();
            return PutOutcome::Replaced(previous);
        }

        if self.config.capacity == 0 {
            self.metrics.core.record_rejection();
            return PutOutcome::Rejected(key, value);
        }

        let victim = if self.index.len() >= self.config.capacity {
            self.index.pop_lfu()
        } else {
            None
        };
        let outcome = match victim {
            Some((evicted_key, evicted_value, _)) => {
                self.metrics.core.record_eviction();
                PutOutcome::Evicted(evicted_key, evicted_value)
            }
            None => PutOutcome::Inserted,
        };

        self.index.insert(key, value);
        self.metrics.core.record_insertion();
        self.refresh_levels();
        outcome
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let (_, value, _) = self.index.remove(key)?;
        self.metrics.core.record_removal();
        self.refresh_levels();
        Some(value)
    }

    pub(crate) fn pop(&mut self) -> Option<(K, V)> {
        let (key, value, _) = self.index.pop_lfu()?;
        self.metrics.core.record_removal();
        self.refresh_levels();
        Some((key, value))
    }

    #[inline]
    pub(crate) fn peek_lfu(&self) -> Option<(&K, &V)> {
        self.index.peek_lfu()
    }

    #[inline]
    pub(crate) fn min_frequency(&self) -> Option<usize> {
        self.index.min_frequency()
    }

    #[inline]
    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        self.index.iter()
    }

    pub(crate) fn clear(&mut self) {
        self.index.clear();
        self.refresh_levels();
    }

    pub(crate) fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.index.len() > self.config.capacity {
            return Err(InvariantError::new("entry count exceeds capacity"));
        }
        self.index.check_invariants()
    }
}

impl<K, V, S> fmt::Debug for FrequencySegment<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrequencySegment")
            .field("capacity", &self.config.capacity)
            .field("len", &self.index.len())
            .field("levels", &self.index.levels())
            .finish()
    }
}

/// A bounded cache that evicts the least frequently used entry, breaking ties
/// by evicting the least recently promoted one.
///
/// # Examples
///
/// ```
/// use frequency_cache::{FrequencyCache, PutOutcome};
///
/// let mut cache = FrequencyCache::new(2);
/// cache.put("a", 1);
/// cache.put("b", 2);
///
/// // "a" now has frequency 1, "b" still has 0
/// assert_eq!(cache.get(&"a"), Some(&1));
///
/// // Inserting a third key evicts the lowest-frequency entry
/// assert_eq!(cache.put("c", 3), PutOutcome::Evicted("b", 2));
/// assert_eq!(cache.get(&"b"), None);
/// ```
pub struct FrequencyCache<K, V, S = DefaultHashBuilder> {
    segment: FrequencySegment<K, V, S>,
}

impl<K: Hash + Eq + Clone, V> FrequencyCache<K, V, DefaultHashBuilder> {
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// A capacity of 0 is allowed; such a cache rejects every write.
    ///
    /// # Examples
    ///
    /// ```
    /// use frequency_cache::FrequencyCache;
    ///
    /// let cache: FrequencyCache<&str, u32> = FrequencyCache::new(10);
    /// assert_eq!(cache.cap(), 10);
    /// ```
    pub fn new(capacity: usize) -> Self {
        FrequencyCache::with_hasher(capacity, DefaultHashBuilder::default())
    }

    /// Creates a cache from a configuration with an optional hasher.
    ///
    /// # Examples
    ///
    /// ```
    /// use frequency_cache::config::FrequencyCacheConfig;
    /// use frequency_cache::FrequencyCache;
    ///
    /// let config = FrequencyCacheConfig { capacity: 3 };
    /// let mut cache = FrequencyCache::init(config, None);
    /// cache.put("a", 1);
    /// assert_eq!(cache.len(), 1);
    /// ```
    pub fn init(config: FrequencyCacheConfig, hasher: Option<DefaultHashBuilder>) -> Self {
        FrequencyCache {
            segment: FrequencySegment::with_hasher(config, hasher.unwrap_or_default()),
        }
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> FrequencyCache<K, V, S> {
    /// Creates an empty cache with a custom hash builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use frequency_cache::FrequencyCache;
    /// use std::collections::hash_map::RandomState;
    ///
    /// let cache: FrequencyCache<&str, u32, _> =
    ///     FrequencyCache::with_hasher(10, RandomState::new());
    /// assert!(cache.is_empty());
    /// ```
    pub fn with_hasher(capacity: usize, hash_builder: S) -> Self {
        FrequencyCache {
            segment: FrequencySegment::with_hasher(FrequencyCacheConfig { capacity }, hash_builder),
        }
    }

    /// Returns the maximum number of entries the cache can hold.
    #[inline]
    pub fn cap(&self) -> usize {
        self.segment.cap()
    }

    /// Returns the number of live entries.
    #[doc(alias = "length")]
    #[inline]
    pub fn len(&self) -> usize {
        self.segment.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segment.is_empty()
    }

    /// Returns `true` if the key is cached. Does not count as an access.
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.contains(key)
    }

    /// Returns the value for `key` without touching its frequency.
    #[inline]
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.peek(key)
    }

    /// Returns the recorded frequency of `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use frequency_cache::FrequencyCache;
    ///
    /// let mut cache = FrequencyCache::new(2);
    /// cache.put("a", 1);
    /// assert_eq!(cache.frequency(&"a"), Some(0));
    /// cache.get(&"a");
    /// cache.put("a", 2);
    /// assert_eq!(cache.frequency(&"a"), Some(2));
    /// ```
    #[inline]
    pub fn frequency<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.frequency(key)
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the cache's key type, but
    /// [`Hash`] and [`Eq`] on the borrowed form *must* match those for
    /// the key type.
    ///
    /// A hit raises the key's frequency by one and makes it the newest entry
    /// at that frequency. A miss leaves the cache unchanged.
    #[doc(alias = "read")]
    #[inline]
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// Counts as an access exactly like [`get`](Self::get).
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get_mut(key)
    }

    /// Inserts a key-value pair into the cache.
    ///
    /// - A present key gets the new value and is promoted one frequency level;
    ///   the old value is returned in [`PutOutcome::Replaced`].
    /// - A new key starts at frequency 0. If the cache is full, the entry with
    ///   the lowest frequency (oldest among ties) is evicted first and returned
    ///   in [`PutOutcome::Evicted`].
    /// - A cache with capacity 0 stores nothing and hands the entry back in
    ///   [`PutOutcome::Rejected`].
    #[doc(alias = "write")]
    #[inline]
    pub fn put(&mut self, key: K, value: V) -> PutOutcome<K, V> {
        self.segment.put(key, value)
    }

    /// Removes a key from the cache, returning its value if it was present.
    ///
    /// Explicit removals are not counted as evictions.
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.remove(key)
    }

    /// Removes and returns the entry the next eviction would pick.
    ///
    /// # Examples
    ///
    /// ```
    /// use frequency_cache::FrequencyCache;
    ///
    /// let mut cache = FrequencyCache::new(2);
    /// cache.put("a", 1);
    /// cache.put("b", 2);
    /// cache.get(&"a");
    ///
    /// assert_eq!(cache.pop(), Some(("b", 2)));
    /// assert_eq!(cache.pop(), Some(("a", 1)));
    /// assert_eq!(cache.pop(), None);
    /// ```
    #[inline]
    pub fn pop(&mut self) -> Option<(K, V)> {
        self.segment.pop()
    }

    /// Returns the entry the next eviction would pick, without removing it.
    #[inline]
    pub fn peek_lfu(&self) -> Option<(&K, &V)> {
        self.segment.peek_lfu()
    }

    /// Lowest frequency currently held by any entry.
    #[inline]
    pub fn min_frequency(&self) -> Option<usize> {
        self.segment.min_frequency()
    }

    /// Iterates over entries in eviction order: ascending frequency, and
    /// oldest arrival first within a frequency. Does not count as access.
    ///
    /// # Examples
    ///
    /// ```
    /// use frequency_cache::FrequencyCache;
    ///
    /// let mut cache = FrequencyCache::new(3);
    /// cache.put("a", 1);
    /// cache.put("b", 2);
    /// cache.put("c", 3);
    /// cache.get(&"a");
    ///
    /// let keys: Vec<_> = cache.iter().map(|(k, _)| *k).collect();
    /// assert_eq!(keys, ["b", "c", "a"]);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.segment.iter()
    }

    /// Removes every entry. The capacity is unchanged.
    #[doc(alias = "flush")]
    #[inline]
    pub fn clear(&mut self) {
        self.segment.clear()
    }

    /// Returns the counters collected since the cache was created.
    #[inline]
    pub fn metrics(&self) -> &FrequencyCacheMetrics {
        self.segment.metrics()
    }

    /// Walks the whole frequency index and checks it against the entry table.
    ///
    /// Intended for tests and debugging; it is linear in the number of entries.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.segment.check_invariants()
    }
}

impl<'a, K: Hash + Eq + Clone, V, S: BuildHasher> IntoIterator for &'a FrequencyCache<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> fmt::Debug for FrequencyCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrequencyCache")
            .field("segment", &self.segment)
            .finish()
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> CacheMetrics for FrequencyCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        self.segment.metrics().algorithm_name()
    }
}
