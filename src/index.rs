//! Frequency index: the entry table plus the ordered frequency buckets.
//!
//! Entries live in a [`SlotArena`]; each slot stores the key, the value and the
//! recorded frequency. The entry table maps a key to its slot id, and the
//! bucket map holds one [`Bucket`] per populated frequency. Buckets are created
//! on demand and dropped as soon as they empty, so the first bucket of the map
//! always holds the eviction victim at its head.

extern crate alloc;

use crate::error::InvariantError;
use crate::list::{Bucket, BucketIter, SlotArena, SlotId};
use alloc::collections::btree_map::{self, BTreeMap};
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::mem;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

#[derive(Debug)]
pub(crate) struct Slot<K, V> {
    key: K,
    value: V,
    frequency: usize,
}

/// Entry table and frequency buckets kept in lockstep.
///
/// Every key in `table` points at an occupied slot whose `frequency` names the
/// bucket holding it; every bucket in `buckets` is non-empty.
pub(crate) struct FrequencyIndex<K, V, S = DefaultHashBuilder> {
    table: HashMap<K, SlotId, S>,
    slots: SlotArena<Slot<K, V>>,
    buckets: BTreeMap<usize, Bucket>,
}

impl<K, V, S> FrequencyIndex<K, V, S> {
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of populated frequencies.
    #[inline]
    pub(crate) fn levels(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub(crate) fn min_frequency(&self) -> Option<usize> {
        self.buckets.keys().next().copied()
    }

    #[inline]
    pub(crate) fn max_frequency(&self) -> Option<usize> {
        self.buckets.keys().next_back().copied()
    }

    #[inline]
    pub(crate) fn value(&self, id: SlotId) -> &V {
        &self.slots[id].value
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, id: SlotId) -> &mut V {
        &mut self.slots[id].value
    }

    /// The entry the next eviction would remove.
    pub(crate) fn peek_lfu(&self) -> Option<(&K, &V)> {
        let (_, bucket) = self.buckets.iter().next()?;
        let slot = &self.slots[bucket.front()?];
        Some((&slot.key, &slot.value))
    }

    /// Entries in eviction order: ascending frequency, oldest arrival first.
    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: &self.slots,
            buckets: self.buckets.values(),
            current: None,
            remaining: self.slots.len(),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.table.clear();
        self.slots.clear();
        self.buckets.clear();
    }

    /// Links `id` at the tail of the bucket for `frequency`, creating it if needed.
    fn attach(&mut self, id: SlotId, frequency: usize) {
        self.buckets
            .entry(frequency)
            .or_default()
            .push_back(&mut self.slots, id);
    }

    /// Unlinks `id` from the bucket for `frequency`, dropping the bucket once empty.
    fn detach(&mut self, id: SlotId, frequency: usize) {
        let bucket = match self.buckets.get_mut(&frequency) {
            Some(bucket) => bucket,
            None => unreachable!("entry recorded at frequency {frequency} has no bucket"),
        };
        bucket.unlink(&mut self.slots, id);
        if bucket.is_empty() {
            self.buckets.remove(&frequency);
        }
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> FrequencyIndex<K, V, S> {
    /// Creates an empty index sized for `capacity` entries.
    pub(crate) fn with_hasher(capacity: usize, hash_builder: S) -> Self {
        FrequencyIndex {
            table: HashMap::with_capacity_and_hasher(capacity, hash_builder),
            slots: SlotArena::with_capacity(capacity),
            buckets: BTreeMap::new(),
        }
    }

    #[inline]
    pub(crate) fn slot_of<Q>(&self, key: &Q) -> Option<SlotId>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.get(key).copied()
    }

    #[inline]
    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.contains_key(key)
    }

    pub(crate) fn frequency<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.slot_of(key).map(|id| self.slots[id].frequency)
    }

    pub(crate) fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.slot_of(key).map(|id| self.value(id))
    }

    /// Adds a new entry at frequency 0. The key must not be present.
    pub(crate) fn insert(&mut self, key: K, value: V) -> SlotId {
        debug_assert!(!self.table.contains_key(&key), "insert of a present key");
        let id = self.slots.insert(Slot {
            key: key.clone(),
            value,
            frequency: 0,
        });
        self.table.insert(key, id);
        self.attach(id, 0);
        id
    }

    /// Raises the frequency of `id` by one and moves it to the tail of the
    /// next bucket. Returns `(old, new)` frequencies.
    pub(crate) fn promote(&mut self, id: SlotId) -> (usize, usize) {
        let old = self.slots[id].frequency;
        // Saturated counts stay in the top bucket but still move to its tail.
        let new = old.saturating_add(1);
        self.detach(id, old);
        self.slots[id].frequency = new;
        self.attach(id, new);
        (old, new)
    }

    /// Swaps in a new value and promotes the entry.
    /// Returns the previous value with the `(old, new)` frequencies.
    pub(crate) fn replace(&mut self, id: SlotId, value: V) -> (V, usize, usize) {
        let previous = mem::replace(&mut self.slots[id].value, value);
        let (old, new) = self.promote(id);
        (previous, old, new)
    }

    /// Removes `key`, returning its entry and recorded frequency.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<(K, V, usize)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.table.remove(key)?;
        Some(self.free(id))
    }

    /// Removes the least frequently used entry, the oldest arrival among ties.
    pub(crate) fn pop_lfu(&mut self) -> Option<(K, V, usize)> {
        let mut first = self.buckets.first_entry()?;
        let head = first.get_mut().pop_front(&mut self.slots);
        let id = match head {
            Some(id) => id,
            None => unreachable!("empty bucket at frequency {}", first.key()),
        };
        if first.get().is_empty() {
            first.remove();
        }
        let slot = match self.slots.remove(id) {
            Some(slot) => slot,
            None => unreachable!("bucket head points at a vacant slot"),
        };
        self.table.remove(&slot.key);
        Some((slot.key, slot.value, slot.frequency))
    }

    fn free(&mut self, id: SlotId) -> (K, V, usize) {
        let frequency = self.slots[id].frequency;
        self.detach(id, frequency);
        match self.slots.remove(id) {
            Some(slot) => (slot.key, slot.value, slot.frequency),
            None => unreachable!("entry table points at a vacant slot"),
        }
    }

    /// Walks every bucket and verifies it against the entry table.
    pub(crate) fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.table.len() != self.slots.len() {
            return Err(InvariantError::new(
                "entry table and slot arena hold different counts",
            ));
        }

        let mut seen = 0usize;
        for (&frequency, bucket) in &self.buckets {
            if bucket.is_empty() {
                return Err(InvariantError::at_frequency(
                    "empty bucket retained",
                    frequency,
                ));
            }

            let mut prev = None;
            let mut walked = 0usize;
            for (id, slot) in bucket.iter(&self.slots) {
                walked += 1;
                if walked > bucket.len() {
                    return Err(InvariantError::at_frequency(
                        "bucket links form a cycle",
                        frequency,
                    ));
                }
                if slot.frequency != frequency {
                    return Err(InvariantError::at_frequency(
                        "entry recorded at a different frequency than its bucket",
                        frequency,
                    ));
                }
                if self.table.get(&slot.key) != Some(&id) {
                    return Err(InvariantError::at_frequency(
                        "entry table does not point at bucket member",
                        frequency,
                    ));
                }
                match self.slots.links(id) {
                    Some((back, _)) if back == prev => {}
                    _ => {
                        return Err(InvariantError::at_frequency(
                            "bucket back-link mismatch",
                            frequency,
                        ))
                    }
                }
                prev = Some(id);
            }

            if walked != bucket.len() {
                return Err(InvariantError::at_frequency(
                    "bucket length does not match its links",
                    frequency,
                ));
            }
            if prev != bucket.back() {
                return Err(InvariantError::at_frequency(
                    "bucket tail does not match its links",
                    frequency,
                ));
            }
            seen += walked;
        }

        if seen != self.table.len() {
            return Err(InvariantError::new(
                "entry table holds keys missing from every bucket",
            ));
        }
        Ok(())
    }
}

/// Iterator over entries in eviction order.
pub struct Iter<'a, K, V> {
    slots: &'a SlotArena<Slot<K, V>>,
    buckets: btree_map::Values<'a, usize, Bucket>,
    current: Option<BucketIter<'a, Slot<K, V>>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((_, slot)) = self.current.as_mut().and_then(Iterator::next) {
                self.remaining = self.remaining.saturating_sub(1);
                return Some((&slot.key, &slot.value));
            }
            let bucket = self.buckets.next()?;
            self.current = Some(bucket.iter(self.slots));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> core::iter::FusedIterator for Iter<'_, K, V> {}
