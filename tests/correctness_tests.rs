//! Correctness Tests for the Frequency Cache
//!
//! Validates the eviction policy with small caches and deterministic access
//! patterns. Each test checks exactly which key a put evicts.
//!
//! ## Test Strategy
//! - Small cache sizes (0-5 entries) for predictable behavior
//! - Explicit checks of the `PutOutcome` of every eviction
//! - Frequency bookkeeping verified through `frequency()` and `iter()`
//! - `check_invariants()` after every scenario

use frequency_cache::config::FrequencyCacheConfig;
use frequency_cache::{FrequencyCache, PutOutcome};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Helper to create a FrequencyCache with the given capacity
fn make_lfu<K: std::hash::Hash + Eq + Clone, V>(cap: usize) -> FrequencyCache<K, V> {
    let config = FrequencyCacheConfig { capacity: cap };
    FrequencyCache::init(config, None)
}

/// Keys in eviction order
fn order<V>(cache: &FrequencyCache<&'static str, V>) -> Vec<&'static str> {
    cache.iter().map(|(k, _)| *k).collect()
}

// ============================================================================
// BASIC SCENARIOS
// ============================================================================

#[test]
fn test_new_key_evicts_oldest_when_nothing_was_read() {
    let mut cache = make_lfu(2);
    cache.put("a", 1);
    cache.put("b", 2);

    assert_eq!(cache.put("c", 3), PutOutcome::Evicted("a", 1));
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get(&"a"), None);
    assert_eq!(cache.get(&"b"), Some(&2));
    assert_eq!(cache.get(&"c"), Some(&3));
    cache.check_invariants().unwrap();
}

#[test]
fn test_read_protects_key_from_eviction() {
    let mut cache = make_lfu(2);
    cache.put("a", 1);
    cache.put("b", 2);
    cache.get(&"a");

    assert_eq!(cache.put("c", 3), PutOutcome::Evicted("b", 2));
    assert_eq!(cache.get(&"b"), None);
    assert_eq!(cache.get(&"a"), Some(&1));
    assert_eq!(cache.get(&"c"), Some(&3));
    cache.check_invariants().unwrap();
}

#[test]
fn test_overwrite_in_single_slot_cache() {
    let mut cache = make_lfu(1);
    cache.put("x", 1);

    assert_eq!(cache.put("x", 2), PutOutcome::Replaced(1));
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get(&"x"), Some(&2));
    cache.check_invariants().unwrap();
}

#[test]
fn test_zero_capacity_stores_nothing() {
    let mut cache = make_lfu(0);

    assert_eq!(cache.put("a", 1), PutOutcome::Rejected("a", 1));
    assert_eq!(cache.len(), 0);
    assert_eq!(cache.get(&"a"), None);
    assert_eq!(cache.peek_lfu(), None);
    cache.check_invariants().unwrap();
}

#[test]
fn test_single_slot_cache_always_evicts_previous() {
    let mut cache = make_lfu(1);
    cache.put("a", 1);
    for _ in 0..5 {
        cache.get(&"a");
    }

    // Even a hot entry is the only candidate
    assert_eq!(cache.put("b", 2), PutOutcome::Evicted("a", 1));
    assert_eq!(cache.frequency(&"b"), Some(0));
}

// ============================================================================
// FREQUENCY AND TIE-BREAK ORDER
// ============================================================================

#[test]
fn test_lowest_frequency_evicted_first() {
    let mut cache = make_lfu(3);
    cache.put("a", 1);
    cache.put("b", 2);
    cache.put("c", 3);

    for _ in 0..3 {
        cache.get(&"a");
    }
    cache.get(&"b");
    cache.get(&"c");
    cache.get(&"c");

    // a=3, b=1, c=2
    assert_eq!(order(&cache), ["b", "c", "a"]);
    assert_eq!(cache.put("d", 4), PutOutcome::Evicted("b", 2));
    assert_eq!(cache.put("e", 5), PutOutcome::Evicted("d", 4));
    cache.check_invariants().unwrap();
}

#[test]
fn test_tie_broken_by_arrival_at_frequency() {
    let mut cache = make_lfu(3);
    cache.put("a", 1);
    cache.put("b", 2);
    cache.put("c", 3);

    // Reach frequency 1 in the order c, a, b
    cache.get(&"c");
    cache.get(&"a");
    cache.get(&"b");

    assert_eq!(cache.put("d", 4), PutOutcome::Evicted("c", 3));
    assert_eq!(order(&cache), ["d", "a", "b"]);
}

#[test]
fn test_tie_order_follows_promotion_not_insertion() {
    let mut cache = make_lfu(4);
    for (k, v) in [("a", 1), ("b", 2), ("c", 3), ("d", 4)] {
        cache.put(k, v);
    }
    cache.get(&"d");
    cache.get(&"b");
    cache.get(&"a");

    assert_eq!(order(&cache), ["c", "d", "b", "a"]);
    assert_eq!(cache.pop(), Some(("c", 3)));
    assert_eq!(cache.pop(), Some(("d", 4)));
    assert_eq!(cache.pop(), Some(("b", 2)));
    assert_eq!(cache.pop(), Some(("a", 1)));
    assert_eq!(cache.pop(), None);
}

#[test]
fn test_new_entry_is_immediate_victim_among_fresh_keys() {
    let mut cache = make_lfu(3);
    cache.put("a", 1);
    cache.put("b", 2);
    cache.get(&"a");
    cache.get(&"b");

    assert_eq!(cache.put("c", 3), PutOutcome::Inserted);
    assert_eq!(cache.put("d", 4), PutOutcome::Evicted("c", 3));
    assert_eq!(cache.put("e", 5), PutOutcome::Evicted("d", 4));
    assert!(cache.contains(&"a"));
    assert!(cache.contains(&"b"));
}

#[test]
fn test_overwrite_moves_to_next_frequency() {
    let mut cache = make_lfu(3);
    cache.put("a", 1);
    cache.put("b", 2);
    cache.put("c", 3);

    // Overwrite promotes "a" from 0 to 1
    assert_eq!(cache.put("a", 10), PutOutcome::Replaced(1));
    assert_eq!(cache.frequency(&"a"), Some(1));
    assert_eq!(order(&cache), ["b", "c", "a"]);

    // A later read continues from the promoted frequency
    cache.get(&"a");
    assert_eq!(cache.frequency(&"a"), Some(2));

    assert_eq!(cache.put("d", 4), PutOutcome::Evicted("b", 2));
    assert_eq!(cache.peek(&"a"), Some(&10));
    cache.check_invariants().unwrap();
}

#[test]
fn test_overwrite_at_capacity_never_evicts() {
    let mut cache = make_lfu(2);
    cache.put("a", 1);
    cache.put("b", 2);

    for v in 0..10 {
        assert!(cache.put("b", v + 100).is_stored());
    }
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.peek(&"a"), Some(&1));
    assert_eq!(cache.frequency(&"b"), Some(10));
    assert_eq!(cache.metrics().core.evictions, 0);
}

// ============================================================================
// SUPPLEMENTARY OPERATIONS
// ============================================================================

#[test]
fn test_remove_then_reinsert_starts_over() {
    let mut cache = make_lfu(3);
    cache.put("a", 1);
    cache.get(&"a");
    cache.get(&"a");

    assert_eq!(cache.remove(&"a"), Some(1));
    assert_eq!(cache.frequency(&"a"), None);

    cache.put("a", 2);
    assert_eq!(cache.frequency(&"a"), Some(0));
    cache.check_invariants().unwrap();
}

#[test]
fn test_peek_lfu_matches_next_eviction() {
    let mut cache = make_lfu(3);
    cache.put("a", 1);
    cache.put("b", 2);
    cache.put("c", 3);
    cache.get(&"a");

    let (k, v) = cache.peek_lfu().map(|(k, v)| (*k, *v)).unwrap();
    assert_eq!(cache.put("d", 4), PutOutcome::Evicted(k, v));
    assert_eq!(cache.min_frequency(), Some(0));
}

#[test]
fn test_clear_is_idempotent() {
    let mut cache = make_lfu(3);
    cache.put("a", 1);
    cache.put("b", 2);
    cache.get(&"a");

    cache.clear();
    assert_eq!(cache.len(), 0);
    assert_eq!(cache.get(&"a"), None);
    assert_eq!(cache.get(&"b"), None);

    cache.clear();
    assert_eq!(cache.len(), 0);
    assert_eq!(cache.cap(), 3);
    cache.check_invariants().unwrap();
}

#[test]
fn test_into_iterator_for_reference() {
    let mut cache = make_lfu(3);
    cache.put("a", 1);
    cache.put("b", 2);
    cache.get(&"a");

    let mut seen = Vec::new();
    for (k, v) in &cache {
        seen.push((*k, *v));
    }
    assert_eq!(seen, [("b", 2), ("a", 1)]);
}

#[test]
fn test_values_without_clone() {
    struct Handle(u32);

    let mut cache: FrequencyCache<u32, Handle> = make_lfu(1);
    cache.put(1, Handle(10));
    let evicted = cache.put(2, Handle(20)).evicted();
    assert_eq!(evicted.map(|(k, h)| (k, h.0)), Some((1, 10)));
    assert_eq!(cache.get(&2).map(|h| h.0), Some(20));
}

// ============================================================================
// PROPERTIES
// ============================================================================

#[test]
fn test_capacity_bound_holds() {
    let mut cache = make_lfu(5);
    for i in 0..100u32 {
        cache.put(i % 17, i);
        if i % 3 == 0 {
            cache.get(&(i % 7));
        }
        assert!(cache.len() <= cache.cap());
    }
    cache.check_invariants().unwrap();
}

#[test]
fn test_miss_is_transparent() {
    let mut cache = make_lfu(3);
    cache.put("a", 1);
    cache.put("b", 2);
    cache.get(&"b");

    let before: Vec<_> = cache.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(cache.get(&"missing"), None);
    let after: Vec<_> = cache.iter().map(|(k, v)| (*k, *v)).collect();

    assert_eq!(before, after);
    assert_eq!(cache.frequency(&"a"), Some(0));
    assert_eq!(cache.frequency(&"b"), Some(1));
}

#[test]
fn test_read_increments_by_exactly_one() {
    let mut cache = make_lfu(2);
    cache.put("a", 1);
    cache.put("b", 2);

    for expected in 1..=20 {
        cache.get(&"a");
        assert_eq!(cache.frequency(&"a"), Some(expected));
        assert_eq!(cache.frequency(&"b"), Some(0));
    }
}
