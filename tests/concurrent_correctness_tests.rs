//! Concurrent Cache Correctness Tests
//!
//! These tests validate that the concurrent cache keeps exact LFU semantics
//! inside each segment while being accessed from multiple threads.
//!
//! ## Test Strategy
//!
//! Unlike the stress tests, these tests:
//! - Use small caches so eviction decisions are predictable
//! - Use a single segment where global LFU order must be checked
//! - Verify that counters and invariants agree after concurrent runs
//!
//! ## Segments
//!
//! 1. **Algorithm Correctness**: eviction order with one segment, bounds with many
//! 2. **Thread Safety Invariants**: state consistency after concurrent access

#![cfg(feature = "concurrent")]

use frequency_cache::config::{ConcurrentCacheConfig, FrequencyCacheConfig};
use frequency_cache::metrics::CacheMetrics;
use frequency_cache::{ConcurrentFrequencyCache, FrequencyCache, PutOutcome};
use scoped_threadpool::Pool;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

fn make_cache<K, V>(capacity: usize, segments: usize) -> ConcurrentFrequencyCache<K, V>
where
    K: std::hash::Hash + Eq + Clone,
    V: Clone,
{
    ConcurrentFrequencyCache::init(
        ConcurrentCacheConfig {
            base: FrequencyCacheConfig { capacity },
            segments,
        },
        None,
    )
}

// ============================================================================
// SEGMENT 1: ALGORITHM CORRECTNESS UNDER CONCURRENCY
// ============================================================================

#[test]
fn test_single_segment_evicts_global_minimum() {
    let cache: Arc<ConcurrentFrequencyCache<u32, u32>> = Arc::new(make_cache(4, 1));
    for i in 0..4 {
        cache.put(i, i * 10);
    }

    // Every thread reads keys 1..4 once; key 0 is never read
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for key in 1..4 {
                    assert!(cache.get(&key).is_some());
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    for key in 1..4 {
        assert_eq!(cache.frequency(&key), Some(4));
    }
    assert_eq!(cache.put(100, 1000), PutOutcome::Evicted(0, 0));
    cache.check_invariants().unwrap();
}

#[test]
fn test_reads_are_counted_exactly_once_each() {
    let cache: ConcurrentFrequencyCache<u32, u32> = make_cache(8, 1);
    cache.put(7, 7);

    let mut pool = Pool::new(4);
    pool.scoped(|scope| {
        for _ in 0..8 {
            scope.execute(|| {
                for _ in 0..250 {
                    assert_eq!(cache.get(&7), Some(7));
                }
            });
        }
    });

    assert_eq!(cache.frequency(&7), Some(2000));
    assert_eq!(cache.frequency_metrics().core.cache_hits, 2000);
}

#[test]
fn test_multi_segment_capacity_bound() {
    let cache: Arc<ConcurrentFrequencyCache<usize, usize>> = Arc::new(make_cache(12, 4));
    assert_eq!(cache.capacity(), 12);

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..500 {
                    cache.put(t * 1000 + i, i);
                    assert!(cache.len() <= 12);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_eq!(cache.len(), 12);
    cache.check_invariants().unwrap();
}

#[test]
fn test_hot_keys_survive_scan() {
    // One segment: the result must match the sequential cache exactly
    let cache: ConcurrentFrequencyCache<u32, u32> = make_cache(10, 1);
    let mut reference: FrequencyCache<u32, u32> = FrequencyCache::new(10);

    for key in 0..5 {
        cache.put(key, key);
        reference.put(key, key);
        for _ in 0..3 {
            cache.get(&key);
            reference.get(&key);
        }
    }

    let mut pool = Pool::new(2);
    pool.scoped(|scope| {
        scope.execute(|| {
            for key in 1000..1100 {
                cache.put(key, key);
            }
        });
    });
    for key in 1000..1100 {
        reference.put(key, key);
    }

    for key in 0..5 {
        assert_eq!(cache.peek(&key), Some(key));
        assert_eq!(cache.frequency(&key), reference.frequency(&key));
    }
    assert_eq!(cache.len(), reference.len());
}

#[test]
fn test_zero_capacity_concurrent() {
    let cache: Arc<ConcurrentFrequencyCache<usize, usize>> = Arc::new(make_cache(0, 8));
    assert_eq!(cache.segment_count(), 1);

    let rejected = Arc::new(AtomicUsize::new(0));
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let cache = Arc::clone(&cache);
            let rejected = Arc::clone(&rejected);
            thread::spawn(move || {
                for i in 0..100 {
                    if cache.put(t * 100 + i, i).is_rejected() {
                        rejected.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_eq!(rejected.load(Ordering::Relaxed), 400);
    assert!(cache.is_empty());
    assert_eq!(cache.frequency_metrics().core.rejections, 400);
}

// ============================================================================
// SEGMENT 2: THREAD SAFETY INVARIANTS
// ============================================================================

#[test]
fn test_outcome_counts_match_metrics() {
    let cache: Arc<ConcurrentFrequencyCache<usize, usize>> = Arc::new(make_cache(64, 8));
    let inserted = Arc::new(AtomicUsize::new(0));
    let replaced = Arc::new(AtomicUsize::new(0));
    let evicted = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let cache = Arc::clone(&cache);
            let inserted = Arc::clone(&inserted);
            let replaced = Arc::clone(&replaced);
            let evicted = Arc::clone(&evicted);
            thread::spawn(move || {
                for i in 0..1000 {
                    let key = (t * 31 + i * 7) % 300;
                    match cache.put(key, i) {
                        PutOutcome::Inserted => inserted.fetch_add(1, Ordering::Relaxed),
                        PutOutcome::Replaced(_) => replaced.fetch_add(1, Ordering::Relaxed),
                        PutOutcome::Evicted(..) => evicted.fetch_add(1, Ordering::Relaxed),
                        PutOutcome::Rejected(..) => panic!("non-zero capacity rejected a write"),
                    };
                    let _ = cache.get(&((key + 1) % 300));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let metrics = cache.frequency_metrics();
    let inserted = inserted.load(Ordering::Relaxed) as u64;
    let replaced = replaced.load(Ordering::Relaxed) as u64;
    let evicted = evicted.load(Ordering::Relaxed) as u64;

    assert_eq!(metrics.core.replacements, replaced);
    assert_eq!(metrics.core.evictions, evicted);
    assert_eq!(metrics.core.insertions, inserted + evicted);
    assert_eq!(inserted as usize, cache.len());
    assert_eq!(metrics.core.requests, 8000);
    cache.check_invariants().unwrap();
}

#[test]
fn test_mutex_wrapped_sequential_cache() {
    let cache = Arc::new(Mutex::new(FrequencyCache::new(50)));

    let mut pool = Pool::new(4);
    pool.scoped(|scope| {
        for t in 0..4 {
            let cache = Arc::clone(&cache);
            scope.execute(move || {
                for i in 0..200 {
                    let mut guard = cache.lock().unwrap();
                    guard.put((t, i % 60), i);
                    if i % 3 == 0 {
                        let _ = guard.get(&(t, i % 60));
                    }
                }
            });
        }
    });

    let guard = cache.lock().unwrap();
    assert_eq!(guard.len(), 50);
    guard.check_invariants().unwrap();
}

#[test]
fn test_clear_during_concurrent_access() {
    let cache: Arc<ConcurrentFrequencyCache<usize, usize>> = Arc::new(make_cache(100, 8));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..1000 {
                    let key = i % 150;
                    match i % 4 {
                        0 => {
                            cache.put(key, i);
                        }
                        1 => {
                            let _ = cache.get(&key);
                        }
                        2 => {
                            cache.get_mut_with(&key, |v| *v += 1);
                        }
                        _ => {
                            let _ = cache.remove(&key);
                        }
                    }
                    if t == 0 && i % 250 == 0 {
                        cache.clear();
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert!(cache.len() <= 100);
    cache.check_invariants().unwrap();

    let metrics = cache.metrics();
    assert!(metrics["requests"] > 0.0);
    assert_eq!(cache.algorithm_name(), "ConcurrentLFU");
}
