//! Concurrent Cache Usage Examples
//!
//! This example demonstrates multi-threaded usage patterns for the segmented
//! frequency cache.
//!
//! Run with: cargo run --example concurrent_usage --features concurrent

use frequency_cache::config::{
    ConcurrentCacheConfig, ConcurrentFrequencyCacheConfig, FrequencyCacheConfig,
};
use frequency_cache::ConcurrentFrequencyCache;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

fn lfu_config(capacity: usize, segments: usize) -> ConcurrentFrequencyCacheConfig {
    ConcurrentCacheConfig {
        base: FrequencyCacheConfig { capacity },
        segments,
    }
}

fn main() {
    println!("Concurrent Cache Usage Examples");
    println!("================================\n");

    basic_concurrent_usage();
    println!();

    zero_copy_get_with();
    println!();

    segment_tuning();
    println!();

    hot_keys_under_contention();
    println!();

    throughput_comparison();
}

/// Basic multi-threaded cache usage
fn basic_concurrent_usage() {
    println!("1. Basic Concurrent Usage");
    println!("   -----------------------");

    let cache = Arc::new(ConcurrentFrequencyCache::init(lfu_config(1000, 16), None));

    let num_threads = 4;
    let ops_per_thread = 1000;

    let handles: Vec<_> = (0..num_threads)
        .map(|thread_id| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..ops_per_thread {
                    let key = format!("thread{}-key{}", thread_id, i);
                    let value = thread_id * 10000 + i;

                    cache.put(key.clone(), value);

                    // Another thread may have evicted it already
                    if let Some(v) = cache.get(&key) {
                        assert_eq!(v, value);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let metrics = cache.frequency_metrics();
    println!(
        "   Completed {} operations across {} threads",
        num_threads * ops_per_thread * 2,
        num_threads
    );
    println!("   Final cache size: {} items", cache.len());
    println!(
        "   Hits: {}  Evictions: {}",
        metrics.core.cache_hits, metrics.core.evictions
    );
}

/// Zero-copy access pattern using get_with()
fn zero_copy_get_with() {
    println!("2. Zero-Copy Access with get_with()");
    println!("   ----------------------------------");

    let cache: ConcurrentFrequencyCache<String, Vec<u8>> =
        ConcurrentFrequencyCache::init(lfu_config(100, 16), None);

    cache.put("large_key".to_string(), vec![1u8; 1024]);

    let sum: Option<u64> = cache.get_with("large_key", |data| data.iter().map(|&x| x as u64).sum());
    println!("   Computed sum without cloning: {}", sum.unwrap_or_default());

    // get_with counts as a read just like get()
    println!(
        "   Frequency after one read: {}",
        cache.frequency("large_key").unwrap_or_default()
    );

    cache.get_mut_with("large_key", |data| data.truncate(16));
    let len = cache.peek("large_key").map(|data| data.len());
    println!("   Length after in-place truncate: {}", len.unwrap_or_default());
}

/// Demonstrate segment count tuning for different workloads
fn segment_tuning() {
    println!("3. Segment Count Tuning");
    println!("   ---------------------");

    for (label, capacity, segments) in [
        ("Default", 10_000, frequency_cache::concurrent::default_segment_count()),
        ("High-concurrency", 10_000, 32),
        ("Exact eviction", 10_000, 1),
        ("Tiny capacity", 3, 16),
    ] {
        let cache: ConcurrentFrequencyCache<String, i32> =
            ConcurrentFrequencyCache::init(lfu_config(capacity, segments), None);
        println!(
            "   {label:<17} capacity {:>6}, {:>2} segments",
            cache.capacity(),
            cache.segment_count()
        );
    }

    println!();
    println!("   Each segment evicts its own least frequently used entry.");
    println!("   Use one segment when the global eviction order matters.");
}

/// Frequently read keys outlive a stream of one-off inserts
fn hot_keys_under_contention() {
    println!("4. Hot Keys Under Contention");
    println!("   --------------------------");

    let cache: Arc<ConcurrentFrequencyCache<u64, u64>> =
        Arc::new(ConcurrentFrequencyCache::init(lfu_config(256, 8), None));
    for key in 0..16 {
        cache.put(key, key);
    }

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for round in 0..1000 {
                    cache.get(&(round % 16));
                }
            })
        })
        .collect();
    let writer = {
        let cache = Arc::clone(&cache);
        thread::spawn(move || {
            for key in 1000..11_000 {
                cache.put(key, key);
            }
        })
    };

    for handle in readers {
        handle.join().expect("Thread panicked");
    }
    writer.join().expect("Thread panicked");

    let survivors = (0..16).filter(|key| cache.contains(key)).count();
    println!("   Hot keys still cached: {survivors}/16");
    println!("   Scan keys inserted: 10000, cache size: {}", cache.len());
}

/// Compare throughput across different segment configurations
fn throughput_comparison() {
    println!("5. Throughput Comparison (8 threads, 10K ops each)");
    println!("   -------------------------------------------------");

    let ops_per_thread = 10_000;
    let num_threads = 8;

    for segments in [1, 4, 8, 16, 32] {
        let cache: Arc<ConcurrentFrequencyCache<i32, i32>> =
            Arc::new(ConcurrentFrequencyCache::init(lfu_config(10000, segments), None));

        let start = Instant::now();

        let handles: Vec<_> = (0..num_threads)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    let offset = t * ops_per_thread;
                    for i in 0..ops_per_thread {
                        let key = offset + i;
                        cache.put(key, key);
                        cache.get(&key);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("Thread panicked");
        }

        let elapsed = start.elapsed();
        let total_ops = num_threads * ops_per_thread * 2;
        let ops_per_sec = (total_ops as f64 / elapsed.as_secs_f64()) as u64;

        println!(
            "   {:>2} segments: {:>10} ops/sec ({:?})",
            segments, ops_per_sec, elapsed
        );
    }
}
