//! Cache Metrics Demonstration
//!
//! Runs the same workload against caches of different sizes and prints the
//! core and frequency metrics each one reports.
//!
//! Run with: cargo run --example metrics_demo

use frequency_cache::config::FrequencyCacheConfig;
use frequency_cache::metrics::CacheMetrics;
use frequency_cache::FrequencyCache;
use std::collections::BTreeMap;

fn main() {
    println!("Frequency Cache Metrics");
    println!("=======================\n");

    let capacities = [2, 4, 8];
    println!("Workload: five fruit keys, skewed reads, two late inserts");
    println!("Capacities: {capacities:?}\n");

    let caches: Vec<(String, FrequencyCache<&'static str, i32>)> = capacities
        .iter()
        .map(|&cap| (format!("LFU({cap})"), run_workload(cap)))
        .collect();

    display_core_metrics(&caches);
    println!();
    for (name, cache) in &caches {
        println!("{name} frequency metrics:");
        print_frequency_metrics(&cache.metrics().to_btreemap());
        println!();
    }

    demonstrate_deterministic_ordering(&caches[0].1);
}

fn run_workload(capacity: usize) -> FrequencyCache<&'static str, i32> {
    let mut cache = FrequencyCache::init(FrequencyCacheConfig { capacity }, None);

    for (i, key) in ["apple", "banana", "cherry", "date", "elderberry"]
        .into_iter()
        .enumerate()
    {
        cache.put(key, i as i32);
    }

    for _ in 0..3 {
        cache.get(&"apple");
    }
    cache.get(&"banana");
    cache.get(&"elderberry");
    cache.get(&"fig");

    cache.put("fig", 6);
    cache.put("grape", 7);
    cache.put("apple", 10);
    cache
}

fn display_core_metrics(caches: &[(String, FrequencyCache<&'static str, i32>)]) {
    println!(
        "{:<8} {:>9} {:>6} {:>8} {:>10} {:>10}",
        "Cache", "Requests", "Hits", "Hit %", "Inserts", "Evictions"
    );
    println!("{}", "-".repeat(56));
    for (name, cache) in caches {
        let core = &cache.metrics().core;
        println!(
            "{:<8} {:>9} {:>6} {:>7.1}% {:>10} {:>10}",
            name,
            core.requests,
            core.cache_hits,
            core.hit_rate() * 100.0,
            core.insertions,
            core.evictions
        );
    }
}

fn print_frequency_metrics(metrics: &BTreeMap<String, f64>) {
    for key in [
        "min_frequency",
        "max_frequency",
        "average_frequency",
        "active_frequency_levels",
        "total_frequency_increments",
    ] {
        if let Some(value) = metrics.get(key) {
            println!("  {key:<28} {value:.2}");
        }
    }
}

fn demonstrate_deterministic_ordering(cache: &dyn CacheMetrics) {
    println!("Metrics reported by {} (BTreeMap order):", cache.algorithm_name());
    for (i, (key, value)) in cache.metrics().iter().enumerate() {
        println!("  {:>2}. {key:<28} {value:.3}", i + 1);
    }
}
