//! Basic Frequency Cache Usage
//!
//! Walks through the eviction rules with a three-entry cache.
//!
//! Run with: cargo run --example basic_usage

use frequency_cache::config::FrequencyCacheConfig;
use frequency_cache::{FrequencyCache, PutOutcome};

fn main() {
    println!("Frequency Cache Basics");
    println!("======================\n");

    let mut cache = FrequencyCache::init(FrequencyCacheConfig { capacity: 3 }, None);

    cache.put("apple", 1);
    cache.put("banana", 2);
    cache.put("cherry", 3);
    print_state("after three inserts", &cache);

    // Reads promote a key to the next frequency
    cache.get(&"apple");
    cache.get(&"apple");
    cache.get(&"cherry");
    print_state("after reading apple twice and cherry once", &cache);

    // The cache is full: banana has the lowest frequency
    describe(cache.put("date", 4));
    print_state("after inserting date", &cache);

    // Overwriting counts as a use of the key
    describe(cache.put("date", 40));
    print_state("after overwriting date", &cache);

    // date and cherry now tie at frequency 1; cherry got there first
    describe(cache.put("elderberry", 5));
    print_state("after inserting elderberry", &cache);

    println!("\nNext victim: {:?}", cache.peek_lfu());
    println!("Popped:      {:?}", cache.pop());
    println!("Removed:     {:?}", cache.remove(&"apple"));
    print_state("after pop and remove", &cache);

    let mut empty: FrequencyCache<&str, i32> = FrequencyCache::new(0);
    println!();
    describe(empty.put("ignored", 0));
}

fn describe(outcome: PutOutcome<&'static str, i32>) {
    match outcome {
        PutOutcome::Inserted => println!("-> inserted"),
        PutOutcome::Replaced(old) => println!("-> replaced previous value {old}"),
        PutOutcome::Evicted(key, value) => println!("-> evicted {key}={value}"),
        PutOutcome::Rejected(key, _) => println!("-> rejected {key}: cache has no capacity"),
    }
}

fn print_state(label: &str, cache: &FrequencyCache<&'static str, i32>) {
    println!("{label}:");
    for (key, value) in cache {
        let frequency = cache.frequency(key).unwrap_or_default();
        println!("  {key:<12} value={value:<3} frequency={frequency}");
    }
}
