//! Memory Accounting Tests
//!
//! Uses an instrumented global allocator to check that the cache releases what
//! it owns. Everything runs in a single test so no other test thread allocates
//! while a region is being measured.

use frequency_cache::FrequencyCache;
use stats_alloc::{Region, StatsAlloc, INSTRUMENTED_SYSTEM};
use std::alloc::System;

#[global_allocator]
static GLOBAL: &StatsAlloc<System> = &INSTRUMENTED_SYSTEM;

fn net_bytes(region: &Region<'_, System>) -> isize {
    let change = region.change();
    change.bytes_allocated as isize - change.bytes_deallocated as isize
}

#[test]
fn test_memory_is_released() {
    // Dropping a populated cache returns every byte
    {
        let region = Region::new(GLOBAL);
        {
            let mut cache = FrequencyCache::new(256);
            for i in 0..1_000u32 {
                cache.put(i, format!("value-{i:08}"));
                if i % 3 == 0 {
                    cache.get(&(i / 2));
                }
            }
            assert_eq!(cache.len(), 256);
        }
        assert_eq!(net_bytes(&region), 0, "drop leaked memory");
    }

    // Clearing drops every stored value
    {
        let mut cache = FrequencyCache::new(100);
        for i in 0..100u32 {
            cache.put(i, vec![0u8; 32]);
        }
        let region = Region::new(GLOBAL);
        cache.clear();
        let change = region.change();
        assert!(change.bytes_deallocated >= 100 * 32);
        assert_eq!(change.bytes_allocated, 0);
        assert!(cache.is_empty());
    }

    // A zero-capacity cache retains nothing from rejected writes
    {
        let mut cache = FrequencyCache::new(0);
        let region = Region::new(GLOBAL);
        for i in 0..500u32 {
            let outcome = cache.put(i, vec![1u8; 64]);
            assert!(outcome.is_rejected());
        }
        assert_eq!(net_bytes(&region), 0, "rejected writes were retained");
    }

    // Steady-state churn at capacity reuses slots instead of growing
    {
        let mut cache = FrequencyCache::new(64);
        let mut next = 0u64;
        let mut churn = |cache: &mut FrequencyCache<u64, u64>, rounds: u64| {
            for _ in 0..rounds {
                cache.put(next, next);
                next += 1;
            }
        };
        churn(&mut cache, 10_000);

        let region = Region::new(GLOBAL);
        churn(&mut cache, 10_000);
        assert_eq!(net_bytes(&region), 0, "churn grew the cache");
        assert_eq!(cache.len(), 64);
        cache.check_invariants().unwrap();
    }
}
