//! Simulation runner for cache algorithms
//!
//! Replays the same trace through every selected algorithm+mode combination
//! with read-through semantics: each request is a `get`, and a miss is
//! followed by a `put` of the requested object. Requests are streamed from
//! disk so memory use is proportional to cache size rather than trace size.

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::time::Instant;

use frequency_cache::config::{ConcurrentCacheConfig, FrequencyCacheConfig};
use frequency_cache::{ConcurrentFrequencyCache, FrequencyCache};

use crate::input::{LogParseError, LogReader};
use crate::models::{
    CacheAlgorithm, CacheMode, LatencyPercentiles, LatencyStats, OpLatencyStats,
    SimulationConfig, SimulationKey, SimulationResult,
};
use crate::stats::SimulationStats;

// External caches for comparison
use lru::LruCache;
use moka::sync::Cache as MokaCache;

// Use ahash for faster hashing with Moka
use ahash::RandomState as AHashRandomState;

/// Wrapper enum for all cache implementations
/// This allows us to handle both sequential and concurrent caches uniformly
enum CacheWrapper {
    LfuSeq(FrequencyCache<String, u32>),
    LfuConc(ConcurrentFrequencyCache<String, u32>),
    Lru(LruCache<String, u32>),
    Moka(MokaCache<String, u32, AHashRandomState>),
}

impl CacheWrapper {
    /// Create a new cache instance for an algorithm+mode combination
    fn create(key: SimulationKey, capacity: usize, segment_count: Option<usize>) -> Self {
        match (key.algorithm, key.mode) {
            (CacheAlgorithm::Lfu, CacheMode::Sequential) => {
                CacheWrapper::LfuSeq(FrequencyCache::init(FrequencyCacheConfig { capacity }, None))
            }
            (CacheAlgorithm::Lfu, CacheMode::Concurrent) => {
                let config = ConcurrentCacheConfig {
                    base: FrequencyCacheConfig { capacity },
                    segments: segment_count
                        .unwrap_or_else(frequency_cache::concurrent::default_segment_count),
                };
                CacheWrapper::LfuConc(ConcurrentFrequencyCache::init(config, None))
            }
            (CacheAlgorithm::Lru, _) => {
                // The lru crate cannot represent an empty cache
                let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
                CacheWrapper::Lru(LruCache::new(cap))
            }
            (CacheAlgorithm::Moka, _) => {
                let cache = MokaCache::builder()
                    .max_capacity(capacity as u64)
                    .initial_capacity(capacity)
                    .build_with_hasher(AHashRandomState::default());
                CacheWrapper::Moka(cache)
            }
        }
    }

    /// Attempt to get a value from the cache
    fn get(&mut self, key: &str) -> bool {
        match self {
            CacheWrapper::LfuSeq(c) => c.get(key).is_some(),
            CacheWrapper::LfuConc(c) => c.get(key).is_some(),
            CacheWrapper::Lru(c) => c.get(key).is_some(),
            CacheWrapper::Moka(c) => c.get(key).is_some(),
        }
    }

    /// Insert a value into the cache
    fn put(&mut self, key: String, size: usize) {
        let value = u32::try_from(size).unwrap_or(u32::MAX);
        match self {
            CacheWrapper::LfuSeq(c) => {
                c.put(key, value);
            }
            CacheWrapper::LfuConc(c) => {
                c.put(key, value);
            }
            CacheWrapper::Lru(c) => {
                c.put(key, value);
            }
            CacheWrapper::Moka(c) => c.insert(key, value),
        }
    }

    /// Get the current number of entries in the cache
    fn len(&self) -> usize {
        match self {
            CacheWrapper::LfuSeq(c) => c.len(),
            CacheWrapper::LfuConc(c) => c.len(),
            CacheWrapper::Lru(c) => c.len(),
            CacheWrapper::Moka(c) => {
                // Moka applies evictions lazily
                c.run_pending_tasks();
                c.entry_count() as usize
            }
        }
    }

    /// Evictions counted by the cache itself, if it keeps such a counter
    fn evictions(&self) -> Option<u64> {
        match self {
            CacheWrapper::LfuSeq(c) => Some(c.metrics().core.evictions),
            CacheWrapper::LfuConc(c) => Some(c.frequency_metrics().core.evictions),
            CacheWrapper::Lru(_) | CacheWrapper::Moka(_) => None,
        }
    }
}

/// Tracks latency for a single operation type
#[derive(Debug)]
struct OpLatencyTracker {
    total_ns: u64,
    count: u64,
    min_ns: u64,
    max_ns: u64,
    /// Sample reservoir for percentile calculation
    samples: Vec<u64>,
    max_samples: usize,
}

impl OpLatencyTracker {
    fn new() -> Self {
        Self {
            total_ns: 0,
            count: 0,
            min_ns: u64::MAX,
            max_ns: 0,
            samples: Vec::with_capacity(5000),
            max_samples: 5000,
        }
    }

    #[inline]
    fn record(&mut self, latency_ns: u64) {
        self.total_ns += latency_ns;
        self.count += 1;
        self.min_ns = self.min_ns.min(latency_ns);
        self.max_ns = self.max_ns.max(latency_ns);

        // Reservoir sampling for percentiles
        if self.samples.len() < self.max_samples {
            self.samples.push(latency_ns);
        } else {
            let slot = rand::random::<u64>() % self.count;
            if let Ok(slot) = usize::try_from(slot) {
                if slot < self.max_samples {
                    self.samples[slot] = latency_ns;
                }
            }
        }
    }

    fn percentiles(&mut self) -> LatencyPercentiles {
        if self.samples.is_empty() {
            return LatencyPercentiles::default();
        }

        self.samples.sort_unstable();
        let len = self.samples.len();

        LatencyPercentiles {
            p50_ns: self.samples[len * 50 / 100],
            p90_ns: self.samples[len * 90 / 100],
            p99_ns: self.samples[len * 99 / 100],
        }
    }

    fn finalize(&mut self) -> OpLatencyStats {
        OpLatencyStats {
            total_ns: self.total_ns,
            count: self.count,
            min_ns: if self.min_ns == u64::MAX {
                0
            } else {
                self.min_ns
            },
            max_ns: self.max_ns,
            percentiles: Some(self.percentiles()),
        }
    }
}

fn elapsed_ns(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX)
}

/// Runner for cache simulations
pub struct SimulationRunner {
    config: SimulationConfig,
}

impl SimulationRunner {
    /// Create a new simulation runner
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Run the simulation, streaming the trace once per cache.
    pub fn run(&self) -> Result<SimulationResult, LogParseError> {
        let log_reader = LogReader::new(&self.config.input_dir);

        // First pass: gather statistics about the dataset
        println!("Scanning dataset for statistics...");
        let scan_start = Instant::now();
        let mut total_requests = 0usize;
        let mut total_bytes = 0usize;
        let mut unique_keys: HashSet<String> = HashSet::new();
        for request in log_reader.stream_requests()? {
            let request = request?;
            total_requests += 1;
            total_bytes += request.size;
            unique_keys.insert(request.key);
        }
        let unique_objects = unique_keys.len();
        drop(unique_keys);
        println!("Scan completed in {:.2?}", scan_start.elapsed());

        println!("\nDataset statistics:");
        println!("  Total requests: {total_requests}");
        println!("  Unique objects: {unique_objects}");
        if unique_objects > 0 {
            println!(
                "  Avg requests per object: {:.2}",
                total_requests as f64 / unique_objects as f64
            );
        }

        let keys = self.config.keys();
        let mut stats = SimulationStats::new(&keys);
        let start_time = Instant::now();

        // Only one cache is alive at a time
        for key in keys {
            println!("\nRunning {key}...");
            let mut cache =
                CacheWrapper::create(key, self.config.capacity, self.config.segment_count);
            let mut get_latency = OpLatencyTracker::new();
            let mut put_latency = OpLatencyTracker::new();

            let algo_start = Instant::now();
            let mut processed = 0usize;
            for request in log_reader.stream_requests()? {
                let request = request?;

                let get_start = Instant::now();
                let hit = cache.get(&request.key);
                get_latency.record(elapsed_ns(get_start));

                if hit {
                    stats.record_hit(key, request.size);
                } else {
                    stats.record_miss(key, request.size);
                    let put_start = Instant::now();
                    cache.put(request.key, request.size);
                    put_latency.record(elapsed_ns(put_start));
                }

                processed += 1;
                if processed % 10_000_000 == 0 {
                    println!("  Processed {} million requests...", processed / 1_000_000);
                }
            }

            let algo_duration = algo_start.elapsed();
            let latency = LatencyStats {
                get_stats: get_latency.finalize(),
                put_stats: put_latency.finalize(),
            };

            println!(
                "  Wall time: {:.2?} ({:.0} req/s including I/O)",
                algo_duration,
                processed as f64 / algo_duration.as_secs_f64().max(f64::EPSILON)
            );
            println!(
                "  Cache ops: {} in {:.3}s = {:.0} ops/s | get avg={:.0}ns p99={}ns | put avg={:.0}ns p99={}ns",
                latency.count(),
                latency.duration_secs(),
                latency.ops_per_sec(),
                latency.get_stats.avg_ns(),
                latency.get_stats.p99_ns(),
                latency.put_stats.avg_ns(),
                latency.put_stats.p99_ns()
            );

            stats.record_time(key, u64::try_from(algo_duration.as_millis()).unwrap_or(u64::MAX));
            stats.record_final_state(key, cache.len(), cache.evictions());
            stats.record_latency(key, latency);
        }

        let duration = start_time.elapsed();

        stats.print_summary();
        if self.config.modes.len() > 1 {
            stats.print_comparison();
        }

        Ok(SimulationResult {
            stats: stats.into_stats(),
            total_requests,
            total_bytes,
            unique_objects,
            duration,
            capacity: self.config.capacity,
        })
    }
}
