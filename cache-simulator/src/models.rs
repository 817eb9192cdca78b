// Data models for cache simulation

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Represents a single cache request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Unix timestamp of the request in seconds
    pub timestamp: u64,
    /// Cache key
    pub key: String,
    /// Size of the object in bytes
    pub size: usize,
}

impl Request {
    /// Create a new request
    pub fn new(timestamp: u64, key: String, size: usize) -> Self {
        Self {
            timestamp,
            key,
            size,
        }
    }
}

/// Cache implementations that can be replayed against a trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheAlgorithm {
    /// This crate's frequency cache
    Lfu,
    /// Baseline from the `lru` crate
    Lru,
    /// Moka cache (external crate for comparison)
    Moka,
}

impl CacheAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheAlgorithm::Lfu => "LFU",
            CacheAlgorithm::Lru => "LRU",
            CacheAlgorithm::Moka => "Moka",
        }
    }

    /// Parses a user supplied algorithm name
    pub fn parse(name: &str) -> Option<CacheAlgorithm> {
        match name.to_lowercase().as_str() {
            "lfu" => Some(CacheAlgorithm::Lfu),
            "lru" => Some(CacheAlgorithm::Lru),
            "moka" => Some(CacheAlgorithm::Moka),
            _ => None,
        }
    }

    /// Get all available algorithms
    pub fn all() -> Vec<CacheAlgorithm> {
        vec![CacheAlgorithm::Lfu, CacheAlgorithm::Lru, CacheAlgorithm::Moka]
    }

    /// Whether an implementation exists for the given mode.
    ///
    /// The `lru` baseline is single-threaded and Moka is always thread-safe.
    pub fn supports(&self, mode: CacheMode) -> bool {
        match self {
            CacheAlgorithm::Lfu => true,
            CacheAlgorithm::Lru => mode == CacheMode::Sequential,
            CacheAlgorithm::Moka => mode == CacheMode::Concurrent,
        }
    }
}

/// Cache execution mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheMode {
    /// Single-threaded cache (e.g., FrequencyCache)
    Sequential,
    /// Thread-safe segmented cache (e.g., ConcurrentFrequencyCache)
    Concurrent,
}

impl CacheMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheMode::Sequential => "Sequential",
            CacheMode::Concurrent => "Concurrent",
        }
    }

    /// Parses a mode string, accepting `both`/`all` for every mode
    pub fn parse_list(mode: &str) -> Option<Vec<CacheMode>> {
        match mode.to_lowercase().as_str() {
            "sequential" | "seq" => Some(vec![CacheMode::Sequential]),
            "concurrent" | "conc" => Some(vec![CacheMode::Concurrent]),
            "both" | "all" => Some(vec![CacheMode::Sequential, CacheMode::Concurrent]),
            _ => None,
        }
    }
}

impl fmt::Display for CacheMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unique identifier for a simulation run combining algorithm and mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimulationKey {
    pub algorithm: CacheAlgorithm,
    pub mode: CacheMode,
}

impl SimulationKey {
    pub fn new(algorithm: CacheAlgorithm, mode: CacheMode) -> Self {
        Self { algorithm, mode }
    }
}

impl fmt::Display for SimulationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.algorithm.as_str(), self.mode.as_str())
    }
}

/// Configuration for a simulation run
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Directory containing input trace files
    pub input_dir: PathBuf,
    /// Cache capacity in number of entries
    pub capacity: usize,
    /// Algorithms to simulate
    pub algorithms: Vec<CacheAlgorithm>,
    /// Modes to simulate
    pub modes: Vec<CacheMode>,
    /// Number of segments for concurrent caches (None = library default)
    pub segment_count: Option<usize>,
}

impl SimulationConfig {
    /// Every supported algorithm+mode combination, in report order
    pub fn keys(&self) -> Vec<SimulationKey> {
        let mut keys = Vec::new();
        for &algorithm in &self.algorithms {
            for &mode in &self.modes {
                if algorithm.supports(mode) {
                    keys.push(SimulationKey::new(algorithm, mode));
                }
            }
        }
        keys
    }
}

/// Results of a simulation run
#[derive(Debug)]
pub struct SimulationResult {
    /// Statistics for each algorithm+mode combination
    pub stats: HashMap<SimulationKey, AlgorithmStats>,
    /// Total number of requests processed
    pub total_requests: usize,
    /// Total bytes requested
    pub total_bytes: usize,
    /// Number of unique objects in the dataset
    pub unique_objects: usize,
    /// Duration of the simulation
    pub duration: Duration,
    /// Cache capacity used
    pub capacity: usize,
}

/// Statistics for a single algorithm
#[derive(Debug, Default, Clone)]
pub struct AlgorithmStats {
    /// Number of cache hits
    pub hits: usize,
    /// Number of cache misses
    pub misses: usize,
    /// Bytes served from cache (hits)
    pub bytes_hit: usize,
    /// Bytes served from backend (misses)
    pub bytes_miss: usize,
    /// Wall-clock time including trace I/O, in milliseconds
    pub simulation_time_ms: u64,
    /// Entries cached when the trace ended
    pub final_entries: usize,
    /// Evictions reported by the cache, when it reports them
    pub evictions: Option<u64>,
    /// Latency statistics for cache operations (excludes I/O)
    pub latency: LatencyStats,
}

impl AlgorithmStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculate hit rate as percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            (self.hits as f64 / total as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Calculate byte hit rate as percentage
    pub fn byte_hit_rate(&self) -> f64 {
        let total = self.bytes_hit + self.bytes_miss;
        if total > 0 {
            (self.bytes_hit as f64 / total as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Latency statistics for a single operation type
#[derive(Debug, Clone, Default)]
pub struct OpLatencyStats {
    /// Total time spent (nanoseconds)
    pub total_ns: u64,
    /// Number of operations
    pub count: u64,
    /// Minimum latency (nanoseconds)
    pub min_ns: u64,
    /// Maximum latency (nanoseconds)
    pub max_ns: u64,
    /// Latency percentiles
    pub percentiles: Option<LatencyPercentiles>,
}

impl OpLatencyStats {
    /// Calculate average latency in nanoseconds
    pub fn avg_ns(&self) -> f64 {
        if self.count > 0 {
            self.total_ns as f64 / self.count as f64
        } else {
            0.0
        }
    }

    /// Calculate throughput in operations per second
    pub fn ops_per_sec(&self) -> f64 {
        if self.total_ns > 0 {
            (self.count as f64 * 1_000_000_000.0) / self.total_ns as f64
        } else {
            0.0
        }
    }

    pub fn p50_ns(&self) -> u64 {
        self.percentiles.as_ref().map_or(0, |p| p.p50_ns)
    }

    pub fn p99_ns(&self) -> u64 {
        self.percentiles.as_ref().map_or(0, |p| p.p99_ns)
    }
}

/// Latency statistics for all cache operations
#[derive(Debug, Clone, Default)]
pub struct LatencyStats {
    /// Get operation stats
    pub get_stats: OpLatencyStats,
    /// Put operation stats (only issued on a miss)
    pub put_stats: OpLatencyStats,
}

impl LatencyStats {
    /// Total number of operations
    pub fn count(&self) -> u64 {
        self.get_stats.count + self.put_stats.count
    }

    /// Total time spent in all cache operations (nanoseconds)
    pub fn total_ns(&self) -> u64 {
        self.get_stats.total_ns + self.put_stats.total_ns
    }

    /// Calculate throughput in operations per second (all operations)
    pub fn ops_per_sec(&self) -> f64 {
        let total_ns = self.total_ns();
        if total_ns > 0 {
            (self.count() as f64 * 1_000_000_000.0) / total_ns as f64
        } else {
            0.0
        }
    }

    /// Get total duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.total_ns() as f64 / 1_000_000_000.0
    }
}

/// Latency percentiles
#[derive(Debug, Clone, Default)]
pub struct LatencyPercentiles {
    pub p50_ns: u64,
    pub p90_ns: u64,
    pub p99_ns: u64,
}

/// CSV export row for simulation results
#[derive(Debug, Serialize)]
pub struct CsvResultRow {
    pub algorithm: String,
    pub mode: String,
    pub hits: usize,
    pub misses: usize,
    pub hit_rate: f64,
    pub byte_hit_rate: f64,
    pub bytes_hit: usize,
    pub bytes_miss: usize,
    pub simulation_time_ms: u64,
    pub final_entries: usize,
    pub evictions: Option<u64>,
    pub ops_per_sec: f64,
    pub get_ops: u64,
    pub get_avg_ns: f64,
    pub get_p50_ns: u64,
    pub get_p99_ns: u64,
    pub put_ops: u64,
    pub put_avg_ns: f64,
    pub put_p50_ns: u64,
    pub put_p99_ns: u64,
}
