// Statistics collection and reporting for cache simulation

use crate::models::{
    AlgorithmStats, CacheAlgorithm, CacheMode, CsvResultRow, LatencyStats, SimulationKey,
    SimulationResult,
};
use std::collections::HashMap;
use std::path::Path;

/// Collects and reports statistics from simulation runs
pub struct SimulationStats {
    /// Stats for each algorithm+mode combination
    stats: HashMap<SimulationKey, AlgorithmStats>,
}

impl SimulationStats {
    /// Create a new statistics collector for the given combinations
    pub fn new(keys: &[SimulationKey]) -> Self {
        let stats = keys
            .iter()
            .map(|&key| (key, AlgorithmStats::new()))
            .collect();
        Self { stats }
    }

    /// Create SimulationStats from a SimulationResult (for CSV export after run)
    pub fn from_result(result: &SimulationResult) -> Self {
        Self {
            stats: result.stats.clone(),
        }
    }

    /// Record a cache hit
    pub fn record_hit(&mut self, key: SimulationKey, size: usize) {
        if let Some(stats) = self.stats.get_mut(&key) {
            stats.hits += 1;
            stats.bytes_hit += size;
        }
    }

    /// Record a cache miss
    pub fn record_miss(&mut self, key: SimulationKey, size: usize) {
        if let Some(stats) = self.stats.get_mut(&key) {
            stats.misses += 1;
            stats.bytes_miss += size;
        }
    }

    /// Record simulation time for an algorithm+mode
    pub fn record_time(&mut self, key: SimulationKey, time_ms: u64) {
        if let Some(stats) = self.stats.get_mut(&key) {
            stats.simulation_time_ms = time_ms;
        }
    }

    /// Record latency statistics for an algorithm+mode
    pub fn record_latency(&mut self, key: SimulationKey, latency: LatencyStats) {
        if let Some(stats) = self.stats.get_mut(&key) {
            stats.latency = latency;
        }
    }

    /// Record what the cache held once the trace was exhausted
    pub fn record_final_state(&mut self, key: SimulationKey, entries: usize, evictions: Option<u64>) {
        if let Some(stats) = self.stats.get_mut(&key) {
            stats.final_entries = entries;
            stats.evictions = evictions;
        }
    }

    /// Hands the collected statistics over to a result
    pub fn into_stats(self) -> HashMap<SimulationKey, AlgorithmStats> {
        self.stats
    }

    fn sorted(&self) -> Vec<(&SimulationKey, &AlgorithmStats)> {
        let mut rows: Vec<_> = self.stats.iter().collect();
        rows.sort_by_key(|(key, _)| **key);
        rows
    }

    /// Print a summary report of the simulation results
    pub fn print_summary(&self) {
        let total_requests = self
            .stats
            .values()
            .next()
            .map(|s| s.hits + s.misses)
            .unwrap_or(0);

        println!("\nCache Simulation Summary");
        println!("========================");
        println!("Total requests: {total_requests}");

        println!("\nResults by Algorithm and Mode:");
        println!(
            "{:<6} {:<10} {:>8} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
            "Algo", "Mode", "HitRate", "ByteHit%", "Entries", "Evictions", "Ops/sec", "GetAvg", "PutAvg"
        );
        println!("{}", "-".repeat(96));

        for (key, stats) in self.sorted() {
            let evictions = stats
                .evictions
                .map_or_else(|| "-".to_string(), |e| e.to_string());
            println!(
                "{:<6} {:<10} {:>7.2}% {:>9.2}% {:>10} {:>10} {:>10.0} {:>8.0}ns {:>8.0}ns",
                key.algorithm.as_str(),
                key.mode.as_str(),
                stats.hit_rate(),
                stats.byte_hit_rate(),
                stats.final_entries,
                evictions,
                stats.latency.ops_per_sec(),
                stats.latency.get_stats.avg_ns(),
                stats.latency.put_stats.avg_ns(),
            );
        }
    }

    /// Print a comparison between sequential and concurrent modes
    pub fn print_comparison(&self) {
        let mut algorithms: Vec<CacheAlgorithm> = self.stats.keys().map(|k| k.algorithm).collect();
        algorithms.sort();
        algorithms.dedup();

        println!("\nHit-Rate Comparison: Sequential vs Concurrent");
        println!("{:<8} {:>11} {:>11} {:>9}", "Algo", "Sequential", "Concurrent", "Delta");
        println!("{}", "-".repeat(42));

        for algo in algorithms {
            let seq = self.stats.get(&SimulationKey::new(algo, CacheMode::Sequential));
            let conc = self.stats.get(&SimulationKey::new(algo, CacheMode::Concurrent));
            if let (Some(seq), Some(conc)) = (seq, conc) {
                let delta = conc.hit_rate() - seq.hit_rate();
                println!(
                    "{:<8} {:>10.2}% {:>10.2}% {:>+8.2}%",
                    algo.as_str(),
                    seq.hit_rate(),
                    conc.hit_rate(),
                    delta
                );
            }
        }

        println!("\nNote: Concurrent caches use segmented storage. Eviction decisions are");
        println!("per-segment (not global), which may cause slightly lower hit rates.");
    }

    /// Builds one CSV row per algorithm+mode combination
    pub fn csv_rows(&self) -> Vec<CsvResultRow> {
        self.sorted()
            .into_iter()
            .map(|(key, stats)| {
                let get = &stats.latency.get_stats;
                let put = &stats.latency.put_stats;
                CsvResultRow {
                    algorithm: key.algorithm.as_str().to_string(),
                    mode: key.mode.as_str().to_string(),
                    hits: stats.hits,
                    misses: stats.misses,
                    hit_rate: stats.hit_rate(),
                    byte_hit_rate: stats.byte_hit_rate(),
                    bytes_hit: stats.bytes_hit,
                    bytes_miss: stats.bytes_miss,
                    simulation_time_ms: stats.simulation_time_ms,
                    final_entries: stats.final_entries,
                    evictions: stats.evictions,
                    ops_per_sec: stats.latency.ops_per_sec(),
                    get_ops: get.count,
                    get_avg_ns: get.avg_ns(),
                    get_p50_ns: get.p50_ns(),
                    get_p99_ns: get.p99_ns(),
                    put_ops: put.count,
                    put_avg_ns: put.avg_ns(),
                    put_p50_ns: put.p50_ns(),
                    put_p99_ns: put.p99_ns(),
                }
            })
            .collect()
    }

    /// Export results to a CSV file
    pub fn export_csv(&self, path: &Path) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_path(path)?;
        for row in self.csv_rows() {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}
