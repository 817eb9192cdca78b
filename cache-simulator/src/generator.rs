//! Synthetic trace generation
//!
//! Requests are split between a small set of popular objects, drawn with a
//! Zipf distribution, and a larger set of regular objects drawn uniformly.
//! Every object keeps one size for the whole trace so byte hit rates stay
//! meaningful.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Parameters for generating synthetic traces
#[derive(Debug, Clone)]
pub struct TrafficLogConfig {
    /// Total number of requests across all files
    pub requests: u64,
    /// Number of unique objects
    pub unique_objects: u32,
    /// Traffic distribution: percentage of traffic from popular objects
    pub popular_traffic_percent: u8,
    /// Percentage of objects considered "popular"
    pub popular_objects_percent: u8,
    /// Skew of the popular set; 0 is uniform, around 1 is classic Zipf
    pub zipf_exponent: f64,
    /// Minimum object size in bytes
    pub min_size: u64,
    /// Maximum object size in bytes
    pub max_size: u64,
    /// Number of files the trace is split into
    pub files: u32,
    /// Output directory
    pub output_dir: PathBuf,
    /// Fixed seed for reproducible traces
    pub seed: Option<u64>,
}

impl Default for TrafficLogConfig {
    fn default() -> Self {
        Self {
            requests: 100_000,
            unique_objects: 10_000,
            popular_traffic_percent: 80,
            popular_objects_percent: 20,
            zipf_exponent: 0.9,
            min_size: 1024,        // 1KB
            max_size: 1024 * 1024, // 1MB
            files: 1,
            output_dir: PathBuf::from("traces"),
            seed: None,
        }
    }
}

/// One written trace row
#[derive(Debug, Serialize)]
struct TraceRow<'a> {
    timestamp: u64,
    key: &'a str,
    size: u64,
}

/// Cumulative Zipf weights over ranks `0..n`
struct ZipfTable {
    cdf: Vec<f64>,
}

impl ZipfTable {
    fn new(n: u32, exponent: f64) -> Self {
        let mut total = 0.0;
        let mut cdf = Vec::with_capacity(n as usize);
        for rank in 1..=n {
            total += 1.0 / f64::from(rank).powf(exponent);
            cdf.push(total);
        }
        Self { cdf }
    }

    fn sample<R: Rng>(&self, rng: &mut R) -> u32 {
        let total = self.cdf.last().copied().unwrap_or(0.0);
        let target = rng.gen::<f64>() * total;
        let rank = self.cdf.partition_point(|&c| c < target);
        u32::try_from(rank.min(self.cdf.len().saturating_sub(1))).unwrap_or(0)
    }
}

/// Generator for synthetic traces
pub struct TrafficLogGenerator {
    config: TrafficLogConfig,
}

impl TrafficLogGenerator {
    /// Create a new generator with the given configuration
    pub fn new(config: TrafficLogConfig) -> Self {
        Self { config }
    }

    /// Number of objects in the popular set
    pub fn popular_objects(&self) -> u32 {
        let popular = u64::from(self.config.unique_objects)
            * u64::from(self.config.popular_objects_percent.min(100))
            / 100;
        u32::try_from(popular).unwrap_or(self.config.unique_objects)
    }

    /// Stable size for an object, derived from its key
    fn object_size(&self, key_hash: u64) -> u64 {
        let min = self.config.min_size.min(self.config.max_size);
        let span = self.config.max_size.max(min) - min;
        min + splitmix64(key_hash) % (span + 1)
    }

    /// Writes the trace files and returns their paths
    pub fn generate(&self) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
        let config = &self.config;
        fs::create_dir_all(&config.output_dir)?;

        let popular = self.popular_objects();
        let regular = config.unique_objects - popular;
        let zipf = ZipfTable::new(popular, config.zipf_exponent);
        let popular_probability = f64::from(config.popular_traffic_percent.min(100)) / 100.0;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut timestamp = match config.seed {
            Some(_) => 0,
            None => SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs(),
        };

        println!("Generating traffic logs with the following parameters:");
        println!("  Requests: {}", config.requests);
        println!("  Unique objects: {}", config.unique_objects);
        println!(
            "  Popular objects: {popular} ({}%), Zipf exponent {}",
            config.popular_objects_percent, config.zipf_exponent
        );
        println!(
            "  Traffic distribution: {}% from popular objects",
            config.popular_traffic_percent
        );
        println!("  Size range: {} - {} bytes", config.min_size, config.max_size);
        println!("  Output directory: {}", config.output_dir.display());

        let files = u64::from(config.files.max(1));
        let mut paths = Vec::new();
        for file_index in 0..files {
            let path = config.output_dir.join(format!("trace_{file_index:03}.csv"));
            let mut writer = csv::Writer::from_path(&path)?;

            // Spread the remainder over the first files
            let base = config.requests / files;
            let rows = base + u64::from(file_index < config.requests % files);
            let mut key = String::new();

            for _ in 0..rows {
                let use_popular =
                    popular > 0 && (regular == 0 || rng.gen::<f64>() < popular_probability);
                let (index, kind) = if use_popular {
                    (zipf.sample(&mut rng), "popular")
                } else if regular > 0 {
                    (rng.gen_range(0..regular), "regular")
                } else {
                    // No objects at all
                    break;
                };

                key.clear();
                key.push_str(kind);
                key.push_str("_obj_");
                key.push_str(&index.to_string());

                let salt = if use_popular { 0 } else { 1 << 32 };
                writer.serialize(TraceRow {
                    timestamp,
                    key: &key,
                    size: self.object_size(u64::from(index) | salt),
                })?;

                // Advance time by 0-2 seconds
                timestamp += rng.gen_range(0..=2);
            }

            writer.flush()?;
            println!("  Wrote {rows} requests to {}", path.display());
            paths.push(path);
        }

        println!("Traffic log generation complete");
        Ok(paths)
    }
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}
