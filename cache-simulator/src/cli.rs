//! Command-line arguments shared by the simulator binaries

use crate::generator::TrafficLogConfig;
use clap::Args;
use std::path::PathBuf;

/// Options for synthetic trace generation
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Total number of requests
    #[arg(long, default_value = "100000")]
    pub requests: u64,

    /// Number of unique objects
    #[arg(long, default_value = "10000")]
    pub objects: u32,

    /// Percentage of traffic from popular objects (default: 80%)
    #[arg(long, default_value = "80")]
    pub popular_traffic: u8,

    /// Percentage of objects that are popular (default: 20%)
    #[arg(long, default_value = "20")]
    pub popular_objects: u8,

    /// Zipf exponent for the popular set
    #[arg(long, default_value = "0.9")]
    pub zipf: f64,

    /// Minimum object size in KB
    #[arg(long, default_value = "1")]
    pub min_size: u64,

    /// Maximum object size in KB
    #[arg(long, default_value = "1024")]
    pub max_size: u64,

    /// Number of files to split the trace into
    #[arg(long, default_value = "1")]
    pub files: u32,

    /// Output directory
    #[arg(short, long, default_value = "traces")]
    pub output: PathBuf,

    /// Seed for a reproducible trace
    #[arg(long)]
    pub seed: Option<u64>,
}

impl From<GenerateArgs> for TrafficLogConfig {
    fn from(args: GenerateArgs) -> Self {
        TrafficLogConfig {
            requests: args.requests,
            unique_objects: args.objects,
            popular_traffic_percent: args.popular_traffic,
            popular_objects_percent: args.popular_objects,
            zipf_exponent: args.zipf,
            // Convert KB to bytes for sizes
            min_size: args.min_size * 1024,
            max_size: args.max_size * 1024,
            files: args.files,
            output_dir: args.output,
            seed: args.seed,
        }
    }
}
