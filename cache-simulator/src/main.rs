use cache_simulator::cli::GenerateArgs;
use cache_simulator::generator::TrafficLogGenerator;
use cache_simulator::models::{CacheAlgorithm, CacheMode, SimulationConfig};
use cache_simulator::runner::SimulationRunner;
use cache_simulator::stats::SimulationStats;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cache simulator CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for the CLI
#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay traces through the selected caches
    Simulate {
        /// Directory containing *.csv / *.log trace files
        #[arg(short, long, value_name = "DIR")]
        input: PathBuf,

        /// Cache capacity (number of entries)
        #[arg(short, long, default_value = "10000")]
        capacity: usize,

        /// Algorithms to simulate (lfu, lru, moka)
        /// If not provided, all algorithms will be used
        #[arg(short, long, value_name = "ALGOS", num_args = 1.., value_delimiter = ',')]
        algorithms: Option<Vec<String>>,

        /// Cache mode: sequential, concurrent, or both (default: both)
        #[arg(long, default_value = "both")]
        mode: String,

        /// Number of segments for concurrent caches (default: 16)
        #[arg(long)]
        segments: Option<usize>,

        /// Export results to CSV file
        #[arg(long, value_name = "PATH")]
        output_csv: Option<PathBuf>,
    },

    /// Generate synthetic traces
    Generate(GenerateArgs),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    match args.command {
        Commands::Generate(generate) => {
            TrafficLogGenerator::new(generate.into()).generate()?;
            Ok(())
        }
        Commands::Simulate {
            input,
            capacity,
            algorithms,
            mode,
            segments,
            output_csv,
        } => {
            let config = SimulationConfig {
                input_dir: input,
                capacity,
                algorithms: select_algorithms(algorithms.as_deref()),
                modes: CacheMode::parse_list(&mode).unwrap_or_else(|| {
                    println!("Warning: Unknown mode '{mode}', using 'both'");
                    vec![CacheMode::Sequential, CacheMode::Concurrent]
                }),
                segment_count: segments,
            };
            run_simulation(config, output_csv)
        }
    }
}

/// Determine which algorithms to use
fn select_algorithms(names: Option<&[String]>) -> Vec<CacheAlgorithm> {
    let Some(names) = names.filter(|names| !names.is_empty()) else {
        return CacheAlgorithm::all();
    };

    let mut selected = Vec::new();
    for name in names {
        match CacheAlgorithm::parse(name) {
            Some(algorithm) if !selected.contains(&algorithm) => selected.push(algorithm),
            Some(_) => {}
            None => println!("Warning: Unknown algorithm '{name}', skipping"),
        }
    }
    if selected.is_empty() {
        println!("No valid algorithms selected, using all available algorithms");
        return CacheAlgorithm::all();
    }
    selected
}

/// Run the simulation with the given configuration
fn run_simulation(
    config: SimulationConfig,
    output_csv: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Cache Simulation");
    println!("===============");
    println!("Input directory: {}", config.input_dir.display());
    println!("Cache capacity: {} entries", config.capacity);
    println!(
        "Runs: {:?}",
        config.keys().iter().map(ToString::to_string).collect::<Vec<_>>()
    );
    if let Some(seg) = config.segment_count {
        println!("Concurrent segments: {seg}");
    }
    println!();

    let result = SimulationRunner::new(config).run()?;

    println!("\nSimulation completed in {:.2?}", result.duration);
    println!("Total requests: {}", result.total_requests);
    println!("Unique objects: {}", result.unique_objects);
    println!(
        "Total bytes: {} ({:.2} MB)",
        result.total_bytes,
        result.total_bytes as f64 / (1024.0 * 1024.0)
    );

    if let Some(csv_path) = output_csv {
        SimulationStats::from_result(&result).export_csv(&csv_path)?;
        println!("\nResults exported to: {}", csv_path.display());
    }

    Ok(())
}
