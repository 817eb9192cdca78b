use cache_simulator::cli::GenerateArgs;
use cache_simulator::generator::TrafficLogGenerator;
use clap::Parser;

/// Traffic generator for cache simulations
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    generate: GenerateArgs,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    println!("Traffic Generator");
    println!("================");

    let generator = TrafficLogGenerator::new(args.generate.into());
    generator.generate()?;

    Ok(())
}
