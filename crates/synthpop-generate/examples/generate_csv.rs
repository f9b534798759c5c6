use std::path::PathBuf;

use synthpop_core::GenerationConfig;
use synthpop_generate::{GenerationEngine, write_customers_csv};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = std::env::args().skip(1);
    let count = args.next().map(|value| value.parse::<usize>()).transpose()?.unwrap_or(1_000);
    let seed = args.next().map(|value| value.parse::<u64>()).transpose()?.unwrap_or(42);
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("customers.csv"));

    let result = GenerationEngine::new(GenerationConfig::with_population(count, seed)).run()?;
    for entry in result.allocation.counts() {
        println!("{:<22} {}", entry.segment, entry.count);
    }
    let summary = write_customers_csv(&output, &result.records)?;
    println!("wrote {} rows to {}", summary.rows, output.display());
    Ok(())
}
