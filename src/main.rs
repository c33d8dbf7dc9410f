use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cerrado::cli::{Cli, OutputFormat};
use cerrado::json_output::JsonOutput;
use cerrado::loader;
use cerrado::miner::BidePlus;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    let database = loader::load_file(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;

    let miner = BidePlus::new(args.minsup);
    let outcome = miner.run(&database, args.output.as_deref())?;

    if let Some(patterns) = &outcome.patterns {
        match args.format {
            OutputFormat::Text => {
                for pattern in patterns.iter() {
                    println!("{pattern}");
                }
            }
            OutputFormat::Json => {
                let json = JsonOutput::from_patterns(
                    patterns,
                    args.minsup,
                    database.len(),
                    outcome.stats.elapsed,
                );
                println!("{}", json.to_json()?);
            }
        }
    }

    if args.stats {
        outcome.stats.print_summary();
    }

    Ok(())
}
