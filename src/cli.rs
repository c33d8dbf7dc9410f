//! CLI argument parsing for Cerrado

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Rendering of patterns printed to stdout in memory mode
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// One pattern per line in the standard text format (default)
    Text,
    /// JSON document for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "cerrado")]
#[command(version)]
#[command(about = "Closed sequential pattern mining with BIDE+", long_about = None)]
pub struct Cli {
    /// Input sequence database (one sequence per line, -1 ends an itemset,
    /// -2 ends the sequence)
    pub input: PathBuf,

    /// Minimum support as an absolute number of sequences
    #[arg(short = 's', long = "minsup", value_name = "N")]
    pub minsup: usize,

    /// Write patterns to FILE as they are found instead of collecting them
    /// in memory
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format for patterns printed to stdout
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Print a statistics summary (time, pattern count, peak memory)
    #[arg(short = 'c', long = "stats")]
    pub stats: bool,
}
