//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Refract: dataset profiling and chart recommendation
#[derive(Parser)]
#[command(name = "refract")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the profile index for a data file
    Index {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path for the index (default: <file>.index.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Sample size drawn from the source [1000, 100000]
        #[arg(long, default_value = "10000")]
        sample_rows: usize,

        /// Association edges retained per column [1, 20]
        #[arg(long, default_value = "5")]
        top_k_edges: usize,

        /// Skip string pattern detection
        #[arg(long)]
        no_patterns: bool,

        /// Skip numeric histograms
        #[arg(long)]
        no_distributions: bool,
    },

    /// Build (or reuse) the index and print ranked chart recommendations
    Recommend {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Maximum recommendations to print
        #[arg(short, long, default_value = "12")]
        limit: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the stored index status for a data file
    Status {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
