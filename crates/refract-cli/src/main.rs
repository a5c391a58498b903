//! Refract CLI - dataset profiling and chart recommendation.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("refract=debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("refract=warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Index {
            file,
            output,
            sample_rows,
            top_k_edges,
            no_patterns,
            no_distributions,
        } => {
            commands::index::run(
                file,
                output,
                sample_rows,
                top_k_edges,
                no_patterns,
                no_distributions,
                cli.verbose,
            )
            .await
        }

        Commands::Recommend { file, limit, json } => {
            commands::recommend::run(file, limit, json, cli.verbose).await
        }

        Commands::Status { file, json } => commands::status::run(file, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
