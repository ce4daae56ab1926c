//! Schema enrichment tool.
//!
//! This binary reads profiled column metadata from a legacy schema and
//! produces business-ready names, descriptions and migration guidance for a
//! cloud target, using an Ollama-compatible model endpoint.
//!
//! # Guarantees
//! - Every input column appears in the output, in input order
//! - Model failures degrade to deterministic heuristics
//! - Model calls are made one at a time

use anyhow::Context;
use clap::Parser;
use schemalift::{Cli, execute_cli};
use schemalift_core::{init_logging, initialize_response_validator};
use tracing::error;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.global.verbose, cli.global.quiet)?;

    // Initialize the response shape validator
    initialize_response_validator().context("Failed to initialize response validator")?;

    let output = execute_cli(&cli).await.map_err(|e| {
        error!("{}", e);
        e
    })?;

    if !cli.global.quiet || !output.success {
        println!("{}", output.text);
    }

    if !output.success {
        std::process::exit(1);
    }

    Ok(())
}
