use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use cosmewatch::{config, output, pipeline};

#[derive(Parser, Debug)]
#[command(
    name = "cosmewatch",
    about = "Aggregates cosmetics-brand promo feeds into a ranked JSON snapshot"
)]
struct Args {
    /// Path to the brand/source configuration (JSON)
    #[arg(long, value_name = "FILE", default_value = "brands.json")]
    config: PathBuf,

    /// Path the output artifact is written to
    #[arg(long, value_name = "FILE", default_value = "dist/items.json")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    // Configuration failures are fatal before any fetching starts
    let sources = config::load_sources(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let client = reqwest::Client::builder()
        .user_agent(concat!("cosmewatch/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let report = pipeline::run(&client, &sources).await;

    // Output failures are fatal after all processing
    output::write_items(&args.output, &report.items)
        .with_context(|| format!("Failed to write output to {}", args.output.display()))?;

    tracing::info!(
        items = report.items.len(),
        feeds_succeeded = report.feeds_succeeded,
        feeds_attempted = report.feeds_attempted,
        "Aggregation complete"
    );
    println!(
        "Wrote {} items to {} ({}/{} feeds succeeded)",
        report.items.len(),
        args.output.display(),
        report.feeds_succeeded,
        report.feeds_attempted
    );

    Ok(())
}
