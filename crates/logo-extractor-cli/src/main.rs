//! Batch entry point for the logo extractor.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use logo_extractor::config::{DEFAULT_COLUMN, DEFAULT_OUTPUT_DIR};
use logo_extractor::{BatchSummary, ExtractorConfig};

#[derive(Parser)]
#[command(
    name = "logo-extractor",
    about = "Download a logo for every website listed in a Parquet file",
    version
)]
struct Cli {
    /// Parquet file listing the websites.
    input: PathBuf,

    /// Column holding the website names.
    #[arg(default_value = DEFAULT_COLUMN)]
    column: String,

    /// Directory the logos are written to.
    #[arg(default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting logo extraction from {}", cli.input.display());
    tracing::info!("Output folder: {}", cli.output_dir.display());
    tracing::info!("Column name: {}", cli.column);

    let config = ExtractorConfig::default();
    if let Some(summary) = extract(&cli, &config).await {
        tracing::info!(
            "Logo extraction complete: {} downloaded, {} failed",
            summary.downloaded,
            summary.failed()
        );
    }
    Ok(())
}

/// Run the batch, logging a source failure instead of failing the process.
///
/// Only argument errors produce a nonzero exit status.
async fn extract(cli: &Cli, config: &ExtractorConfig) -> Option<BatchSummary> {
    match load_and_run(cli, config).await {
        Ok(summary) => Some(summary),
        Err(e) => {
            tracing::error!("{e:#}");
            None
        }
    }
}

async fn load_and_run(cli: &Cli, config: &ExtractorConfig) -> anyhow::Result<BatchSummary> {
    logo_extractor::run(&cli.input, &cli.output_dir, &cli.column, config)
        .await
        .with_context(|| format!("Logo extraction from {} failed", cli.input.display()))
}
