//! Sorter PoC - package classification for an automated dispatch pipeline
//!
//! Reads a delimited table of package measurements, classifies every row as
//! STANDARD, SPECIAL, or REJECTED, and writes the table back out with a
//! `classification` column appended.
//!
//! Module structure:
//! - `domain/` - Measurement model and the classification decision rule
//! - `io/` - File interfaces (delimited tables, reject capture)
//! - `services/` - Batch orchestration
//! - `infra/` - Infrastructure (Config, Metrics)

use clap::Parser;
use sorter_poc::infra::{Config, Metrics, OnError};
use sorter_poc::services::BatchRunner;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// Sorter PoC - batch package classification
#[derive(Parser, Debug)]
#[command(name = "sorter-poc", version, about)]
struct Args {
    /// Input table with width,height,length,mass columns
    input: PathBuf,

    /// Output path for the augmented table
    #[arg(short, long, default_value = "sorted_packages.csv")]
    output: PathBuf,

    /// Path to TOML configuration file
    #[arg(short, long, default_value = "config/dev.toml")]
    config: String,

    /// Row failure policy override: skip or abort
    #[arg(long, value_name = "POLICY")]
    on_error: Option<OnError>,
}

fn main() -> anyhow::Result<()> {
    // Initialize structured logging with configurable level via RUST_LOG env var
    // Default: INFO, use RUST_LOG=debug for per-row visibility
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .init();

    info!(git_hash = env!("GIT_HASH"), "sorter-poc starting");

    let args = Args::parse();

    // Load configuration from TOML file; the CLI policy flag wins over it
    let mut config = Config::load_from_path(&args.config);
    if let Some(on_error) = args.on_error {
        config = config.with_on_error(on_error);
    }

    info!(
        config_file = %config.config_file(),
        site_id = %config.site_id(),
        on_error = %config.batch_on_error().as_str(),
        delimiter = %config.batch_delimiter(),
        reject_dir = %config.batch_reject_dir(),
        input = %args.input.display(),
        output = %args.output.display(),
        "config_loaded"
    );

    let metrics = Arc::new(Metrics::new());
    let runner = BatchRunner::new(config, metrics.clone());

    let outcome = runner.run(&args.input, &args.output)?;

    metrics.report().log();
    info!(
        rows_written = outcome.rows_written,
        rows_skipped = outcome.rows_skipped,
        output = %args.output.display(),
        "sorter-poc complete"
    );

    Ok(())
}
