//! Main entry point for the bike-sharing dashboard.

use anyhow::{Context, Result};
use bikeshare_common::init_logging;
use bikeshare_config::ConfigLoader;
use bikeshare_dashboard::{Dashboard, OutputWriter, Session};
use clap::Parser;
use std::path::PathBuf;
use tokio::io::{stdin, stdout, BufReader};
use tracing::{error, info};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dataset CSV path, overriding the configuration
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    /// Write the initial view and exit instead of reading commands
    #[arg(long)]
    once: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => ConfigLoader::load().context("Failed to load configuration")?,
    };
    if let Some(dataset) = args.dataset {
        config.data.dataset_path = dataset;
    }

    init_logging(&config.logging.to_logging_config()).context("Failed to initialize logging")?;
    info!("Starting bike-sharing dashboard");

    let dashboard = match Dashboard::from_config(&config) {
        Ok(dashboard) => dashboard,
        Err(e) => {
            error!("Dashboard failed to start: {}", e);
            return Err(e).context("Failed to start dashboard");
        }
    };
    let writer = OutputWriter::from_config(&config, dashboard.renderer().clone());
    let session = Session::new(&dashboard, &writer);

    let status = session
        .select(dashboard.initial_range())
        .await
        .context("Failed to write the initial view")?;
    println!("{status}");

    if args.once {
        return Ok(());
    }

    let stats = session.run(BufReader::new(stdin()), stdout()).await?;
    info!(
        rendered = stats.rendered,
        errors = stats.errors,
        cache_hit_rate = dashboard.cache_stats().hit_rate(),
        "Dashboard stopped"
    );
    Ok(())
}
