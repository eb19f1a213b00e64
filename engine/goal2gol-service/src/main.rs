//! Goal2Gol Feed Engine Service
//!
//! Loads configuration, starts the refresh scheduler over every feed and
//! keeps the cache warm until Ctrl+C or SIGTERM.

use anyhow::{Context, Result};
use clap::Parser;
use feed_core::SourceId;
use std::path::PathBuf;
use tracing::info;

use goal2gol_service::config::validate_config;
use goal2gol_service::{
    initialize_logging, load_configuration, setup_signal_handlers, Goal2GolService,
};

#[derive(Parser, Debug)]
#[command(name = "goal2gol", version, about = "Football feed aggregation engine")]
struct Args {
    /// TOML configuration file (defaults to $GOAL2GOL_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured log level
    #[arg(long)]
    log_level: Option<String>,

    /// Validate the configuration, print it and exit
    #[arg(long)]
    check_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = load_configuration(args.config.as_deref())?;
    if let Some(level) = args.log_level {
        config.logging.level = level;
        validate_config(&config)?;
    }

    if args.check_config {
        let mut shown = config.clone();
        for source in SourceId::ALL {
            let endpoint = shown.feeds.endpoint_mut(source);
            if endpoint.auth_value.is_some() {
                endpoint.auth_value = Some("<redacted>".to_string());
            }
        }
        let rendered = toml::to_string_pretty(&shown).context("Failed to render configuration")?;
        println!("{rendered}");
        return Ok(());
    }

    initialize_logging(&config.logging)?;
    info!("Starting Goal2Gol service v{}", env!("CARGO_PKG_VERSION"));

    let service = Goal2GolService::new(config).context("Failed to initialize service")?;
    let shutdown_signal = setup_signal_handlers()?;
    service.start()?;

    info!("Goal2Gol service is running. Press Ctrl+C to shutdown gracefully.");
    let _ = shutdown_signal.await;

    service.shutdown().await;
    Ok(())
}
