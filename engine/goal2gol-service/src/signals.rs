//! Signal handling for graceful shutdown

use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{error, info};

/// Resolve the returned receiver on Ctrl+C, or SIGTERM on unix.
pub fn setup_signal_handlers() -> Result<oneshot::Receiver<()>> {
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let sigterm = Arc::new(AtomicBool::new(false));
    #[cfg(unix)]
    signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&sigterm))
        .context("Failed to register SIGTERM handler")?;

    tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => match result {
                Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown..."),
                Err(e) => {
                    error!("Failed to listen for Ctrl+C: {}", e);
                    wait_for_flag(Arc::clone(&sigterm)).await;
                    info!("Received SIGTERM, initiating graceful shutdown...");
                }
            },
            _ = wait_for_flag(Arc::clone(&sigterm)) => {
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
        }
        let _ = shutdown_tx.send(());
    });

    Ok(shutdown_rx)
}

async fn wait_for_flag(flag: Arc<AtomicBool>) {
    while !flag.load(Ordering::Relaxed) {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}
