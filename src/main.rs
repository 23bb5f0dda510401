//! Main entry point for the mintwatch alert bot.

use anyhow::Result;
use mintwatch::monitor::{MintPoller, MonitorConfig};
use tracing::{info, Level};

#[tokio::main]
async fn main() -> Result<()> {
    let config = MonitorConfig::from_env()?;

    // Initialize logging
    let level: Level = config.log_level.parse().unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("Starting mintwatch monitor...");
    info!(
        threshold = config.mint_threshold,
        window_seconds = config.window_seconds,
        expiry_horizon_seconds = config.expiry_horizon_seconds,
        poll_delay_ms = config.poll_delay_ms,
        "Configuration loaded"
    );

    let poller = MintPoller::from_config(config)?;

    tokio::select! {
        _ = poller.run() => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Received Ctrl-C, shutting down.");
        }
    }

    Ok(())
}
