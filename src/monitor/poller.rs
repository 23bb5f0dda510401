//! MintPoller - the long-running poll loop
//!
//! Each tick evicts stale tracking entries, fetches a snapshot of active mints,
//! lets the [`MintTracker`] pick the newly qualifying ones and alerts each of
//! them in turn. Mints are processed one at a time and an alert is delivered
//! before the next one is looked at.

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::Client;
use tokio::time::sleep;
use tokio_retry::{strategy::FixedInterval, Retry};
use tracing::{debug, error, info, warn};

use crate::monitor::data_sources::{CatchMintApi, MintSource};
use crate::monitor::error::RequestError;
use crate::monitor::formatter::format_alert;
use crate::monitor::notifier::{AlertSink, DiscordWebhook};
use crate::monitor::tracker::MintTracker;
use crate::monitor::types::{AlertMessage, MonitorConfig, TickReport};
use crate::types::MintSnapshot;

/// Drives fetch, filter, format and notify on a fixed delay.
pub struct MintPoller {
    source: Arc<dyn MintSource>,
    sink: Arc<dyn AlertSink>,
    tracker: MintTracker,
    config: MonitorConfig,
}

impl MintPoller {
    /// Create a poller over explicit collaborators.
    pub fn new(
        source: Arc<dyn MintSource>,
        sink: Arc<dyn AlertSink>,
        config: MonitorConfig,
    ) -> Self {
        Self {
            source,
            sink,
            tracker: MintTracker::new(config.expiry_horizon_seconds),
            config,
        }
    }

    /// Create a poller wired to the CatchMint API and a Discord webhook.
    pub fn from_config(config: MonitorConfig) -> Result<Self> {
        config.validate()?;

        let http_client = Client::builder()
            .user_agent(concat!("mintwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        let source = CatchMintApi::new(
            http_client.clone(),
            config.mints_url.clone(),
            config.contracts_url.clone(),
        );
        let sink = DiscordWebhook::new(http_client, config.webhook_url.clone());

        Ok(Self::new(Arc::new(source), Arc::new(sink), config))
    }

    /// Main execution loop. Never returns; stop it by dropping the future.
    pub async fn run(mut self) {
        info!(
            "MintPoller is running. Threshold {} mints per {}s, polling every {}ms.",
            self.config.mint_threshold, self.config.window_seconds, self.config.poll_delay_ms
        );

        loop {
            let report = self.tick().await;
            debug!(?report, tracked = self.tracker.len(), "Tick complete");

            sleep(self.config.poll_delay()).await;
        }
    }

    /// Run one cycle against the wall clock.
    pub async fn tick(&mut self) -> TickReport {
        self.tick_at(unix_now()).await
    }

    /// Run one cycle with `now` as the current Unix time in seconds.
    pub async fn tick_at(&mut self, now: u64) -> TickReport {
        let mut report = TickReport {
            evicted: self.tracker.evict_expired(now),
            ..Default::default()
        };

        let snapshots = match self.source.fetch_snapshots(self.config.window_seconds).await {
            Ok(snapshots) => snapshots,
            Err(e) => {
                warn!("Failed to get mints: {}", e);
                report.fetch_failed = true;
                return report;
            }
        };
        report.fetched = snapshots.len();

        let qualifying = self
            .tracker
            .evaluate(snapshots, self.config.mint_threshold, now);
        report.qualified = qualifying.len();

        for snapshot in &qualifying {
            if self.alert(snapshot).await {
                report.delivered += 1;
            } else {
                report.metadata_failures += 1;
            }
        }

        report
    }

    /// Enrich, format and deliver one qualifying mint. Returns false if the alert was abandoned.
    async fn alert(&self, snapshot: &MintSnapshot) -> bool {
        let metadata = match self.source.fetch_metadata(&snapshot.address).await {
            Ok(metadata) => metadata,
            Err(e) => {
                error!(address = %snapshot.address, "Failed to fetch mint metadata: {}", e);
                return false;
            }
        };

        let message = format_alert(snapshot, &metadata, self.config.window_seconds);
        let attempts = self.deliver_until_success(&message).await;

        info!(
            address = %snapshot.address,
            attempts,
            "Alert sent for {}",
            snapshot.display_name()
        );
        true
    }

    /// Deliver `message`, retrying on a fixed interval until the sink accepts it.
    async fn deliver_until_success(&self, message: &AlertMessage) -> u64 {
        let sink = &self.sink;
        let mut attempt = 0u64;

        let result: Result<(), RequestError> = Retry::spawn(
            FixedInterval::new(self.config.delivery_retry_delay()),
            || {
                attempt += 1;
                let current = attempt;
                async move {
                    sink.deliver(message).await.map_err(|e| {
                        warn!(attempt = current, "Failed to send webhook: {}", e);
                        e
                    })
                }
            },
        )
        .await;

        // FixedInterval is unbounded; an Err here means the strategy changed.
        if let Err(e) = result {
            error!("Gave up delivering alert: {}", e);
        }

        attempt
    }

    pub fn tracker(&self) -> &MintTracker {
        &self.tracker
    }
}

/// Current Unix time in whole seconds.
pub fn unix_now() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default()
}
