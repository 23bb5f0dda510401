//! Monitor module - polls mint activity and alerts on newly hot collections.
//!
//! The [`MintPoller`] owns a [`MintTracker`] and drives the
//! [`MintSource`] and [`AlertSink`] collaborators on a fixed delay.

pub mod types;
pub mod config;
pub mod error;
pub mod data_sources;
pub mod notifier;
pub mod tracker;
pub mod formatter;
pub mod poller;

// Re-export main types
pub use types::{
    AlertMessage, Embed, EmbedAuthor, EmbedField, EmbedFooter, EmbedThumbnail,
    MonitorConfig, TickReport, TrackedMint,
};

// Re-export key components
pub use data_sources::{CatchMintApi, MintSource};
pub use error::RequestError;
pub use formatter::{format_alert, format_alert_at};
pub use notifier::{AlertSink, DiscordWebhook};
pub use poller::MintPoller;
pub use tracker::MintTracker;

use std::sync::Arc;

/// Monitor builder for convenient construction with sensible defaults.
pub struct MonitorBuilder {
    config: MonitorConfig,
}

impl MonitorBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: MonitorConfig::default(),
        }
    }

    /// Start from an existing configuration.
    pub fn from_config(config: MonitorConfig) -> Self {
        Self { config }
    }

    /// Set the Discord webhook URL.
    pub fn with_webhook_url(mut self, url: impl Into<String>) -> Self {
        self.config.webhook_url = url.into();
        self
    }

    /// Set the analytics endpoints.
    pub fn with_endpoints(
        mut self,
        mints_url: impl Into<String>,
        contracts_url: impl Into<String>,
    ) -> Self {
        self.config.mints_url = mints_url.into();
        self.config.contracts_url = contracts_url.into();
        self
    }

    /// Set the delay between polls.
    pub fn with_poll_delay_ms(mut self, delay_ms: u64) -> Self {
        self.config.poll_delay_ms = delay_ms;
        self
    }

    /// Set the tracking window shown in alerts.
    pub fn with_window_seconds(mut self, seconds: u64) -> Self {
        self.config.window_seconds = seconds;
        self
    }

    /// Set the qualification threshold.
    pub fn with_mint_threshold(mut self, threshold: u64) -> Self {
        self.config.mint_threshold = threshold;
        self
    }

    /// Set how long an alerted address stays suppressed.
    pub fn with_expiry_horizon(mut self, seconds: u64) -> Self {
        self.config.expiry_horizon_seconds = seconds;
        self
    }

    /// Set the pause between failed deliveries.
    pub fn with_delivery_retry_delay_ms(mut self, delay_ms: u64) -> Self {
        self.config.delivery_retry_delay_ms = delay_ms;
        self
    }

    /// Build the monitor configuration.
    pub fn build_config(self) -> MonitorConfig {
        self.config
    }

    /// Build a poller over the given collaborators.
    pub fn build(self, source: Arc<dyn MintSource>, sink: Arc<dyn AlertSink>) -> MintPoller {
        MintPoller::new(source, sink, self.config)
    }

    /// Build a poller wired to the HTTP collaborators.
    pub fn build_http(self) -> anyhow::Result<MintPoller> {
        MintPoller::from_config(self.config)
    }
}

impl Default for MonitorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
