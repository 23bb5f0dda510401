//! Configuration, tracking and payload types for the mint monitor.

use crate::types::Address;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default analytics endpoint for the live mint list.
pub const DEFAULT_MINTS_URL: &str = "https://api.catchmint.xyz/mints";
/// Default analytics endpoint for per-contract metadata.
pub const DEFAULT_CONTRACTS_URL: &str = "https://api.catchmint.xyz/contracts";

/// Monitor configuration. The webhook URL is secret and is never serialized or logged.
#[derive(Clone)]
pub struct MonitorConfig {
    /// Discord webhook URL (secret)
    pub webhook_url: String,
    /// Live mint list endpoint
    pub mints_url: String,
    /// Contract metadata endpoint, the address is appended as a path segment
    pub contracts_url: String,
    /// Delay between polls in milliseconds
    pub poll_delay_ms: u64,
    /// Tracking window in seconds, sent as the `window` query parameter and shown in alerts
    pub window_seconds: u64,
    /// Minimum mint count in the window for a collection to qualify
    pub mint_threshold: u64,
    /// Seconds after which an alerted address may alert again
    pub expiry_horizon_seconds: u64,
    /// Pause between failed webhook deliveries in milliseconds
    pub delivery_retry_delay_ms: u64,
    /// Maximum log level
    pub log_level: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            mints_url: DEFAULT_MINTS_URL.to_string(),
            contracts_url: DEFAULT_CONTRACTS_URL.to_string(),
            poll_delay_ms: 1000,
            window_seconds: 60,
            mint_threshold: 10,
            expiry_horizon_seconds: 250,
            delivery_retry_delay_ms: 0,
            log_level: "info".to_string(),
        }
    }
}

impl std::fmt::Debug for MonitorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorConfig")
            .field("webhook_url", &"<redacted>")
            .field("mints_url", &self.mints_url)
            .field("contracts_url", &self.contracts_url)
            .field("poll_delay_ms", &self.poll_delay_ms)
            .field("window_seconds", &self.window_seconds)
            .field("mint_threshold", &self.mint_threshold)
            .field("expiry_horizon_seconds", &self.expiry_horizon_seconds)
            .field("delivery_retry_delay_ms", &self.delivery_retry_delay_ms)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl MonitorConfig {
    pub fn poll_delay(&self) -> Duration {
        Duration::from_millis(self.poll_delay_ms)
    }

    pub fn delivery_retry_delay(&self) -> Duration {
        Duration::from_millis(self.delivery_retry_delay_ms)
    }
}

/// An address that has already been alerted and is suppressed until it expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedMint {
    pub address: Address,
    /// Unix seconds at which the address first qualified
    pub first_seen_at: u64,
}

impl TrackedMint {
    pub fn new(address: Address, first_seen_at: u64) -> Self {
        Self {
            address,
            first_seen_at,
        }
    }

    /// Seconds since the entry was created. Clock skew backwards reads as zero.
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.first_seen_at)
    }

    pub fn is_expired(&self, now: u64, horizon_seconds: u64) -> bool {
        self.age(now) > horizon_seconds
    }
}

/// Discord webhook payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertMessage {
    pub content: Option<String>,
    pub embeds: Vec<Embed>,
    pub username: String,
    pub avatar_url: String,
    pub attachments: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub color: u32,
    pub url: String,
    pub description: String,
    pub fields: Vec<EmbedField>,
    pub footer: EmbedFooter,
    /// RFC 3339
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<EmbedThumbnail>,
    pub author: EmbedAuthor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedFooter {
    pub text: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedThumbnail {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedAuthor {
    pub name: String,
}

impl AlertMessage {
    /// Look up an embed field value by name on the first embed.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.embeds
            .first()?
            .fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }
}

/// Summary of a single poll cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Tracked entries evicted at the start of the tick
    pub evicted: usize,
    /// Whether the snapshot fetch failed
    pub fetch_failed: bool,
    /// Snapshots returned by the source
    pub fetched: usize,
    /// Snapshots that newly qualified
    pub qualified: usize,
    /// Alerts delivered to the sink
    pub delivered: usize,
    /// Qualifying mints dropped because metadata could not be fetched
    pub metadata_failures: usize,
}
