//! Environment loading for [`MonitorConfig`].

use anyhow::{anyhow, bail, Context, Result};
use std::str::FromStr;
use tracing::debug;

use crate::monitor::types::MonitorConfig;

pub const WEBHOOK_URL_VAR: &str = "DISCORD_WEBHOOK_URL";
pub const MINTS_URL_VAR: &str = "MINTS_API_URL";
pub const CONTRACTS_URL_VAR: &str = "CONTRACTS_API_URL";
pub const POLL_DELAY_VAR: &str = "POLL_DELAY_MS";
pub const WINDOW_VAR: &str = "TRACKING_WINDOW_SECS";
pub const THRESHOLD_VAR: &str = "MINT_THRESHOLD";
pub const EXPIRY_VAR: &str = "EXPIRY_HORIZON_SECS";
pub const RETRY_DELAY_VAR: &str = "DELIVERY_RETRY_DELAY_MS";
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";

impl MonitorConfig {
    /// Load configuration from the process environment, reading `.env` first if one exists.
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e).context("Failed to read .env file"),
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let webhook_url = lookup(WEBHOOK_URL_VAR)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| anyhow!("{} must be set", WEBHOOK_URL_VAR))?;

        let config = Self {
            webhook_url,
            mints_url: lookup(MINTS_URL_VAR).unwrap_or(defaults.mints_url),
            contracts_url: lookup(CONTRACTS_URL_VAR).unwrap_or(defaults.contracts_url),
            poll_delay_ms: parse_or(&lookup, POLL_DELAY_VAR, defaults.poll_delay_ms)?,
            window_seconds: parse_or(&lookup, WINDOW_VAR, defaults.window_seconds)?,
            mint_threshold: parse_or(&lookup, THRESHOLD_VAR, defaults.mint_threshold)?,
            expiry_horizon_seconds: parse_or(&lookup, EXPIRY_VAR, defaults.expiry_horizon_seconds)?,
            delivery_retry_delay_ms: parse_or(
                &lookup,
                RETRY_DELAY_VAR,
                defaults.delivery_retry_delay_ms,
            )?,
            log_level: lookup(LOG_LEVEL_VAR).unwrap_or(defaults.log_level),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the monitor cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.webhook_url.trim().is_empty() {
            bail!("webhook URL is empty");
        }
        if self.mint_threshold == 0 {
            bail!("mint threshold must be at least 1");
        }
        if self.window_seconds == 0 {
            bail!("tracking window must be at least 1 second");
        }
        Ok(())
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}
