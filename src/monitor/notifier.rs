//! Notification sink - Discord webhook delivery.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::monitor::error::RequestError;
use crate::monitor::types::AlertMessage;

/// Label used in errors and logs instead of the secret webhook URL.
const WEBHOOK_ENDPOINT: &str = "discord webhook";

/// Destination for formatted alerts. One call is one delivery attempt.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn deliver(&self, message: &AlertMessage) -> Result<(), RequestError>;
}

/// Posts alerts to a Discord webhook.
pub struct DiscordWebhook {
    http_client: Client,
    webhook_url: String,
}

impl DiscordWebhook {
    pub fn new(http_client: Client, webhook_url: impl Into<String>) -> Self {
        Self {
            http_client,
            webhook_url: webhook_url.into(),
        }
    }
}

#[async_trait]
impl AlertSink for DiscordWebhook {
    #[instrument(skip_all)]
    async fn deliver(&self, message: &AlertMessage) -> Result<(), RequestError> {
        let response = self
            .http_client
            .post(&self.webhook_url)
            .json(message)
            .send()
            .await
            .map_err(|source| RequestError::Transport {
                endpoint: WEBHOOK_ENDPOINT.to_string(),
                source: source.without_url(),
            })?;

        // Discord answers 204 No Content, or 200 when `?wait=true` is set.
        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::status(WEBHOOK_ENDPOINT, status));
        }

        debug!(status = %status, "Webhook accepted alert");
        Ok(())
    }
}
