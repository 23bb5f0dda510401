//! Data sources for live mint activity and per-contract metadata.
//!
//! No retries happen here; a failed poll is simply repeated on the next tick.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::monitor::error::RequestError;
use crate::types::{decode_snapshots, CollectionMetadata, MintSnapshot};

/// Upstream provider of mint activity.
#[async_trait]
pub trait MintSource: Send + Sync {
    /// Fetch the current list of active mints for a window of `window_seconds`.
    async fn fetch_snapshots(&self, window_seconds: u64) -> Result<Vec<MintSnapshot>, RequestError>;

    /// Fetch enrichment metadata for one contract.
    async fn fetch_metadata(&self, address: &str) -> Result<CollectionMetadata, RequestError>;
}

/// HTTP client for the CatchMint analytics API.
pub struct CatchMintApi {
    http_client: Client,
    mints_url: String,
    contracts_url: String,
}

impl CatchMintApi {
    pub fn new(
        http_client: Client,
        mints_url: impl Into<String>,
        contracts_url: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            mints_url: mints_url.into(),
            contracts_url: contracts_url.into(),
        }
    }

    fn snapshots_url(&self, window_seconds: u64) -> String {
        format!(
            "{}/?window={}",
            self.mints_url.trim_end_matches('/'),
            window_seconds
        )
    }

    fn metadata_url(&self, address: &str) -> String {
        format!("{}/{}", self.contracts_url.trim_end_matches('/'), address)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, RequestError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|source| RequestError::Transport {
                endpoint: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::status(url, status));
        }

        response.json::<T>().await.map_err(|source| RequestError::Decode {
            endpoint: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl MintSource for CatchMintApi {
    #[instrument(skip(self))]
    async fn fetch_snapshots(&self, window_seconds: u64) -> Result<Vec<MintSnapshot>, RequestError> {
        let url = self.snapshots_url(window_seconds);
        let values: Vec<serde_json::Value> = self.get_json(&url).await?;
        let received = values.len();
        let snapshots = decode_snapshots(values);

        debug!("Fetched {} of {} mint snapshots", snapshots.len(), received);
        Ok(snapshots)
    }

    #[instrument(skip(self))]
    async fn fetch_metadata(&self, address: &str) -> Result<CollectionMetadata, RequestError> {
        let url = self.metadata_url(address);
        let metadata: CollectionMetadata = self.get_json(&url).await?;

        debug!("Fetched metadata: {}", metadata.name.as_deref().unwrap_or(address));
        Ok(metadata)
    }
}
