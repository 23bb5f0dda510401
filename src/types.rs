//! Core wire types for the mint analytics API.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// Contract address, kept opaque.
pub type Address = String;

/// One observed mint from a single poll of the analytics API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MintSnapshot {
    /// Contract address, the dedup key
    pub address: Address,
    /// Display name, if the API knows one
    #[serde(default)]
    pub name: Option<String>,
    /// Mint events observed in the server-side window
    #[serde(rename = "totalCounts", default, deserialize_with = "lenient_count")]
    pub total_count: u64,
    /// Thumbnail reference
    #[serde(rename = "imageURL", default)]
    pub image_url: Option<String>,
    /// Per-minute bucket counts
    #[serde(default, deserialize_with = "lenient_counts")]
    pub counts: Vec<u64>,
}

impl MintSnapshot {
    /// Create a bare snapshot with only an address and a count.
    pub fn new(address: impl Into<Address>, total_count: u64) -> Self {
        Self {
            address: address.into(),
            name: None,
            total_count,
            image_url: None,
            counts: Vec::new(),
        }
    }

    /// Name if present and non-empty, otherwise the address.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.address,
        }
    }
}

/// Decode a snapshot list element by element.
///
/// Elements that are not a snapshot object (no string `address`) are logged
/// and dropped; the rest of the batch is kept.
pub fn decode_snapshots(values: Vec<Value>) -> Vec<MintSnapshot> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<MintSnapshot>(value) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(index, "Skipping malformed mint snapshot: {}", e);
                None
            }
        })
        .collect()
}

/// Numbers, numeric strings and floats become a count; anything else is 0.
fn count_from_value(value: &Value) -> u64 {
    if let Some(n) = value.as_u64() {
        return n;
    }

    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() && n > 0.0 => n as u64,
        _ => 0,
    }
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .map(count_from_value)
        .unwrap_or_default())
}

fn lenient_counts<'de, D>(deserializer: D) -> Result<Vec<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items.iter().map(count_from_value).collect(),
        _ => Vec::new(),
    })
}

/// Per-contract enrichment data returned by the contracts endpoint.
///
/// Every field is optional; the formatter degrades absent values to "Unknown".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollectionMetadata {
    pub address: Option<Address>,
    pub name: Option<String>,
    pub deployer: Option<String>,
    pub deployed_at: Option<String>,
    pub deployment_transaction_hash: Option<String>,
    pub standard: Option<String>,
    pub max_supply: Option<u64>,
    pub total_supply: Option<u64>,
    pub unique_wallets: Option<u64>,
    pub opensea_url: Option<String>,
    pub discord_url: Option<String>,
    pub website_url: Option<String>,
    pub twitter_url: Option<String>,
    pub etherscan_url: Option<String>,
    pub image_url: Option<String>,
    pub first_mint: Option<String>,
    pub last_mint: Option<String>,
    pub is_verified: Option<bool>,
    pub is_proxy: Option<bool>,
    pub flag_count: Option<u64>,
}
