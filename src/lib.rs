//! mintwatch - NFT mint velocity alerts
//!
//! Polls a mint analytics API, picks out collections whose mint count crosses
//! a threshold and posts each one to a Discord webhook once per expiry horizon.

pub mod types;
pub mod monitor;

// Re-export main types for convenience
pub use types::{CollectionMetadata, MintSnapshot};
