//! Alert formatting - turns a qualifying mint and its metadata into a webhook payload.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::monitor::types::{
    AlertMessage, Embed, EmbedAuthor, EmbedField, EmbedFooter, EmbedThumbnail,
};
use crate::types::{CollectionMetadata, MintSnapshot};

pub const BOT_NAME: &str = "CatchMint - Alerts";
pub const BOT_AVATAR_URL: &str =
    "https://cdn.discordapp.com/attachments/975521142192361514/1025346983621300304/unknown.png";
pub const EMBED_COLOR: u32 = 5_294_200;
pub const AUTHOR_TEXT: &str = "New popular mint detected";
pub const UNKNOWN: &str = "Unknown";
const LINK_SEPARATOR: &str = " | ";

/// Format an alert stamped with the current time.
pub fn format_alert(
    snapshot: &MintSnapshot,
    metadata: &CollectionMetadata,
    window_seconds: u64,
) -> AlertMessage {
    format_alert_at(snapshot, metadata, window_seconds, Utc::now())
}

/// Format an alert stamped with `timestamp`.
pub fn format_alert_at(
    snapshot: &MintSnapshot,
    metadata: &CollectionMetadata,
    window_seconds: u64,
    timestamp: DateTime<Utc>,
) -> AlertMessage {
    let supply = SupplySummary::new(snapshot, metadata);

    let embed = Embed {
        title: title(snapshot, metadata),
        color: EMBED_COLOR,
        url: format!("https://catchmint.xyz/?address={}", snapshot.address),
        description: description(snapshot.total_count, supply.share_of_supply, window_seconds),
        fields: vec![
            EmbedField {
                name: "Total Mints".to_string(),
                value: supply.total_mints,
                inline: true,
            },
            EmbedField {
                name: "Unique Minters".to_string(),
                value: metadata
                    .unique_wallets
                    .filter(|&n| n > 0)
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| UNKNOWN.to_string()),
                inline: true,
            },
            EmbedField {
                name: "Useful Links".to_string(),
                value: useful_links(&snapshot.address, metadata),
                inline: false,
            },
        ],
        footer: EmbedFooter {
            text: BOT_NAME.to_string(),
            icon_url: BOT_AVATAR_URL.to_string(),
        },
        timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        thumbnail: non_empty(&metadata.image_url)
            .or_else(|| non_empty(&snapshot.image_url))
            .map(|url| EmbedThumbnail {
                url: url.to_string(),
            }),
        author: EmbedAuthor {
            name: AUTHOR_TEXT.to_string(),
        },
    };

    AlertMessage {
        content: None,
        embeds: vec![embed],
        username: BOT_NAME.to_string(),
        avatar_url: BOT_AVATAR_URL.to_string(),
        attachments: Vec::new(),
    }
}

fn title(snapshot: &MintSnapshot, metadata: &CollectionMetadata) -> String {
    match non_empty(&metadata.name) {
        Some(name) => name.to_string(),
        None => format!("```{}```", snapshot.address),
    }
}

fn description(total_count: u64, share_of_supply: Option<f64>, window_seconds: u64) -> String {
    match share_of_supply {
        Some(pct) => format!(
            "Has been minted {} times ({}% of total supply) during last {} seconds",
            total_count,
            fixed3(pct),
            window_seconds
        ),
        None => format!(
            "Has been minted {} times during last {} seconds",
            total_count, window_seconds
        ),
    }
}

/// Supply rendering. Zero supplies are treated as unknown.
struct SupplySummary {
    total_mints: String,
    /// Share of max supply minted in this window, percent
    share_of_supply: Option<f64>,
}

impl SupplySummary {
    fn new(snapshot: &MintSnapshot, metadata: &CollectionMetadata) -> Self {
        let max = metadata.max_supply.filter(|&n| n > 0);
        let total = metadata.total_supply.filter(|&n| n > 0);
        let share_of_supply = max.map(|max| percent(snapshot.total_count, max));

        let total_mints = match (total, max) {
            (Some(total), Some(max)) => {
                format!("{} / {} ({}%)", total, max, fixed3(percent(total, max)))
            }
            (Some(total), None) => format!("Total minted - {}", total),
            (None, Some(max)) => format!("Max supply - {}", max),
            (None, None) => UNKNOWN.to_string(),
        };

        Self {
            total_mints,
            share_of_supply,
        }
    }
}

fn percent(part: u64, whole: u64) -> f64 {
    part as f64 * 100.0 / whole as f64
}

/// Three decimals, ties rounded away from zero.
fn fixed3(value: f64) -> String {
    format!("{:.3}", (value * 1000.0).round() / 1000.0)
}

fn useful_links(address: &str, metadata: &CollectionMetadata) -> String {
    let optional = [
        ("Opensea", &metadata.opensea_url),
        ("Discord", &metadata.discord_url),
        ("Website", &metadata.website_url),
        ("Twitter", &metadata.twitter_url),
    ];

    let derived = [
        ("Blur", format!("https://blur.io/collection/{}", address)),
        (
            "Etherscan",
            format!("https://etherscan.io/address/{}#writeContract", address),
        ),
    ];

    optional
        .iter()
        .filter_map(|&(label, url)| non_empty(url).map(|url| markdown_link(label, url)))
        .chain(derived.iter().map(|(label, url)| markdown_link(label, url)))
        .collect::<Vec<_>>()
        .join(LINK_SEPARATOR)
}

fn markdown_link(label: &str, url: &str) -> String {
    format!("[{}]({})", label, url)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn snapshot(count: u64) -> MintSnapshot {
        MintSnapshot::new("0xA", count)
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn format(snapshot: &MintSnapshot, metadata: &CollectionMetadata) -> AlertMessage {
        format_alert_at(snapshot, metadata, 60, fixed_time())
    }

    #[test]
    fn test_full_supply_data() {
        let metadata = CollectionMetadata {
            name: Some("Pixel Cats".to_string()),
            max_supply: Some(1000),
            total_supply: Some(250),
            unique_wallets: Some(87),
            ..Default::default()
        };

        let alert = format(&snapshot(50), &metadata);

        assert_eq!(alert.field("Total Mints"), Some("250 / 1000 (25.000%)"));
        assert_eq!(alert.field("Unique Minters"), Some("87"));
        assert_eq!(
            alert.embeds[0].description,
            "Has been minted 50 times (5.000% of total supply) during last 60 seconds"
        );
        assert_eq!(alert.embeds[0].title, "Pixel Cats");
    }

    #[test]
    fn test_no_supply_data() {
        let alert = format(&snapshot(15), &CollectionMetadata::default());

        assert_eq!(alert.field("Total Mints"), Some("Unknown"));
        assert_eq!(alert.field("Unique Minters"), Some("Unknown"));
        assert_eq!(
            alert.embeds[0].description,
            "Has been minted 15 times during last 60 seconds"
        );
    }

    #[test]
    fn test_percent_ties_round_up() {
        let metadata = CollectionMetadata {
            max_supply: Some(16_000),
            total_supply: Some(10),
            ..Default::default()
        };

        let alert = format(&snapshot(10), &metadata);

        assert_eq!(alert.field("Total Mints"), Some("10 / 16000 (0.063%)"));
        assert_eq!(
            alert.embeds[0].description,
            "Has been minted 10 times (0.063% of total supply) during last 60 seconds"
        );
    }

    #[test]
    fn test_only_total_supply() {
        let metadata = CollectionMetadata {
            total_supply: Some(321),
            ..Default::default()
        };

        let alert = format(&snapshot(15), &metadata);

        assert_eq!(alert.field("Total Mints"), Some("Total minted - 321"));
        assert!(!alert.embeds[0].description.contains("% of total supply"));
    }

    #[test]
    fn test_only_max_supply() {
        let metadata = CollectionMetadata {
            max_supply: Some(3000),
            total_supply: Some(0),
            ..Default::default()
        };

        let alert = format(&snapshot(20), &metadata);

        assert_eq!(alert.field("Total Mints"), Some("Max supply - 3000"));
        assert_eq!(
            alert.embeds[0].description,
            "Has been minted 20 times (0.667% of total supply) during last 60 seconds"
        );
    }

    #[test]
    fn test_title_falls_back_to_address() {
        let metadata = CollectionMetadata {
            name: Some(String::new()),
            ..Default::default()
        };

        let alert = format(&snapshot(15), &metadata);

        assert_eq!(alert.embeds[0].title, "```0xA```");
    }

    #[test]
    fn test_links_keep_fixed_order_and_skip_missing() {
        let metadata = CollectionMetadata {
            opensea_url: Some("https://opensea.io/collection/cats".to_string()),
            website_url: Some("https://cats.xyz".to_string()),
            twitter_url: Some("https://twitter.com/cats".to_string()),
            ..Default::default()
        };

        let alert = format(&snapshot(15), &metadata);

        assert_eq!(
            alert.field("Useful Links"),
            Some(
                "[Opensea](https://opensea.io/collection/cats) | [Website](https://cats.xyz) | \
                 [Twitter](https://twitter.com/cats) | [Blur](https://blur.io/collection/0xA) | \
                 [Etherscan](https://etherscan.io/address/0xA#writeContract)"
            )
        );
    }

    #[test]
    fn test_derived_links_always_present() {
        let alert = format(&snapshot(15), &CollectionMetadata::default());

        assert_eq!(
            alert.field("Useful Links"),
            Some(
                "[Blur](https://blur.io/collection/0xA) | \
                 [Etherscan](https://etherscan.io/address/0xA#writeContract)"
            )
        );
    }

    #[test]
    fn test_payload_shape() {
        let mut snap = snapshot(15);
        snap.image_url = Some("https://img.example/fallback.png".to_string());

        let alert = format(&snap, &CollectionMetadata::default());
        let json = serde_json::to_value(&alert).unwrap();

        assert!(json["content"].is_null());
        assert_eq!(json["username"], BOT_NAME);
        assert_eq!(json["attachments"], serde_json::json!([]));
        assert_eq!(json["embeds"][0]["color"], EMBED_COLOR);
        assert_eq!(json["embeds"][0]["author"]["name"], AUTHOR_TEXT);
        assert_eq!(json["embeds"][0]["url"], "https://catchmint.xyz/?address=0xA");
        assert_eq!(json["embeds"][0]["timestamp"], "2024-03-01T12:00:00.000Z");
        assert_eq!(
            json["embeds"][0]["thumbnail"]["url"],
            "https://img.example/fallback.png"
        );
    }
}
