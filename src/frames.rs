use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::{capitalize, format_change, format_quantity, TierStanding};

pub const CONTINUE_LABEL: &str = "Continue";

const STAT_TYPES: [&str; 6] = [
    "casts",
    "replies",
    "followers",
    "likes",
    "recasts",
    "mentions",
];

const DAY_ORDER: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// The linear screen sequence. Every screen advances to at most one
/// successor; there is no backward navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    ThirtyDayStats,
    ActiveHours,
    ActiveChannels,
    FollowerTiers,
    TopCast,
    TrendingWords,
}

impl Screen {
    pub fn from_path(value: &str) -> Option<Self> {
        match value {
            "stats" => Some(Screen::ThirtyDayStats),
            "active-hours" => Some(Screen::ActiveHours),
            "channels" => Some(Screen::ActiveChannels),
            "tiers" => Some(Screen::FollowerTiers),
            "top-cast" => Some(Screen::TopCast),
            "words" => Some(Screen::TrendingWords),
            _ => None,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Screen::Home => "",
            Screen::ThirtyDayStats => "stats",
            Screen::ActiveHours => "active-hours",
            Screen::ActiveChannels => "channels",
            Screen::FollowerTiers => "tiers",
            Screen::TopCast => "top-cast",
            Screen::TrendingWords => "words",
        }
    }

    pub fn next(self) -> Option<Screen> {
        match self {
            Screen::Home => Some(Screen::ThirtyDayStats),
            Screen::ThirtyDayStats => Some(Screen::ActiveHours),
            Screen::ActiveHours => Some(Screen::ActiveChannels),
            Screen::ActiveChannels => Some(Screen::FollowerTiers),
            Screen::FollowerTiers => Some(Screen::TopCast),
            Screen::TopCast => Some(Screen::TrendingWords),
            Screen::TrendingWords => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Screen::Home => "Cast Sense: get a pulse on your Farcaster activity",
            Screen::ThirtyDayStats => "Your Farcaster activity trends over the last 30 days",
            Screen::ActiveHours => {
                "Your followers are most active on these days and hours of the week"
            }
            Screen::ActiveChannels => "Your followers are most active on these channels",
            Screen::FollowerTiers => "Your followers segmented by tiers",
            Screen::TopCast => "Top cast of the month",
            Screen::TrendingWords => "Trending words among your followers in the past week",
        }
    }
}

/// Inbound frame interaction payload. `trusted_data` carries the signed
/// message; everything under `untrusted_data` is client-asserted only.
#[derive(Debug, Deserialize)]
pub struct FramePayload {
    #[serde(rename = "untrustedData")]
    pub untrusted_data: Option<UntrustedData>,
    #[serde(rename = "trustedData")]
    pub trusted_data: Option<TrustedData>,
}

#[derive(Debug, Deserialize)]
pub struct UntrustedData {
    pub fid: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct TrustedData {
    #[serde(rename = "messageBytes")]
    pub message_bytes: String,
}

/// Text handed to the external image renderer for one screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenContent {
    pub title: String,
    pub lines: Vec<String>,
}

impl ScreenContent {
    pub fn titled(screen: Screen) -> Self {
        Self {
            title: screen.title().to_string(),
            lines: Vec::new(),
        }
    }

    /// Shell shown on initial loads and unverified interactions, where no
    /// FID is available to query for.
    pub fn placeholder(screen: Screen) -> Self {
        Self {
            title: screen.title().to_string(),
            lines: vec!["Open this frame from a cast to see your stats".to_string()],
        }
    }
}

pub fn stats_lines(row: &Map<String, Value>) -> Vec<String> {
    STAT_TYPES
        .iter()
        .map(|stat| {
            let current = row
                .get(&format!("current_period_{}", stat))
                .and_then(Value::as_f64)
                .unwrap_or(0.0);
            let change = row
                .get(&format!("{}_percentage_change", stat))
                .and_then(Value::as_f64)
                .unwrap_or(0.0);
            format!(
                "{} {} {}",
                capitalize(stat),
                format_quantity(current),
                format_change(change)
            )
        })
        .collect()
}

/// One line per present day, in week order, naming the busiest hour.
pub fn hours_lines(grid: &BTreeMap<String, Vec<u64>>) -> Vec<String> {
    DAY_ORDER
        .iter()
        .filter_map(|day| {
            let hours = grid.get(*day)?;
            let (peak_hour, peak_count) = hours
                .iter()
                .enumerate()
                .max_by_key(|(_, count)| **count)
                .unwrap_or((0, &0));
            let label = capitalize(&day[..3.min(day.len())]);
            Some(format!("{} busiest at {:02}:00 ({})", label, peak_hour, peak_count))
        })
        .collect()
}

pub fn tier_lines(tiers: &[TierStanding]) -> Vec<String> {
    tiers
        .iter()
        .map(|tier| {
            format!(
                "{}: {}% ({})",
                tier.name,
                format_quantity(tier.percentage),
                tier.count
            )
        })
        .collect()
}

pub fn frame_image_url(image_base: &str, content: &ScreenContent) -> String {
    format!(
        "{}?title={}&lines={}",
        image_base.trim_end_matches('/'),
        urlencoding::encode(&content.title),
        urlencoding::encode(&content.lines.join("\n"))
    )
}

pub fn cast_image_url(cast_image_base: &str, cast_hash: &str) -> String {
    format!(
        "{}?castHash={}",
        cast_image_base.trim_end_matches('/'),
        urlencoding::encode(cast_hash)
    )
}

/// Minimal frame document: the image plus zero or one forward action.
pub fn frame_html(title: &str, image_url: &str, post_url: Option<&str>) -> String {
    let mut meta = String::new();
    meta.push_str("<meta property=\"fc:frame\" content=\"vNext\"/>");
    meta.push_str(&format!(
        "<meta property=\"fc:frame:image\" content=\"{}\"/>",
        escape_attr(image_url)
    ));
    meta.push_str(&format!(
        "<meta property=\"og:image\" content=\"{}\"/>",
        escape_attr(image_url)
    ));
    if let Some(post_url) = post_url {
        meta.push_str(&format!(
            "<meta property=\"fc:frame:button:1\" content=\"{}\"/>",
            CONTINUE_LABEL
        ));
        meta.push_str(&format!(
            "<meta property=\"fc:frame:post_url\" content=\"{}\"/>",
            escape_attr(post_url)
        ));
    }

    format!(
        "<!doctype html><html><head><title>{title}</title>{meta}</head>\
<body><h1>{title}</h1></body></html>",
        title = escape_attr(title),
        meta = meta,
    )
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
