pub mod config;
pub mod dune;
pub mod frames;
pub mod neynar;
pub mod openai;
pub mod server;
pub mod words;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub const HOURS_PER_DAY: usize = 24;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierStanding {
    pub name: String,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationPick {
    pub category: String,
    pub pick: Value,
}

/// Merges the per-tier count and percentage columns and orders tiers by
/// percentage, highest first. Missing percentages count as zero; equal
/// percentages keep their incoming order (the sort is stable).
pub fn rank_tiers(
    counts: &Map<String, Value>,
    percentages: &Map<String, Value>,
) -> Vec<TierStanding> {
    let mut standings: Vec<TierStanding> = counts
        .iter()
        .map(|(name, count)| TierStanding {
            name: name.clone(),
            count: value_as_count(count),
            percentage: percentages
                .get(name)
                .and_then(Value::as_f64)
                .unwrap_or(0.0),
        })
        .collect();

    standings.sort_by(|a, b| {
        b.percentage
            .partial_cmp(&a.percentage)
            .unwrap_or(Ordering::Equal)
    });
    standings
}

/// Expands each day column of the active-hours row into all 24 hour buckets.
/// Hours absent or null in the source become 0. Days not present in the row
/// are not invented.
pub fn normalize_grid(row: &Map<String, Value>) -> BTreeMap<String, Vec<u64>> {
    let mut grid = BTreeMap::new();

    for (key, value) in row {
        let day = key.strip_suffix("_hourly_counts").unwrap_or(key);
        let hours_raw = value.as_object();

        let mut hours = Vec::with_capacity(HOURS_PER_DAY);
        for hour in 0..HOURS_PER_DAY {
            let count = hours_raw
                .and_then(|map| map.get(&hour.to_string()))
                .map(value_as_count)
                .unwrap_or(0);
            hours.push(count);
        }
        grid.insert(day.to_string(), hours);
    }

    grid
}

/// Picks up to `limit` random category/value pairs, never repeating a
/// category. Categories whose value is not a non-empty array are skipped.
/// Deliberately unseeded; every call may return a different sample.
pub fn sample_recommendations(
    categories: &Map<String, Value>,
    limit: usize,
) -> Vec<RecommendationPick> {
    let mut rng = rand::thread_rng();
    let mut keys: Vec<&String> = categories.keys().collect();
    keys.shuffle(&mut rng);

    let mut picks = Vec::new();
    for key in keys {
        if picks.len() == limit {
            break;
        }
        let options = match categories.get(key).and_then(Value::as_array) {
            Some(options) => options,
            None => continue,
        };
        if let Some(choice) = options.choose(&mut rng) {
            picks.push(RecommendationPick {
                category: key.clone(),
                pick: choice.clone(),
            });
        }
    }

    picks
}

fn value_as_count(value: &Value) -> u64 {
    value
        .as_u64()
        .or_else(|| value.as_f64().map(|number| number.max(0.0) as u64))
        .unwrap_or(0)
}

pub fn format_change(value: f64) -> String {
    let arrow = if value < 0.0 { "↓" } else { "↑" };
    format!("{}{}%", arrow, value.abs().round() as i64)
}

pub fn format_quantity(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{}", value.round() as i64)
    } else {
        format!("{:.1}", value)
    }
}

pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
