use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::config::DuneConfig;
use crate::words::{dedupe_by_stem, TRENDING_WORD_LIMIT};
use crate::{
    normalize_grid, rank_tiers, sample_recommendations, RecommendationPick, TierStanding,
};

pub const RECOMMENDATION_SAMPLE: usize = 4;

/// Read-only client for precomputed Dune query results. Each metric is a
/// scheduled query upstream; this client only fetches the latest results
/// filtered down to a single FID.
#[derive(Clone)]
pub struct DuneClient {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    queries: crate::config::DuneQueries,
}

#[derive(Deserialize)]
struct ResultsEnvelope {
    result: ResultsBody,
}

#[derive(Deserialize)]
struct ResultsBody {
    rows: Vec<Map<String, Value>>,
}

impl DuneClient {
    pub fn from_config(config: &DuneConfig) -> Result<Self, String> {
        if config.api_key.trim().is_empty() {
            return Err("DUNE_API_KEY is not set".to_string());
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            api_base: config.api_base.clone(),
            queries: config.queries.clone(),
        })
    }

    /// 30-day engagement stats: current-period counts plus percentage change
    /// per activity type.
    pub async fn fid_stats(&self, fid: u64) -> Result<Map<String, Value>, String> {
        self.fetch_row(self.queries.fid_stats, "fid", fid).await
    }

    /// Channels the account's followers are most active on.
    pub async fn top_channels(&self, fid: u64) -> Result<Vec<String>, String> {
        let row = self.fetch_row(self.queries.top_channels, "fid", fid).await?;
        let channels = row
            .get("top_10_urls")
            .and_then(Value::as_array)
            .ok_or_else(|| "dune row missing top_10_urls".to_string())?
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
        Ok(channels)
    }

    /// Follower tiers ordered by share of followers, largest first.
    pub async fn follower_tiers(&self, fid: u64) -> Result<Vec<TierStanding>, String> {
        let row = self
            .fetch_row(self.queries.follower_tiers, "fid", fid)
            .await?;
        let counts = row
            .get("tier_name_counts")
            .and_then(Value::as_object)
            .ok_or_else(|| "dune row missing tier_name_counts".to_string())?;
        let empty = Map::new();
        let percentages = row
            .get("tier_name_percentages")
            .and_then(Value::as_object)
            .unwrap_or(&empty);
        Ok(rank_tiers(counts, percentages))
    }

    /// Follower activity per day of week, zero-filled to all 24 hours.
    pub async fn active_hours(&self, fid: u64) -> Result<BTreeMap<String, Vec<u64>>, String> {
        let row = self.fetch_row(self.queries.active_hours, "fid", fid).await?;
        Ok(normalize_grid(&row))
    }

    /// Best-performing cast of the month; the row carries the cast hash.
    pub async fn top_cast(&self, fid: u64) -> Result<Map<String, Value>, String> {
        self.fetch_row(self.queries.top_cast, "fid", fid).await
    }

    /// Trending words among followers, collapsed to one word per stem and
    /// capped at ten.
    pub async fn trending_words(&self, fid: u64) -> Result<Vec<String>, String> {
        let row = self
            .fetch_row(self.queries.trending_words, "fid", fid)
            .await?;
        let words: Vec<String> = row
            .get("words")
            .and_then(Value::as_array)
            .ok_or_else(|| "dune row missing words".to_string())?
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();

        let mut unique = dedupe_by_stem(&words);
        unique.truncate(TRENDING_WORD_LIMIT);
        Ok(unique)
    }

    /// Up to four random category/account pairs from the recommendation row.
    pub async fn recommendations(&self, fid: u64) -> Result<Vec<RecommendationPick>, String> {
        let row = self
            .fetch_row(self.queries.recommendations, "query_fid", fid)
            .await?;
        Ok(sample_recommendations(&row, RECOMMENDATION_SAMPLE))
    }

    /// Fetches the latest results of a query filtered by FID. The filter
    /// guarantees at most one row; that row is returned with the filter
    /// column stripped.
    async fn fetch_row(
        &self,
        query_id: u64,
        filter_key: &str,
        fid: u64,
    ) -> Result<Map<String, Value>, String> {
        let url = format!(
            "{}/api/v1/query/{}/results?filters={}={}",
            self.api_base.trim_end_matches('/'),
            query_id,
            filter_key,
            fid
        );

        let response = self
            .client
            .get(url)
            .header("x-dune-api-key", &self.api_key)
            .send()
            .await
            .map_err(|err| format!("dune request failed: {}", err))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_else(|_| String::new());
            let detail = error_body.trim();
            if detail.is_empty() {
                return Err(format!("dune API error: {}", status));
            }
            return Err(format!("dune API error: {} {}", status, detail));
        }

        let body: ResultsEnvelope = response
            .json()
            .await
            .map_err(|err| format!("dune response parse failed: {}", err))?;

        let mut row = body
            .result
            .rows
            .into_iter()
            .next()
            .ok_or_else(|| format!("dune query {} has no row for fid {}", query_id, fid))?;
        row.remove(filter_key);
        Ok(row)
    }
}
