//! Core data types for the search client
//!
//! Field names serialize in camelCase so the presentation layer can pass
//! criteria and receive records unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the search is scoped by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    #[default]
    Keyword,
    Channel,
}

/// Short-form / long-form selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Format {
    #[default]
    All,
    Shorts,
    Longform,
}

/// Parameters of one search run
///
/// `keyword` is only read in [`Mode::Keyword`], `channel_handle` only in
/// [`Mode::Channel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchCriteria {
    pub mode: Mode,
    pub keyword: Option<String>,
    pub channel_handle: Option<String>,
    /// Recency window in months; values below 1 count as 1
    pub months: u32,
    pub country: String,
    pub language: String,
    pub per_query_limit: usize,
    pub per_channel_limit: usize,
    pub min_views: u64,
    pub min_views_per_hour: f64,
    pub format: Format,
    /// Videos this long or shorter count as shorts
    pub shorts_threshold_sec: u64,
    /// Backoff and cooldown on quota errors; 0 disables both
    pub wait_minutes_on_quota: u64,
    pub api_key: String,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            mode: Mode::Keyword,
            keyword: None,
            channel_handle: None,
            months: 1,
            country: "KR".to_string(),
            language: "ko".to_string(),
            per_query_limit: 10,
            per_channel_limit: 10,
            min_views: 0,
            min_views_per_hour: 0.0,
            format: Format::All,
            shorts_threshold_sec: 60,
            wait_minutes_on_quota: 0,
            api_key: String::new(),
        }
    }
}

impl SearchCriteria {
    /// Keyword search with default filters
    pub fn keyword(api_key: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self {
            mode: Mode::Keyword,
            keyword: Some(keyword.into()),
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Channel search with default filters
    pub fn channel(api_key: impl Into<String>, handle: impl Into<String>) -> Self {
        Self {
            mode: Mode::Channel,
            channel_handle: Some(handle.into()),
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Result count the listing phase aims for
    pub fn target_limit(&self) -> usize {
        match self.mode {
            Mode::Keyword => self.per_query_limit,
            Mode::Channel => self.per_channel_limit,
        }
    }

    pub fn region_code(&self) -> &str {
        non_blank(&self.country).unwrap_or("KR")
    }

    pub fn relevance_language(&self) -> &str {
        non_blank(&self.language).unwrap_or("ko")
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// A video that passed every filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    pub channel_title: String,
    pub published_at: DateTime<Utc>,
    pub views: u64,
    pub duration_sec: u64,
    /// Watch page URL (`https://www.youtube.com/watch?v={id}`)
    pub url: String,
}
