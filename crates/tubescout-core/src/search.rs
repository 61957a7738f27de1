//! Main search API
//!
//! Combines the quota-aware client, channel resolution, and engagement
//! filtering into one search run:
//! listing pages → truncate → detail batches → filter.

use std::sync::Arc;

use chrono::{DateTime, Months, SecondsFormat, Utc};
use tracing::{debug, info, warn};

use crate::client::{RetryPolicy, YouTubeClient};
use crate::cooldown::CooldownStatus;
use crate::duration::parse_duration;
use crate::error::{ApiError, Result};
use crate::resolver::ChannelResolver;
use crate::response::{SearchListResponse, VideoItem, VideoListResponse};
use crate::store::KeyValueStore;
use crate::types::{Format, Mode, SearchCriteria, VideoRecord};
use crate::url::build_watch_url;

/// Tuning of the listing and detail phases
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Quota retries per listing page (default: 2)
    pub listing_retries: u32,
    /// Quota retries per detail batch (default: 1)
    pub detail_retries: u32,
    /// `maxResults` per listing page (default: 10)
    pub page_size: u32,
    /// Hard cap on listing pages per run (default: 10)
    pub max_pages: usize,
    /// IDs per detail request; the API accepts at most 50 (default: 50)
    pub detail_batch_size: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            listing_retries: 2,
            detail_retries: 1,
            page_size: 10,
            max_pages: 10,
            detail_batch_size: 50,
        }
    }
}

/// Main search API
///
/// Owns a [`YouTubeClient`] and runs searches one at a time, each as a
/// strictly sequential series of requests.
pub struct TubeScout {
    client: YouTubeClient,
    config: SearchConfig,
}

impl TubeScout {
    /// Create a searcher with default configuration over `store`
    ///
    /// # Errors
    /// Returns `Env` if HTTP client initialization fails
    pub fn new(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let client = YouTubeClient::new(store)?;
        Ok(Self::with_config(client, SearchConfig::default()))
    }

    pub fn with_config(client: YouTubeClient, config: SearchConfig) -> Self {
        Self { client, config }
    }

    pub fn client(&self) -> &YouTubeClient {
        &self.client
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Whether a quota cooldown currently blocks requests
    pub fn cooldown_status(&self) -> CooldownStatus {
        self.client.gate().check_allowed()
    }

    /// Drop the quota cooldown so the next search sends requests again
    pub fn reset_cooldown(&self) {
        info!("quota cooldown reset");
        self.client.gate().reset();
    }

    /// Best-effort API key validity check
    pub async fn check_api_key(&self, api_key: &str) -> bool {
        self.client.probe_key_validity(api_key).await
    }

    /// Run one search
    ///
    /// # Returns
    /// Videos that passed the format, view, and views-per-hour filters, in
    /// the order their IDs were listed. Empty if nothing was listed.
    ///
    /// # Errors
    /// - `MissingApiKey` if `criteria.api_key` is blank
    /// - `CooldownActive` if a quota cooldown blocks the next request
    /// - Any request error from channel resolution, listing, or details
    ///
    /// # Example
    /// ```no_run
    /// # async fn example() -> tubescout_core::Result<()> {
    /// use std::sync::Arc;
    /// use tubescout_core::{MemoryStore, SearchCriteria, TubeScout};
    /// let scout = TubeScout::new(Arc::new(MemoryStore::new()))?;
    /// let mut criteria = SearchCriteria::keyword("API_KEY", "rust async");
    /// criteria.min_views = 1_000;
    /// for video in scout.run_search(&criteria).await? {
    ///     println!("{} ({} views): {}", video.title, video.views, video.url);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run_search(&self, criteria: &SearchCriteria) -> Result<Vec<VideoRecord>> {
        let api_key = criteria.api_key.trim();
        if api_key.is_empty() {
            return Err(ApiError::MissingApiKey);
        }

        let now = self.client.clock().now();
        let published_after = published_after(now, criteria.months);

        let channel_id = match (criteria.mode, non_blank(criteria.channel_handle.as_deref())) {
            (Mode::Channel, Some(handle)) => {
                let resolved = ChannelResolver::new(&self.client)
                    .resolve_channel_id(api_key, handle, criteria.wait_minutes_on_quota)
                    .await?;
                if resolved.is_none() {
                    warn!(handle, "channel not found, searching without channel filter");
                }
                resolved
            }
            _ => None,
        };

        let mut ids = self
            .list_video_ids(criteria, api_key, channel_id.as_deref(), &published_after)
            .await?;
        ids.truncate(criteria.target_limit());

        if ids.is_empty() {
            info!("search finished without candidates");
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        let policy = RetryPolicy::new(self.config.detail_retries, criteria.wait_minutes_on_quota);

        for (index, batch) in detail_batches(&ids, self.config.detail_batch_size).enumerate() {
            let joined = batch.join(",");
            let url = self.client.endpoint(
                "/videos",
                &[
                    ("key", api_key),
                    ("part", "snippet,contentDetails,statistics"),
                    ("id", joined.as_str()),
                    ("maxResults", "50"),
                ],
            );

            debug!(batch = index + 1, size = batch.len(), "fetching video details");
            let response: VideoListResponse = self.client.fetch_with_quota_retry(&url, policy).await?;

            records.extend(
                response
                    .items
                    .into_iter()
                    .filter_map(|item| to_record(item, criteria, now)),
            );
        }

        info!(
            candidates = ids.len(),
            results = records.len(),
            "search finished"
        );
        Ok(records)
    }

    /// Listing phase: collect candidate video IDs page by page
    async fn list_video_ids(
        &self,
        criteria: &SearchCriteria,
        api_key: &str,
        channel_id: Option<&str>,
        published_after: &str,
    ) -> Result<Vec<String>> {
        let target = criteria.target_limit();
        let page_size = self.config.page_size.to_string();
        let policy = RetryPolicy::new(self.config.listing_retries, criteria.wait_minutes_on_quota);

        let mut params: Vec<(&str, &str)> = vec![
            ("key", api_key),
            ("part", "snippet"),
            ("type", "video"),
            ("maxResults", page_size.as_str()),
            ("regionCode", criteria.region_code()),
            ("relevanceLanguage", criteria.relevance_language()),
            ("publishedAfter", published_after),
        ];
        match criteria.mode {
            Mode::Keyword => {
                if let Some(keyword) = non_blank(criteria.keyword.as_deref()) {
                    params.push(("q", keyword));
                }
            }
            Mode::Channel => {
                if let Some(channel_id) = channel_id {
                    params.push(("channelId", channel_id));
                }
            }
        }

        let mut collected: Vec<String> = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0;

        while collected.len() < target && pages < self.config.max_pages {
            let url = {
                let mut page_params = params.clone();
                if let Some(token) = page_token.as_deref() {
                    page_params.push(("pageToken", token));
                }
                self.client.endpoint("/search", &page_params)
            };

            pages += 1;
            let page: SearchListResponse = self.client.fetch_with_quota_retry(&url, policy).await?;
            let next = page.next_page().map(str::to_string);

            collected.extend(page.items.into_iter().filter_map(|item| item.id.video_id));
            debug!(page = pages, collected = collected.len(), target, "listing page received");

            match next {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        if pages >= self.config.max_pages && collected.len() < target {
            debug!(pages, "listing stopped at page cap");
        }

        Ok(collected)
    }
}

/// Lower bound for `publishedAfter`: `months` (at least 1) before `now`
///
/// Windows reaching past the Unix epoch start at the epoch.
pub fn published_after(now: DateTime<Utc>, months: u32) -> String {
    let epoch = DateTime::<Utc>::UNIX_EPOCH;
    let since = now
        .checked_sub_months(Months::new(months.max(1)))
        .map_or(epoch, |since| since.max(epoch));
    since.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Split IDs into request-sized batches, preserving order
pub fn detail_batches(ids: &[String], batch_size: usize) -> std::slice::Chunks<'_, String> {
    ids.chunks(batch_size.max(1))
}

/// Format, minimum views, then minimum views-per-hour
pub fn passes_filters(
    criteria: &SearchCriteria,
    duration_sec: u64,
    views: u64,
    views_per_hour: f64,
) -> bool {
    let is_short = duration_sec <= criteria.shorts_threshold_sec;
    match criteria.format {
        Format::Shorts if !is_short => return false,
        Format::Longform if is_short => return false,
        _ => {}
    }

    views >= criteria.min_views && views_per_hour >= criteria.min_views_per_hour
}

/// Views divided by hours since publication, with at least one hour
pub fn views_per_hour(views: u64, published_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let age_hours = (now - published_at).num_milliseconds() as f64 / 3_600_000.0;
    views as f64 / age_hours.max(1.0)
}

fn to_record(item: VideoItem, criteria: &SearchCriteria, now: DateTime<Utc>) -> Option<VideoRecord> {
    let published_at = match item
        .snippet
        .published_at
        .as_deref()
        .map(DateTime::parse_from_rfc3339)
    {
        Some(Ok(at)) => at.with_timezone(&Utc),
        _ => {
            debug!(id = %item.id, "skipping video without a valid publish time");
            return None;
        }
    };

    let duration_sec = parse_duration(&item.content_details.duration);
    let views = item.statistics.view_count;
    let vph = views_per_hour(views, published_at, now);

    if !passes_filters(criteria, duration_sec, views, vph) {
        return None;
    }

    Some(VideoRecord {
        url: build_watch_url(&item.id),
        id: item.id,
        title: item.snippet.title,
        channel_title: item.snippet.channel_title,
        published_at,
        views,
        duration_sec,
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
