//! TubeScout Core Library
//!
//! Quota-aware search over the YouTube Data API v3.
//!
//! # Overview
//!
//! This crate turns search criteria into a filtered list of videos:
//! - Paginated listing with a hard page cap
//! - Detail lookups in batches of 50
//! - Format, view-count, and views-per-hour filters
//! - A persisted quota cooldown that blocks requests after the API reports
//!   quota exhaustion, plus fixed-wait retries
//! - Channel handle resolution with a search fallback
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tubescout_core::{Format, MemoryStore, Result, SearchCriteria, TubeScout};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let scout = TubeScout::new(Arc::new(MemoryStore::new()))?;
//!
//!     let mut criteria = SearchCriteria::channel("API_KEY", "@GoogleDevelopers");
//!     criteria.months = 3;
//!     criteria.format = Format::Longform;
//!     criteria.wait_minutes_on_quota = 5;
//!
//!     for video in scout.run_search(&criteria).await? {
//!         println!("{}: {} views", video.title, video.views);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Quota cooldown
//!
//! When a request is refused for quota and `wait_minutes_on_quota` is
//! positive, the deadline `now + wait` is written to the
//! [`KeyValueStore`]. Until it passes, every request fails fast with
//! [`ApiError::CooldownActive`] and nothing is sent. Use a
//! [`JsonFileStore`] to keep the deadline across restarts.

pub mod api_key;
mod client;
pub mod clock;
mod cooldown;
mod duration;
mod error;
mod resolver;
mod response;
mod search;
mod store;
mod types;
pub mod url;

pub use api_key::ApiKeyStore;

pub use client::{ClientConfig, RetryPolicy, YouTubeClient};

pub use clock::{Clock, ManualClock, SystemClock};

pub use cooldown::{COOLDOWN_KEY, CooldownStatus, QuotaCooldownGate};

pub use duration::parse_duration;

pub use error::{ApiError, ErrorKind, QUOTA_REASONS, Result};

pub use resolver::{ChannelResolver, ResolveStrategy};

pub use search::{
    SearchConfig, TubeScout, detail_batches, passes_filters, published_after, views_per_hour,
};

pub use store::{JsonFileStore, KeyValueStore, MemoryStore};

pub use types::{Format, Mode, SearchCriteria, VideoRecord};

pub use url::{build_url, build_watch_url, is_channel_id, normalize_handle};
