//! Channel handle resolution
//!
//! Turns `@handle`, `handle`, or a canonical `UC…` ID into a channel ID.
//! Two strategies run in order: the dedicated handle lookup, then a generic
//! channel search by the handle text.

use tracing::{debug, warn};

use crate::client::{RetryPolicy, YouTubeClient};
use crate::error::Result;
use crate::response::{ChannelListResponse, SearchListResponse};
use crate::url::{is_channel_id, normalize_handle};

/// One way of turning a handle into a channel ID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStrategy {
    /// `channels.list?forHandle=@handle`
    HandleLookup,
    /// `search.list?type=channel&q=@handle`, first hit
    ChannelSearch,
}

impl ResolveStrategy {
    /// Order in which strategies are attempted
    pub const ORDER: [ResolveStrategy; 2] =
        [ResolveStrategy::HandleLookup, ResolveStrategy::ChannelSearch];
}

/// Resolves channel handles through a [`YouTubeClient`]
pub struct ChannelResolver<'a> {
    client: &'a YouTubeClient,
}

impl<'a> ChannelResolver<'a> {
    pub fn new(client: &'a YouTubeClient) -> Self {
        Self { client }
    }

    /// Resolve a handle or ID to a canonical channel ID
    ///
    /// A canonical ID is returned as-is without any request. Otherwise the
    /// strategies in [`ResolveStrategy::ORDER`] are tried until one yields
    /// an ID. A strategy with no match, or a handle lookup refused for
    /// quota, moves on to the next strategy.
    ///
    /// # Arguments
    /// * `api_key` - API key for the requests
    /// * `handle_or_id` - `@handle`, bare handle, or `UC…` channel ID
    /// * `wait_minutes` - Cooldown to record if the last strategy hits quota
    ///
    /// # Returns
    /// `Some(channel_id)`, or `None` when no strategy found the channel
    ///
    /// # Errors
    /// - `CooldownActive` if a cooldown is already running
    /// - `Quota` if the channel search is refused for quota
    /// - Any non-quota error from either strategy
    pub async fn resolve_channel_id(
        &self,
        api_key: &str,
        handle_or_id: &str,
        wait_minutes: u64,
    ) -> Result<Option<String>> {
        let handle_or_id = handle_or_id.trim();
        if is_channel_id(handle_or_id) {
            return Ok(Some(handle_or_id.to_string()));
        }

        let handle = normalize_handle(handle_or_id);
        let strategies = ResolveStrategy::ORDER;

        for (index, strategy) in strategies.iter().enumerate() {
            let is_last = index + 1 == strategies.len();
            // Only the last strategy leaves a cooldown behind
            let policy = if is_last {
                RetryPolicy::new(0, wait_minutes)
            } else {
                RetryPolicy::no_retry()
            };

            match self.run_strategy(*strategy, api_key, &handle, policy).await {
                Ok(Some(channel_id)) => {
                    debug!(handle = %handle, channel_id = %channel_id, ?strategy, "channel resolved");
                    return Ok(Some(channel_id));
                }
                Ok(None) => {
                    debug!(handle = %handle, ?strategy, "no channel match");
                }
                Err(e) if e.is_quota() && !is_last => {
                    warn!(handle = %handle, ?strategy, error = %e, "quota exhausted, trying next strategy");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(None)
    }

    async fn run_strategy(
        &self,
        strategy: ResolveStrategy,
        api_key: &str,
        handle: &str,
        policy: RetryPolicy,
    ) -> Result<Option<String>> {
        match strategy {
            ResolveStrategy::HandleLookup => {
                let url = self.client.endpoint(
                    "/channels",
                    &[("key", api_key), ("part", "id"), ("forHandle", handle)],
                );
                let response: ChannelListResponse =
                    self.client.fetch_with_quota_retry(&url, policy).await?;
                Ok(response.items.into_iter().next().map(|item| item.id))
            }
            ResolveStrategy::ChannelSearch => {
                let url = self.client.endpoint(
                    "/search",
                    &[
                        ("key", api_key),
                        ("part", "snippet"),
                        ("type", "channel"),
                        ("q", handle),
                    ],
                );
                let response: SearchListResponse =
                    self.client.fetch_with_quota_retry(&url, policy).await?;
                Ok(response
                    .items
                    .into_iter()
                    .next()
                    .and_then(|item| item.id.channel_id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::client::ClientConfig;
    use crate::clock::SystemClock;
    use crate::store::MemoryStore;

    fn offline_client() -> YouTubeClient {
        // Nothing listens here; any request would fail with a network error
        let config = ClientConfig {
            api_base: "http://127.0.0.1:1".to_string(),
            timeout_secs: 1,
        };
        YouTubeClient::with_config(config, Arc::new(MemoryStore::new()), Arc::new(SystemClock))
            .unwrap()
    }

    #[test]
    fn test_strategy_order() {
        assert_eq!(
            ResolveStrategy::ORDER,
            [ResolveStrategy::HandleLookup, ResolveStrategy::ChannelSearch]
        );
    }

    #[tokio::test]
    async fn test_canonical_id_needs_no_request() {
        let client = offline_client();
        let resolver = ChannelResolver::new(&client);
        let id = resolver
            .resolve_channel_id("key", "UC_x5XG1OV2P6uZZ5FSM9Ttw", 0)
            .await
            .unwrap();
        assert_eq!(id.as_deref(), Some("UC_x5XG1OV2P6uZZ5FSM9Ttw"));
    }

    #[tokio::test]
    async fn test_network_error_on_lookup_propagates() {
        let client = offline_client();
        let resolver = ChannelResolver::new(&client);
        let err = resolver
            .resolve_channel_id("key", "someone", 0)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Network);
    }
}
