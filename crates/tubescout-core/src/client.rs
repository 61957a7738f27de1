//! HTTP client with quota cooldown and quota retry for the YouTube Data API
//!
//! Provides a single-request JSON fetcher that classifies every failure
//! into an [`ApiError`], and a retry combinator that only retries quota
//! exhaustion, with a fixed wait, behind the persisted cooldown gate.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::cooldown::{CooldownStatus, QuotaCooldownGate};
use crate::error::{ApiError, Result};
use crate::response::ErrorEnvelope;
use crate::store::KeyValueStore;
use crate::url::{API_BASE, build_url};

const USER_AGENT: &str = concat!("tubescout/", env!("CARGO_PKG_VERSION"));

/// Public channel used to check whether an API key works
const PROBE_CHANNEL_ID: &str = "UC_x5XG1OV2P6uZZ5FSM9Ttw";

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root (default: `https://www.googleapis.com/youtube/v3`)
    pub api_base: String,
    /// Deadline for one request, including the body, in seconds (default: 15)
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: API_BASE.to_string(),
            timeout_secs: 15,
        }
    }
}

/// Bounded retry on quota exhaustion
///
/// `max_retries` counts retries, not attempts: `max_retries = 2` allows up
/// to three requests. The wait between attempts is always `wait_minutes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    /// Backoff between attempts and cooldown length; 0 disables both
    pub wait_minutes: u64,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, wait_minutes: u64) -> Self {
        Self {
            max_retries,
            wait_minutes,
        }
    }

    /// Single attempt that leaves the cooldown untouched on quota errors
    pub fn no_retry() -> Self {
        Self::new(0, 0)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_secs(self.wait_minutes.saturating_mul(60))
    }
}

/// HTTP client wrapper with cooldown gating and quota retry
///
/// Handles all HTTP communication with the API, including:
/// - A fixed per-request deadline
/// - Classification of transport, HTTP, and body failures
/// - Refusing to send while a quota cooldown is active
/// - Fixed-wait retries on quota exhaustion
pub struct YouTubeClient {
    client: reqwest::Client,
    api_base: String,
    timeout: Duration,
    gate: QuotaCooldownGate,
    clock: Arc<dyn Clock>,
}

impl YouTubeClient {
    /// Create a new client with default configuration and the system clock
    pub fn new(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        Self::with_config(ClientConfig::default(), store, Arc::new(SystemClock))
    }

    /// Create a new client with custom configuration and clock
    ///
    /// # Errors
    /// - `Env` if the HTTP client cannot be built in this environment
    pub fn with_config(
        config: ClientConfig,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ApiError::Env(e.to_string()))?;

        Ok(Self {
            client,
            api_base: config.api_base,
            timeout: Duration::from_secs(config.timeout_secs),
            gate: QuotaCooldownGate::new(store, clock.clone()),
            clock,
        })
    }

    /// Full URL for an endpoint path (e.g. `/search`) and its parameters
    pub fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> String {
        build_url(&self.api_base, path, params)
    }

    pub fn gate(&self) -> &QuotaCooldownGate {
        &self.gate
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Perform one GET and decode the JSON body
    ///
    /// Does not consult the cooldown gate.
    ///
    /// # Errors
    /// - `Timeout` - No complete response within the deadline
    /// - `Network` - Connection-level failure
    /// - `Parse` - Success status with a body that is not JSON
    /// - `Quota` / `Auth` / `Http` - Non-success status, see [`ApiError::from_status`]
    pub async fn fetch_json(&self, url: &str) -> Result<Value> {
        let request = async {
            let response = self.client.get(url).send().await?;
            let status = response.status();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        let (status, body) = match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(received)) => received,
            Ok(Err(e)) => return Err(Self::classify_transport(e, self.timeout)),
            Err(_) => return Err(ApiError::Timeout(self.timeout.as_secs())),
        };

        if status.is_success() {
            return serde_json::from_slice(&body).map_err(|e| ApiError::Parse(e.to_string()));
        }

        // The body may be empty or not JSON at all
        let envelope: ErrorEnvelope = serde_json::from_slice(&body).unwrap_or_default();
        let reason = envelope.first_reason();
        let message = envelope
            .error
            .message
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

        Err(ApiError::from_status(status.as_u16(), reason, message))
    }

    /// [`fetch_json`](Self::fetch_json) decoded into a response schema
    pub async fn fetch_as<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let value = self.fetch_json(url).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Fetch through the cooldown gate, retrying quota exhaustion
    ///
    /// Every attempt first checks the gate. A quota error records a cooldown
    /// of `policy.wait_minutes`, then sleeps that long and retries while
    /// retries remain and the wake-up time is representable. Other errors
    /// are returned immediately.
    ///
    /// # Errors
    /// - `CooldownActive` - A cooldown is still running; nothing was sent
    /// - `Quota` - Quota exhausted and no retries left (or retry disabled)
    /// - Any error from [`fetch_json`](Self::fetch_json)
    pub async fn fetch_with_quota_retry<T: DeserializeOwned>(
        &self,
        url: &str,
        policy: RetryPolicy,
    ) -> Result<T> {
        let mut retries = 0;

        loop {
            if let CooldownStatus::Blocked { wait_minutes } = self.gate.check_allowed() {
                debug!(wait_minutes, "request skipped, quota cooldown active");
                return Err(ApiError::CooldownActive { wait_minutes });
            }

            match self.fetch_as::<T>(url).await {
                Err(e) if e.is_quota() => {
                    self.gate.record_quota_exhausted(policy.wait_minutes);

                    if retries < policy.max_retries
                        && policy.wait_minutes > 0
                        && self.backoff_outlasts_cooldown(policy)
                    {
                        retries += 1;
                        warn!(
                            reason = e.reason().unwrap_or_default(),
                            retry = retries,
                            max_retries = policy.max_retries,
                            wait_minutes = policy.wait_minutes,
                            "quota exhausted, waiting before retry"
                        );
                        self.clock.sleep(policy.backoff()).await;
                        continue;
                    }

                    return Err(e);
                }
                result => return result,
            }
        }
    }

    /// Best-effort check that `api_key` is accepted
    ///
    /// Looks up a well-known public channel. Any failure, including quota
    /// exhaustion, reports the key as invalid. Bypasses the cooldown gate.
    pub async fn probe_key_validity(&self, api_key: &str) -> bool {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return false;
        }

        let url = self.endpoint(
            "/channels",
            &[("part", "id"), ("id", PROBE_CHANNEL_ID), ("key", api_key)],
        );

        match self.fetch_json(&url).await {
            Ok(body) => body.get("error").is_none(),
            Err(e) => {
                warn!(error = %e, "API key probe failed");
                false
            }
        }
    }

    /// Whether sleeping for the backoff reaches the recorded deadline
    ///
    /// False when the wake-up time is beyond what the clock can represent;
    /// such a retry could never be sent.
    fn backoff_outlasts_cooldown(&self, policy: RetryPolicy) -> bool {
        let wake_at = chrono::Duration::from_std(policy.backoff())
            .ok()
            .and_then(|delta| self.clock.now().checked_add_signed(delta));

        match wake_at {
            Some(wake_at) => self.gate.blocked_until().is_none_or(|until| wake_at >= until),
            None => false,
        }
    }

    fn classify_transport(error: reqwest::Error, timeout: Duration) -> ApiError {
        if error.is_timeout() {
            ApiError::Timeout(timeout.as_secs())
        } else {
            // The URL carries the API key
            ApiError::Network(error.without_url().to_string())
        }
    }
}
