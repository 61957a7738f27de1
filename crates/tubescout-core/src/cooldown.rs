//! Persisted quota cooldown
//!
//! After the API reports quota exhaustion the client refuses to send
//! requests until a deadline passes. The deadline lives in the external
//! key-value store so it survives restarts.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::{debug, info};

use crate::clock::Clock;
use crate::store::KeyValueStore;

/// Store key holding the RFC 3339 "blocked until" timestamp
pub const COOLDOWN_KEY: &str = "yt_quota_cooldown_until";

/// Outcome of a cooldown check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownStatus {
    Allowed,
    /// Remaining wait, rounded up to whole minutes
    Blocked { wait_minutes: i64 },
}

/// Guard in front of every quota-consuming request
///
/// Never sleeps and never touches the network.
#[derive(Clone)]
pub struct QuotaCooldownGate {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl QuotaCooldownGate {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Persisted deadline, if one is stored and parseable
    pub fn blocked_until(&self) -> Option<DateTime<Utc>> {
        let raw = self.store.get(COOLDOWN_KEY)?;
        match DateTime::parse_from_rfc3339(&raw) {
            Ok(at) => Some(at.with_timezone(&Utc)),
            Err(e) => {
                debug!(value = %raw, error = %e, "ignoring unparseable cooldown timestamp");
                None
            }
        }
    }

    pub fn check_allowed(&self) -> CooldownStatus {
        let Some(until) = self.blocked_until() else {
            return CooldownStatus::Allowed;
        };

        let now = self.clock.now();
        if now >= until {
            return CooldownStatus::Allowed;
        }

        let remaining_ms = (until - now).num_milliseconds();
        CooldownStatus::Blocked {
            wait_minutes: (remaining_ms + 59_999) / 60_000,
        }
    }

    /// Start a cooldown of `minutes` from now; `0` means the caller opted out
    ///
    /// Deadlines past the end of year 9999 are clamped to it, so the stored
    /// value always stays valid RFC 3339.
    pub fn record_quota_exhausted(&self, minutes: u64) {
        if minutes == 0 {
            return;
        }

        let latest = latest_deadline();
        let until = i64::try_from(minutes)
            .ok()
            .and_then(Duration::try_minutes)
            .and_then(|delta| self.clock.now().checked_add_signed(delta))
            .map_or(latest, |until| until.min(latest));
        info!(until = %until.to_rfc3339(), minutes, "quota exhausted, cooldown recorded");
        self.store.set(COOLDOWN_KEY, &until.to_rfc3339());
    }

    pub fn reset(&self) {
        self.store.remove(COOLDOWN_KEY);
    }
}

/// 9999-12-31T23:59:59Z
fn latest_deadline() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(9999, 12, 31)
        .and_then(|date| date.and_hms_opt(23, 59, 59))
        .map_or(DateTime::<Utc>::MAX_UTC, |at| at.and_utc())
}
