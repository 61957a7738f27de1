//! Error types for the YouTube search client
//!
//! Every failure that leaves the crate is an [`ApiError`]. Callers branch on
//! [`ApiError::kind`] instead of inspecting raw HTTP details.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Remote reason codes that mean the request budget is spent
pub const QUOTA_REASONS: [&str; 4] = [
    "quotaExceeded",
    "dailyLimitExceeded",
    "rateLimitExceeded",
    "forbidden",
];

/// Coarse classification of an [`ApiError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Env,
    Network,
    Timeout,
    Quota,
    Auth,
    HttpError,
    Parse,
    Cooldown,
    MissingApiKey,
}

/// Error type for all search client operations
///
/// Implements Display for human-readable messages and Serialize
/// as a structured object for Tauri command compatibility.
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP client could not be created in this environment
    #[error("HTTP client unavailable: {0}")]
    Env(String),

    /// Connection-level failure
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded its deadline
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// Remote signalled quota exhaustion (HTTP 403 with a quota reason)
    #[error("Request refused ({status}: {reason}): {message}")]
    Quota {
        status: u16,
        reason: String,
        message: String,
    },

    /// Bad key or malformed request (HTTP 400/401)
    #[error("Authentication or request error ({status}): {message}")]
    Auth {
        status: u16,
        reason: Option<String>,
        message: String,
    },

    /// Any other non-success status
    #[error("Request failed ({status}): {message}")]
    Http {
        status: u16,
        reason: Option<String>,
        message: String,
    },

    /// Success response whose body could not be decoded
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// A previous quota error set a cooldown that has not expired yet
    #[error("API quota cooldown active, retry in {wait_minutes} minute(s)")]
    CooldownActive { wait_minutes: i64 },

    /// No API key was supplied
    #[error("YouTube API key is not configured")]
    MissingApiKey,
}

impl ApiError {
    /// Classify a non-success response
    ///
    /// A bare 403 without a reason is reported as `forbidden`, which counts
    /// as quota exhaustion.
    pub fn from_status(status: u16, reason: Option<String>, message: String) -> Self {
        let reason = reason.or_else(|| (status == 403).then(|| "forbidden".to_string()));

        match (status, reason) {
            (403, Some(reason)) if QUOTA_REASONS.contains(&reason.as_str()) => ApiError::Quota {
                status,
                reason,
                message,
            },
            (400 | 401, reason) => ApiError::Auth {
                status,
                reason,
                message,
            },
            (status, reason) => ApiError::Http {
                status,
                reason,
                message,
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Env(_) => ErrorKind::Env,
            ApiError::Network(_) => ErrorKind::Network,
            ApiError::Timeout(_) => ErrorKind::Timeout,
            ApiError::Quota { .. } => ErrorKind::Quota,
            ApiError::Auth { .. } => ErrorKind::Auth,
            ApiError::Http { .. } => ErrorKind::HttpError,
            ApiError::Parse(_) => ErrorKind::Parse,
            ApiError::CooldownActive { .. } => ErrorKind::Cooldown,
            ApiError::MissingApiKey => ErrorKind::MissingApiKey,
        }
    }

    /// HTTP status, when the error came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Quota { status, .. }
            | ApiError::Auth { status, .. }
            | ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Remote reason code, when the error body carried one
    pub fn reason(&self) -> Option<&str> {
        match self {
            ApiError::Quota { reason, .. } => Some(reason),
            ApiError::Auth { reason, .. } | ApiError::Http { reason, .. } => reason.as_deref(),
            _ => None,
        }
    }

    pub fn is_quota(&self) -> bool {
        matches!(self, ApiError::Quota { .. })
    }
}

impl Serialize for ApiError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("ApiError", 5)?;
        state.serialize_field("kind", &self.kind())?;
        state.serialize_field("status", &self.status())?;
        state.serialize_field("reason", &self.reason())?;
        state.serialize_field("message", &self.to_string())?;
        let wait_minutes = match self {
            ApiError::CooldownActive { wait_minutes } => Some(*wait_minutes),
            _ => None,
        };
        state.serialize_field("waitMinutes", &wait_minutes)?;
        state.end()
    }
}

/// Result type alias for search client operations
pub type Result<T> = std::result::Result<T, ApiError>;
