//! URL helper functions for the YouTube Data API
//!
//! Provides query-string building, watch-page URLs, and channel
//! identifier / handle helpers.

/// Default API root
pub const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

const WATCH_BASE: &str = "https://www.youtube.com/watch";

/// Builds an endpoint URL below `base` with an encoded query string
///
/// Parameters with empty values are skipped.
///
/// # Example
/// ```
/// use tubescout_core::url::build_url;
/// let url = build_url("https://api.test/v3", "/search", &[("q", "doctor who"), ("pageToken", "")]);
/// assert_eq!(url, "https://api.test/v3/search?q=doctor%20who");
/// ```
pub fn build_url(base: &str, path: &str, params: &[(&str, &str)]) -> String {
    let query = params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    let base = base.trim_end_matches('/');
    if query.is_empty() {
        format!("{}{}", base, path)
    } else {
        let separator = if path.contains('?') { '&' } else { '?' };
        format!("{}{}{}{}", base, path, separator, query)
    }
}

/// Builds the watch page URL for a video ID
///
/// # Example
/// ```
/// use tubescout_core::url::build_watch_url;
/// assert_eq!(build_watch_url("dQw4w9WgXcQ"), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
/// ```
pub fn build_watch_url(video_id: &str) -> String {
    format!("{}?v={}", WATCH_BASE, video_id)
}

/// Whether `value` is a canonical channel ID (`UC` + 22 ID characters)
///
/// # Example
/// ```
/// use tubescout_core::url::is_channel_id;
/// assert!(is_channel_id("UC_x5XG1OV2P6uZZ5FSM9Ttw"));
/// assert!(!is_channel_id("@GoogleDevelopers"));
/// ```
pub fn is_channel_id(value: &str) -> bool {
    value.len() == 24
        && value.starts_with("UC")
        && value[2..]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Prefixes `@` to a bare channel handle
///
/// # Example
/// ```
/// use tubescout_core::url::normalize_handle;
/// assert_eq!(normalize_handle("someone"), "@someone");
/// assert_eq!(normalize_handle("@someone"), "@someone");
/// ```
pub fn normalize_handle(handle: &str) -> String {
    let handle = handle.trim();
    if handle.starts_with('@') {
        handle.to_string()
    } else {
        format!("@{}", handle)
    }
}
