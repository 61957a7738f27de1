//! Wire schemas for the YouTube Data API v3 endpoints in use
//!
//! Every field the client does not strictly need is optional so partial
//! responses decode instead of failing.

use serde::{Deserialize, Deserializer};

/// `search.list`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchItem {
    #[serde(default)]
    pub id: SearchItemId,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchItemId {
    pub video_id: Option<String>,
    pub channel_id: Option<String>,
}

impl SearchListResponse {
    /// Non-empty continuation token, if any
    pub fn next_page(&self) -> Option<&str> {
        self.next_page_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// `videos.list`
#[derive(Debug, Default, Deserialize)]
pub(crate) struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VideoItem {
    pub id: String,
    #[serde(default)]
    pub snippet: VideoSnippet,
    #[serde(default)]
    pub content_details: ContentDetails,
    #[serde(default)]
    pub statistics: Statistics,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VideoSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub channel_title: String,
    pub published_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ContentDetails {
    #[serde(default)]
    pub duration: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Statistics {
    /// Sent as a decimal string; missing means zero
    #[serde(default, deserialize_with = "lenient_count")]
    pub view_count: u64,
}

/// `channels.list`
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ChannelListResponse {
    #[serde(default)]
    pub items: Vec<ChannelItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChannelItem {
    pub id: String,
}

/// Error envelope: `{ "error": { "message", "errors": [{ "reason" }] } }`
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorEnvelope {
    #[serde(default)]
    pub error: ErrorBody,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorDetail {
    pub reason: Option<String>,
}

impl ErrorEnvelope {
    pub fn first_reason(&self) -> Option<String> {
        self.error.errors.first().and_then(|e| e.reason.clone())
    }
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Text(String),
        Number(u64),
        Other(serde_json::Value),
    }

    Ok(match Count::deserialize(deserializer)? {
        Count::Text(text) => text.trim().parse().unwrap_or(0),
        Count::Number(n) => n,
        Count::Other(_) => 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_page_with_token() {
        let json = r#"{
            "nextPageToken": "CAoQAA",
            "items": [
                {"id": {"kind": "youtube#video", "videoId": "v1"}},
                {"id": {"kind": "youtube#channel", "channelId": "UCabc"}}
            ]
        }"#;
        let page: SearchListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.next_page(), Some("CAoQAA"));
        assert_eq!(page.items[0].id.video_id.as_deref(), Some("v1"));
        assert_eq!(page.items[1].id.video_id, None);
        assert_eq!(page.items[1].id.channel_id.as_deref(), Some("UCabc"));
    }

    #[test]
    fn test_search_page_without_items_or_token() {
        let page: SearchListResponse = serde_json::from_str("{}").unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.next_page(), None);

        let page: SearchListResponse =
            serde_json::from_str(r#"{"nextPageToken": ""}"#).unwrap();
        assert_eq!(page.next_page(), None);
    }

    #[test]
    fn test_video_item_defaults() {
        let json = r#"{"items": [{"id": "v1"}]}"#;
        let list: VideoListResponse = serde_json::from_str(json).unwrap();
        let item = &list.items[0];
        assert_eq!(item.statistics.view_count, 0);
        assert_eq!(item.content_details.duration, "");
        assert_eq!(item.snippet.published_at, None);
    }

    #[test]
    fn test_view_count_variants() {
        let json = r#"{"items": [
            {"id": "a", "statistics": {"viewCount": "12345"}},
            {"id": "b", "statistics": {"viewCount": 77}},
            {"id": "c", "statistics": {"viewCount": "n/a"}},
            {"id": "d", "statistics": {"viewCount": null}}
        ]}"#;
        let list: VideoListResponse = serde_json::from_str(json).unwrap();
        let counts: Vec<u64> = list.items.iter().map(|i| i.statistics.view_count).collect();
        assert_eq!(counts, vec![12345, 77, 0, 0]);
    }

    #[test]
    fn test_error_envelope_reason() {
        let json = r#"{"error": {"code": 403, "message": "quota", "errors": [{"reason": "quotaExceeded"}]}}"#;
        let envelope: ErrorEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.error.message.as_deref(), Some("quota"));
        assert_eq!(envelope.first_reason().as_deref(), Some("quotaExceeded"));
    }
}
