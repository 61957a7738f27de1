#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use tubescout_core::{
    ClientConfig, ManualClock, MemoryStore, SearchConfig, TubeScout, YouTubeClient,
};
use wiremock::MockServer;

pub const NOW: &str = "2024-06-01T00:00:00Z";

pub fn now() -> DateTime<Utc> {
    NOW.parse().unwrap()
}

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            clock: Arc::new(ManualClock::new(now())),
        }
    }

    pub fn client(&self, server: &MockServer) -> YouTubeClient {
        self.client_with_base(&server.uri(), 5)
    }

    pub fn client_with_base(&self, base: &str, timeout_secs: u64) -> YouTubeClient {
        let config = ClientConfig {
            api_base: base.to_string(),
            timeout_secs,
        };
        YouTubeClient::with_config(config, self.store.clone(), self.clock.clone()).unwrap()
    }

    pub fn scout(&self, server: &MockServer) -> TubeScout {
        self.scout_with(server, SearchConfig::default())
    }

    pub fn scout_with(&self, server: &MockServer, config: SearchConfig) -> TubeScout {
        TubeScout::with_config(self.client(server), config)
    }
}

/// `search.list` page with video IDs
pub fn search_page(ids: &[&str], next_page_token: Option<&str>) -> Value {
    let items: Vec<Value> = ids
        .iter()
        .map(|id| json!({"kind": "youtube#searchResult", "id": {"kind": "youtube#video", "videoId": id}}))
        .collect();
    let mut page = json!({"kind": "youtube#searchListResponse", "items": items});
    if let Some(token) = next_page_token {
        page["nextPageToken"] = json!(token);
    }
    page
}

/// `videos.list` item published 24 hours before [`NOW`]
pub fn video(id: &str, views: u64, duration: &str) -> Value {
    json!({
        "id": id,
        "snippet": {
            "title": format!("Video {}", id),
            "channelTitle": "Some Channel",
            "publishedAt": "2024-05-31T00:00:00Z"
        },
        "contentDetails": {"duration": duration},
        "statistics": {"viewCount": views.to_string()}
    })
}

pub fn video_list(items: Vec<Value>) -> Value {
    json!({"kind": "youtube#videoListResponse", "items": items})
}

pub fn api_error(status: u16, reason: &str, message: &str) -> Value {
    json!({
        "error": {
            "code": status,
            "message": message,
            "errors": [{"domain": "youtube.quota", "reason": reason, "message": message}]
        }
    })
}

pub async fn count_requests(server: &MockServer, path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == path)
        .count()
}

pub async fn query_values(server: &MockServer, path: &str, key: &str) -> Vec<Option<String>> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == path)
        .map(|r| {
            r.url
                .query_pairs()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.into_owned())
        })
        .collect()
}
