//! End-to-end search runs against a mocked API

mod common;

use common::{Harness, count_requests, query_values, search_page, video, video_list};
use tubescout_core::{
    ApiError, COOLDOWN_KEY, ErrorKind, Format, KeyValueStore, SearchConfig, SearchCriteria,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn keyword_criteria() -> SearchCriteria {
    let mut criteria = SearchCriteria::keyword("test-key", "test");
    criteria.months = 1;
    criteria.per_query_limit = 10;
    criteria
}

#[tokio::test]
async fn test_keyword_search_filters_by_min_views() {
    let server = MockServer::start().await;
    let harness = Harness::new();

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "test"))
        .and(query_param("type", "video"))
        .and(query_param("maxResults", "10"))
        .and(query_param("regionCode", "KR"))
        .and(query_param("relevanceLanguage", "ko"))
        .and(query_param("publishedAfter", "2024-05-01T00:00:00Z"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(&["low", "high"], None)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("id", "low,high"))
        .and(query_param("part", "snippet,contentDetails,statistics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(video_list(vec![
            video("low", 50, "PT5M"),
            video("high", 500, "PT5M"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut criteria = keyword_criteria();
    criteria.min_views = 100;

    let results = harness.scout(&server).run_search(&criteria).await.unwrap();

    assert_eq!(results.len(), 1);
    let record = &results[0];
    assert_eq!(record.id, "high");
    assert_eq!(record.views, 500);
    assert_eq!(record.duration_sec, 300);
    assert_eq!(record.title, "Video high");
    assert_eq!(record.url, "https://www.youtube.com/watch?v=high");
}

#[tokio::test]
async fn test_missing_page_token_stops_after_one_page() {
    let server = MockServer::start().await;
    let harness = Harness::new();

    Mock::given(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(&["a", "b"], None)))
        .mount(&server)
        .await;
    Mock::given(path("/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(video_list(vec![])))
        .mount(&server)
        .await;

    let mut criteria = keyword_criteria();
    criteria.per_query_limit = 50;
    harness.scout(&server).run_search(&criteria).await.unwrap();

    assert_eq!(count_requests(&server, "/search").await, 1);
}

#[tokio::test]
async fn test_endless_pagination_is_capped_at_ten_pages() {
    let server = MockServer::start().await;
    let harness = Harness::new();

    Mock::given(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(search_page(&["again"], Some("more"))),
        )
        .mount(&server)
        .await;
    Mock::given(path("/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(video_list(vec![])))
        .mount(&server)
        .await;

    let mut criteria = keyword_criteria();
    criteria.per_query_limit = 1000;
    harness.scout(&server).run_search(&criteria).await.unwrap();

    assert_eq!(count_requests(&server, "/search").await, 10);
}

#[tokio::test]
async fn test_page_token_is_forwarded_and_order_kept() {
    let server = MockServer::start().await;
    let harness = Harness::new();

    // Specific mock first: wiremock answers with the first matching mock
    Mock::given(path("/search"))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(&["v3"], None)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(search_page(&["v1", "v2"], Some("page-2"))),
        )
        .mount(&server)
        .await;
    Mock::given(path("/videos"))
        .and(query_param("id", "v1,v2,v3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(video_list(vec![
            video("v1", 10, "PT1M"),
            video("v2", 20, "PT2M"),
            video("v3", 30, "PT3M"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut criteria = keyword_criteria();
    criteria.per_query_limit = 3;
    let results = harness.scout(&server).run_search(&criteria).await.unwrap();

    let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["v1", "v2", "v3"]);
    assert_eq!(
        query_values(&server, "/search", "pageToken").await,
        vec![None, Some("page-2".to_string())]
    );
}

#[tokio::test]
async fn test_ids_truncated_to_target() {
    let server = MockServer::start().await;
    let harness = Harness::new();

    let ids: Vec<String> = (0..10).map(|i| format!("v{}", i)).collect();
    let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();

    Mock::given(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(search_page(&id_refs, Some("next"))),
        )
        .mount(&server)
        .await;
    Mock::given(path("/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(video_list(vec![])))
        .mount(&server)
        .await;

    let mut criteria = keyword_criteria();
    criteria.per_query_limit = 5;
    harness.scout(&server).run_search(&criteria).await.unwrap();

    assert_eq!(count_requests(&server, "/search").await, 1);
    assert_eq!(
        query_values(&server, "/videos", "id").await,
        vec![Some("v0,v1,v2,v3,v4".to_string())]
    );
}

#[tokio::test]
async fn test_details_fetched_in_batches_of_fifty() {
    let server = MockServer::start().await;
    let harness = Harness::new();

    let ids: Vec<String> = (0..50).map(|i| format!("v{}", i)).collect();
    let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();

    Mock::given(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(search_page(&id_refs, Some("next"))),
        )
        .mount(&server)
        .await;
    Mock::given(path("/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(video_list(vec![])))
        .mount(&server)
        .await;

    let config = SearchConfig {
        page_size: 50,
        ..SearchConfig::default()
    };
    let mut criteria = keyword_criteria();
    criteria.per_query_limit = 120;
    harness
        .scout_with(&server, config)
        .run_search(&criteria)
        .await
        .unwrap();

    assert_eq!(count_requests(&server, "/search").await, 3);
    let batch_sizes: Vec<usize> = query_values(&server, "/videos", "id")
        .await
        .into_iter()
        .map(|ids| ids.unwrap_or_default().split(',').count())
        .collect();
    assert_eq!(batch_sizes, vec![50, 50, 20]);
}

#[tokio::test]
async fn test_empty_listing_skips_details() {
    let server = MockServer::start().await;
    let harness = Harness::new();

    Mock::given(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(&[], None)))
        .mount(&server)
        .await;

    let results = harness
        .scout(&server)
        .run_search(&keyword_criteria())
        .await
        .unwrap();

    assert!(results.is_empty());
    assert_eq!(count_requests(&server, "/videos").await, 0);
}

#[tokio::test]
async fn test_shorts_format_filter() {
    let server = MockServer::start().await;
    let harness = Harness::new();

    Mock::given(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(search_page(&["short", "long"], None)),
        )
        .mount(&server)
        .await;
    Mock::given(path("/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(video_list(vec![
            video("short", 100, "PT45S"),
            video("long", 100, "PT12M"),
        ])))
        .mount(&server)
        .await;

    let mut criteria = keyword_criteria();
    criteria.format = Format::Shorts;
    criteria.shorts_threshold_sec = 60;
    let scout = harness.scout(&server);

    let results = scout.run_search(&criteria).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "short");

    criteria.format = Format::Longform;
    let results = scout.run_search(&criteria).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "long");
}

#[tokio::test]
async fn test_views_per_hour_filter() {
    let server = MockServer::start().await;
    let harness = Harness::new();

    Mock::given(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(&["slow", "fast"], None)))
        .mount(&server)
        .await;
    // Both published 24 hours ago
    Mock::given(path("/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(video_list(vec![
            video("slow", 240, "PT5M"),
            video("fast", 4800, "PT5M"),
        ])))
        .mount(&server)
        .await;

    let mut criteria = keyword_criteria();
    criteria.min_views_per_hour = 100.0;
    let results = harness.scout(&server).run_search(&criteria).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "fast");
}

#[tokio::test]
async fn test_channel_search_uses_resolved_id() {
    let server = MockServer::start().await;
    let harness = Harness::new();

    Mock::given(path("/channels"))
        .and(query_param("forHandle", "@someone"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [{"id": "UCabcdefghijklmnopqrstuv"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/search"))
        .and(query_param("channelId", "UCabcdefghijklmnopqrstuv"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(&["c1"], None)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/videos"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(video_list(vec![video("c1", 5, "PT9M")])),
        )
        .mount(&server)
        .await;

    let mut criteria = SearchCriteria::channel("test-key", "someone");
    criteria.per_channel_limit = 5;
    let results = harness.scout(&server).run_search(&criteria).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(query_values(&server, "/search", "q").await, vec![None]);
}

#[tokio::test]
async fn test_unresolved_channel_searches_without_filter() {
    let server = MockServer::start().await;
    let harness = Harness::new();

    Mock::given(path("/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": []})))
        .mount(&server)
        .await;
    // Fallback channel search and the listing both hit /search
    Mock::given(path("/search"))
        .and(query_param("type", "channel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": []})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/search"))
        .and(query_param("type", "video"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(&[], None)))
        .expect(1)
        .mount(&server)
        .await;

    let criteria = SearchCriteria::channel("test-key", "@nobody");
    let results = harness.scout(&server).run_search(&criteria).await.unwrap();

    assert!(results.is_empty());
    let channel_filters = query_values(&server, "/search", "channelId").await;
    assert!(channel_filters.iter().all(Option::is_none));
}

#[tokio::test]
async fn test_active_cooldown_blocks_without_requests() {
    let server = MockServer::start().await;
    let harness = Harness::new();

    let until = common::now() + chrono::Duration::minutes(5);
    harness.store.set(COOLDOWN_KEY, &until.to_rfc3339());

    let err = harness
        .scout(&server)
        .run_search(&keyword_criteria())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::CooldownActive { wait_minutes: 5 }));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_auth_error_is_not_retried() {
    let server = MockServer::start().await;
    let harness = Harness::new();

    Mock::given(path("/search"))
        .respond_with(ResponseTemplate::new(400).set_body_json(common::api_error(
            400,
            "keyInvalid",
            "API key not valid. Please pass a valid API key.",
        )))
        .mount(&server)
        .await;

    let mut criteria = keyword_criteria();
    criteria.wait_minutes_on_quota = 5;
    let err = harness
        .scout(&server)
        .run_search(&criteria)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Auth);
    assert_eq!(err.status(), Some(400));
    assert_eq!(count_requests(&server, "/search").await, 1);
    assert!(harness.clock.sleeps().is_empty());
}
