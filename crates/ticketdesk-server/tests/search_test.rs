//! Tests de /api/search/orders.

mod helpers;

use std::sync::Arc;

use axum::http::StatusCode;
use helpers::{StaticSource, client, client_with_source, failing_client, settings};
use serde_json::Value;
use ticketdesk_core::OrderRecord;

#[tokio::test]
async fn search_matches_substring_case_insensitively() {
    let response = client().search("q=ord").await;
    response.assert_status(StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(response.order_ids(), vec!["ORD-001", "ORD-100"]);
    assert_eq!(body["count"], 2);
    assert_eq!(body["suggestions"], serde_json::json!(["ORD-001", "ORD-100"]));
}

#[tokio::test]
async fn search_response_shape() {
    let body: Value = client().search("q=ORD-001").await.json();

    assert_eq!(body["data"][0]["orderValue"], 120.0);
    assert_eq!(body["data"][0]["currency"], "GBP");

    let stats = &body["searchStats"];
    assert_eq!(stats["exactMatches"], 1);
    assert_eq!(stats["prefixMatches"], 1);
    assert_eq!(stats["containsMatches"], 1);
    assert_eq!(stats["fuzzyMatches"], 0);

    let info = &body["cacheInfo"];
    assert_eq!(info["totalOrders"], 3);
    assert_eq!(info["source"], "static");
    assert!(info["lastUpdated"].is_string());
    assert!(info["searchTimeMs"].is_number());
}

#[tokio::test]
async fn search_suffix_is_contains_not_prefix() {
    let response = client().search("q=001").await;
    let body: Value = response.json();

    assert_eq!(response.order_ids(), vec!["ORD-001", "FL-001"]);
    assert_eq!(body["searchStats"]["prefixMatches"], 0);
    assert_eq!(body["searchStats"]["containsMatches"], 2);
}

#[tokio::test]
async fn empty_query_returns_everything_up_to_limit() {
    let body: Value = client().get("/api/search/orders").await.json();
    assert_eq!(body["count"], 3);

    let response = client().search("q=&limit=2").await;
    assert_eq!(response.order_ids(), vec!["ORD-001", "ORD-100"]);
}

#[tokio::test]
async fn leading_space_is_part_of_the_query() {
    let response = client().search("q=%20ord").await;

    response.assert_status(StatusCode::OK);
    assert!(response.order_ids().is_empty());
}

#[tokio::test]
async fn limit_truncates_results() {
    let response = client().search("q=ord&limit=1").await;
    let body: Value = response.json();

    assert_eq!(response.order_ids(), vec!["ORD-001"]);
    assert_eq!(body["suggestions"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn garbage_limit_uses_default() {
    let records: Vec<OrderRecord> = (0..80)
        .map(|i| OrderRecord::new(format!("ORD-{i:03}"), 1.0, "GBP"))
        .collect();
    let (client, _) = client_with_source(Arc::new(StaticSource::new(records)), settings(&[]));

    let response = client.search("q=ord&limit=lots").await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["count"], 50);
}

#[tokio::test]
async fn configured_default_limit_applies() {
    let records: Vec<OrderRecord> = (0..30)
        .map(|i| OrderRecord::new(format!("ORD-{i:03}"), 1.0, "GBP"))
        .collect();
    let (client, _) = client_with_source(
        Arc::new(StaticSource::new(records)),
        settings(&[("SEARCH_DEFAULT_LIMIT", "5")]),
    );

    let body: Value = client.search("q=ord").await.json();
    assert_eq!(body["count"], 5);
    assert_eq!(body["suggestions"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn first_search_loads_cache_once() {
    let source = Arc::new(StaticSource::new(helpers::sample_orders()));
    let (client, cache) = client_with_source(source.clone(), settings(&[]));

    client.search("q=ord").await;
    client.search("q=fl").await;

    assert_eq!(source.calls(), 1);
    assert_eq!(cache.len(), 3);
}

#[tokio::test]
async fn empty_cache_and_failing_upstream_is_503() {
    let body = failing_client()
        .search("q=ord")
        .await
        .assert_error(StatusCode::SERVICE_UNAVAILABLE, "Order source unavailable");

    assert!(body["message"].is_string());
    assert_eq!(body["details"], "source unavailable: credentials rejected");
}

#[tokio::test]
async fn no_match_is_empty_success() {
    let body: Value = client().search("q=zzz").await.json();

    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 0);
    assert_eq!(body["suggestions"], serde_json::json!([]));
}
