// ABOUTME: HTTP-level tests for the exercise search and health routes
// ABOUTME: Drives the axum router with tower oneshot requests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use common::fixture_resources;
use pierre_exercise_engine::cache::DurableStatus;
use pierre_exercise_engine::routes::{self, Readiness, ReadinessResponse, SearchResponse};
use tower::ServiceExt;

async fn app() -> Router {
    routes::router(&fixture_resources().await)
}

async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_search_returns_results() {
    let (status, body) = get(app().await, "/api/exercises/search?q=benchpress&semantic=false").await;

    assert_eq!(status, StatusCode::OK);
    let response: SearchResponse = serde_json::from_value(body).unwrap();
    assert_eq!(response.query, "benchpress");
    assert_eq!(response.total, response.results.len());
    assert_eq!(response.results[0].name, "Bench Press");
    assert_eq!(response.correction.as_deref(), Some("Bench Press"));
    assert!(!response.cache_hit);
}

#[tokio::test]
async fn test_search_result_shape() {
    let (status, body) = get(
        app().await,
        "/api/exercises/search?q=calf%20raise&equipment=dumbbell&limit=5",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let first = &body["results"][0];
    for field in [
        "id",
        "name",
        "body_part",
        "target_muscle",
        "equipment",
        "difficulty",
        "gif_url",
        "video_url",
        "relevance_score",
        "match_sources",
    ] {
        assert!(first.get(field).is_some(), "missing {field}");
    }
    assert!(body["results"].as_array().unwrap().len() <= 5);
}

#[tokio::test]
async fn test_repeated_search_reports_cache_hit() {
    let app = app().await;

    let (_, first) = get(app.clone(), "/api/exercises/search?q=wall%20sit").await;
    let (_, second) = get(app, "/api/exercises/search?q=WALL%20SIT").await;

    assert_eq!(first["cache_hit"], false);
    assert_eq!(second["cache_hit"], true);
}

#[tokio::test]
async fn test_validation_errors_return_400() {
    for uri in [
        "/api/exercises/search",
        "/api/exercises/search?q=a",
        "/api/exercises/search?q=squat&limit=0",
        "/api/exercises/search?q=squat&limit=51",
        "/api/exercises/search?q=squat&limit=many",
        "/api/exercises/search?q=squat&semantic=maybe",
    ] {
        let (status, body) = get(app().await, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        let code = body["error"]["code"].as_str().unwrap();
        assert!(
            ["INVALID_INPUT", "MISSING_REQUIRED_FIELD", "VALUE_OUT_OF_RANGE"].contains(&code),
            "{uri}: {body}"
        );
    }
}

#[tokio::test]
async fn test_validation_error_names_parameter_and_request_id() {
    let (status, body) = get(app().await, "/api/exercises/search?q=squat&semantic=maybe").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
    assert_eq!(body["error"]["details"]["parameter"], "semantic");
    assert!(!body["error"]["request_id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_health_and_ready() {
    let app = app().await;

    let (status, health) = get(app.clone(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");

    let (status, ready) = get(app, "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ready["status"], "ready");
    assert_eq!(ready["durable_cache"]["status"], "disabled");

    let ready: ReadinessResponse = serde_json::from_value(ready).unwrap();
    assert_eq!(ready.status, Readiness::Ready);
    assert_eq!(ready.durable_cache, DurableStatus::Disabled);
    assert_eq!(ready.selection_strategy, "similarity");
}
