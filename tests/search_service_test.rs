// ABOUTME: Integration tests for the fused exercise search pipeline
// ABOUTME: Fuzzy-only correction, cache hits, semantic timeout degradation, and durable writes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{
    fixture_collaborators, fixture_resources, test_config, FailingIndex, RecordingDurableStore,
    SlowEmbedder,
};
use pierre_exercise_engine::{
    cache::CacheTier,
    models::{MatchSource, SearchRequest},
    resources::ServerResources,
};
use std::sync::Arc;
use std::time::Duration;

fn request(query: &str, semantic: bool) -> SearchRequest {
    SearchRequest {
        query: query.to_owned(),
        equipment: vec![],
        body_parts: vec![],
        limit: 20,
        semantic,
    }
}

#[tokio::test]
async fn test_fuzzy_only_search_suggests_correction() {
    let resources = fixture_resources().await;

    let outcome = resources.search.search(&request("benchpress", false)).await;

    assert!(!outcome.results.is_empty());
    assert_eq!(outcome.results[0].name, "Bench Press");
    assert_eq!(outcome.correction.as_deref(), Some("Bench Press"));
    assert!(outcome
        .results
        .iter()
        .all(|hit| hit.match_sources == vec![MatchSource::Fuzzy]));
    assert!(!outcome.cache_hit());
}

#[tokio::test]
async fn test_exact_query_has_no_correction() {
    let resources = fixture_resources().await;

    let outcome = resources.search.search(&request("bench press", false)).await;

    assert_eq!(outcome.results[0].name, "Bench Press");
    assert_eq!(outcome.correction, None);
}

#[tokio::test]
async fn test_scores_are_normalized_and_sorted() {
    let resources = fixture_resources().await;

    let outcome = resources.search.search(&request("dumbbell press", true)).await;

    assert!(!outcome.results.is_empty());
    assert!(outcome.results.len() <= 20);
    assert!((outcome.results[0].relevance_score - 1.0).abs() < 1e-9);
    assert!(outcome
        .results
        .windows(2)
        .all(|w| w[0].relevance_score >= w[1].relevance_score));
    assert!(outcome
        .results
        .iter()
        .all(|hit| (0.0..=1.0).contains(&hit.relevance_score)));
}

#[tokio::test]
async fn test_repeated_request_is_served_from_fast_tier() {
    let resources = fixture_resources().await;

    let first = resources.search.search(&request("glute bridge", true)).await;
    let second = resources
        .search
        .search(&request("  Glute   BRIDGE ", true))
        .await;

    assert!(!first.cache_hit());
    assert_eq!(second.cache_tier, Some(CacheTier::Fast));
    assert_eq!(first.results, second.results);
    assert_eq!(first.correction, second.correction);
}

#[tokio::test]
async fn test_semantic_timeout_leaves_fuzzy_results() {
    let mut collaborators = fixture_collaborators().await;
    collaborators.embedder = Arc::new(SlowEmbedder {
        delay: Duration::from_secs(5),
    });
    let resources = ServerResources::from_collaborators(Arc::new(test_config()), collaborators);

    let outcome = resources.search.search(&request("calf raise", true)).await;

    assert!(!outcome.results.is_empty());
    assert!(outcome
        .results
        .iter()
        .all(|hit| hit.match_sources == vec![MatchSource::Fuzzy]));
}

#[tokio::test]
async fn test_failing_index_degrades_to_fuzzy() {
    let mut collaborators = fixture_collaborators().await;
    collaborators.index = Arc::new(FailingIndex);
    let resources = ServerResources::from_collaborators(Arc::new(test_config()), collaborators);

    let outcome = resources.search.search(&request("hip thrust", true)).await;

    assert_eq!(outcome.results[0].name, "Dumbbell Hip Thrust");
    assert!(outcome
        .results
        .iter()
        .all(|hit| hit.match_sources == vec![MatchSource::Fuzzy]));
}

#[tokio::test]
async fn test_filters_apply_to_both_branches() {
    let resources = fixture_resources().await;
    let mut filtered = request("press", true);
    filtered.equipment = vec!["dumbbell".to_owned()];

    let outcome = resources.search.search(&filtered).await;

    assert!(!outcome.results.is_empty());
    assert!(outcome
        .results
        .iter()
        .all(|hit| hit.equipment.to_lowercase().contains("dumbbell")));
}

#[tokio::test]
async fn test_result_is_written_to_durable_tier() {
    let store = Arc::new(RecordingDurableStore::default());
    let mut collaborators = fixture_collaborators().await;
    collaborators.durable_cache = Some(store.clone());
    let resources = ServerResources::from_collaborators(Arc::new(test_config()), collaborators);

    let outcome = resources.search.search(&request("wall sit", false)).await;
    assert!(!outcome.cache_hit());

    assert!(store.wait_for_writes(1).await);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_unreachable_durable_tier_does_not_fail_search() {
    let mut collaborators = fixture_collaborators().await;
    collaborators.durable_cache = Some(Arc::new(RecordingDurableStore::failing()));
    let resources = ServerResources::from_collaborators(Arc::new(test_config()), collaborators);

    let first = resources.search.search(&request("clamshell", false)).await;
    let second = resources.search.search(&request("clamshell", false)).await;

    assert_eq!(first.results[0].name, "Clamshell");
    assert_eq!(second.cache_tier, Some(CacheTier::Fast));
}
