// ABOUTME: Exercise search HTTP route with query validation
// ABOUTME: GET /api/exercises/search returns fused fuzzy/semantic results; degraded searches still return 200
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::search_api::{DEFAULT_LIMIT, MAX_LIMIT, MAX_QUERY_CHARS, MIN_QUERY_CHARS};
use crate::errors::AppError;
use crate::models::{ExerciseSearchHit, SearchRequest};
use crate::resources::ServerResources;
use crate::search::normalize_query;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Header populated by the request-id layer
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Raw query string; every field is parsed by hand so bad values get the standard error body
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    /// Search text
    pub q: Option<String>,
    /// Comma-separated equipment filter
    pub equipment: Option<String>,
    /// Comma-separated body-part filter
    pub body_parts: Option<String>,
    /// Result limit
    pub limit: Option<String>,
    /// Whether to run the semantic branch
    pub semantic: Option<String>,
}

fn for_parameter(error: AppError, parameter: &str) -> AppError {
    error.with_details(serde_json::json!({ "parameter": parameter }))
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_owned)
            .collect()
    })
    .unwrap_or_default()
}

impl SearchQuery {
    /// Validate into a [`SearchRequest`]
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` / `ValueOutOfRange` for a missing or badly sized
    /// query, a non-numeric or out-of-range limit, or a non-boolean `semantic`
    pub fn validate(self) -> Result<SearchRequest, AppError> {
        let query = self
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| for_parameter(AppError::missing_field("q"), "q"))?;

        let chars = query.chars().count();
        if !(MIN_QUERY_CHARS..=MAX_QUERY_CHARS).contains(&chars) {
            return Err(for_parameter(
                AppError::out_of_range(format!(
                    "q must be between {MIN_QUERY_CHARS} and {MAX_QUERY_CHARS} characters, got {chars}"
                )),
                "q",
            ));
        }

        let limit = match self.limit.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_LIMIT,
            Some(raw) => {
                let limit: usize = raw.parse().map_err(|_| {
                    for_parameter(
                        AppError::invalid_input(format!("limit must be an integer, got '{raw}'")),
                        "limit",
                    )
                })?;
                if !(1..=MAX_LIMIT).contains(&limit) {
                    return Err(for_parameter(
                        AppError::out_of_range(format!(
                            "limit must be between 1 and {MAX_LIMIT}, got {limit}"
                        )),
                        "limit",
                    ));
                }
                limit
            }
        };

        let semantic = match self.semantic.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(raw) => match raw.to_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(for_parameter(
                        AppError::invalid_input(format!("semantic must be a boolean, got '{raw}'")),
                        "semantic",
                    ))
                }
            },
        };

        Ok(SearchRequest {
            query: query.to_owned(),
            equipment: split_list(self.equipment.as_deref()),
            body_parts: split_list(self.body_parts.as_deref()),
            limit,
            semantic,
        })
    }
}

/// Search response body
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Ranked hits
    pub results: Vec<ExerciseSearchHit>,
    /// Normalized query
    pub query: String,
    /// Number of hits
    pub total: usize,
    /// Server-side search time
    pub search_time_ms: u64,
    /// Whether a cache tier served the response
    pub cache_hit: bool,
    /// "Did you mean" hint
    pub correction: Option<String>,
}

/// Exercise search routes
pub struct ExerciseRoutes;

impl ExerciseRoutes {
    /// Create exercise routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/exercises/search", get(Self::handle_search))
            .with_state(resources)
    }

    /// Handle GET /api/exercises/search
    async fn handle_search(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<SearchQuery>,
    ) -> Result<Response, AppError> {
        let request = query.validate().map_err(|e| {
            match headers.get(REQUEST_ID_HEADER).and_then(|v| v.to_str().ok()) {
                Some(id) => e.with_request_id(id),
                None => e,
            }
        })?;
        let outcome = resources.search.search(&request).await;

        let response = SearchResponse {
            total: outcome.results.len(),
            query: normalize_query(&request.query),
            search_time_ms: outcome.search_time_ms,
            cache_hit: outcome.cache_hit(),
            correction: outcome.correction,
            results: outcome.results,
        };

        Ok((StatusCode::OK, Json(response)).into_response())
    }
}
