// ABOUTME: Route module organization for the exercise engine HTTP endpoints
// ABOUTME: Assembles search and health routes with tracing, request id, CORS, and timeout layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for the exercise engine
//!
//! Each domain module contains only route definitions and thin handlers that
//! delegate to the pipelines held by [`ServerResources`].

/// Exercise search routes
pub mod exercises;
/// Health check and readiness routes
pub mod health;

pub use exercises::{ExerciseRoutes, SearchQuery, SearchResponse};
pub use health::{HealthResponse, HealthRoutes, Readiness, ReadinessResponse};

use crate::constants::server::REQUEST_TIMEOUT_SECS;
use crate::resources::ServerResources;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::Level;

/// Full application router
pub fn router(resources: &Arc<ServerResources>) -> Router {
    Router::new()
        .merge(ExerciseRoutes::routes(Arc::clone(resources)))
        .merge(HealthRoutes::routes(Arc::clone(resources)))
        // Applied bottom-up: request id is set before the trace span opens
        .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
