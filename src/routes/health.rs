// ABOUTME: Liveness and readiness endpoints for the exercise engine
// ABOUTME: Readiness pings the durable cache tier and reports the active selection strategy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! The durable cache tier is optional, so an unreachable tier reports
//! `degraded` with a 200 rather than taking the instance out of rotation.

use crate::cache::DurableStatus;
use crate::constants::service_names;
use crate::resources::ServerResources;
use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// `GET /health` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `healthy` while the process serves requests
    pub status: String,
    /// Service name
    pub service: String,
    /// Crate version
    pub version: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
}

/// Overall readiness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Readiness {
    /// Every configured backend answered
    Ready,
    /// Serving without the durable cache tier
    Degraded,
}

impl From<&DurableStatus> for Readiness {
    fn from(status: &DurableStatus) -> Self {
        match status {
            DurableStatus::Unavailable { .. } => Self::Degraded,
            DurableStatus::Disabled | DurableStatus::Healthy { .. } => Self::Ready,
        }
    }
}

/// `GET /ready` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Overall readiness
    pub status: Readiness,
    /// Durable cache tier state
    pub durable_cache: DurableStatus,
    /// Live entries in the in-process tier
    pub fast_cache_entries: usize,
    /// Primary final-selection strategy
    pub selection_strategy: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
}

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// `/health` and `/ready`
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::health))
            .route("/ready", get(Self::ready))
            .with_state(resources)
    }

    async fn health() -> Json<HealthResponse> {
        Json(HealthResponse {
            status: "healthy".to_owned(),
            service: service_names::PIERRE_EXERCISE_SERVER.to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        })
    }

    async fn ready(State(resources): State<Arc<ServerResources>>) -> Json<ReadinessResponse> {
        let durable = resources.cache.durable_status().await;
        Json(ReadinessResponse {
            status: Readiness::from(&durable),
            durable_cache: durable,
            fast_cache_entries: resources.cache.fast_tier().len(),
            selection_strategy: resources.selection.strategy_name().to_owned(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        })
    }
}
