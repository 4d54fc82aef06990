// ABOUTME: Exercise selection pipeline from vector retrieval through safety filtering to final choice
// ABOUTME: Pure rule tables live here alongside the async retriever, selector, and service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Exercise Retrieval
//!
//! Selection runs in three stages:
//!
//! 1. [`VectorCandidateRetriever`] embeds a query built from the focus area,
//!    equipment, level and goals, then loads the nearest exercises.
//! 2. [`SafetyEquipmentFilter`] removes anything the user cannot or should
//!    not do and collapses near-duplicate names.
//! 3. [`FinalSelector`] picks the final set through a [`SelectionStrategy`],
//!    falling back to similarity order when the strategy misbehaves.
//!
//! Collaborator failures never escape [`ExerciseSelectionService`].

/// Near-duplicate name normalization and collapsing
pub mod dedup;
/// Equipment inference and umbrella expansion
pub mod equipment;
/// Equipment, single-implement, injury and avoid-list filtering
pub mod filter;
/// Focus-area and goal keyword expansion
pub mod query;
/// Injury contraindication rules
pub mod safety;
/// Strategy-driven final selection
pub mod selector;
/// Selection entrypoint
pub mod service;
/// Embedding + similarity index retrieval
pub mod vector;

pub use filter::SafetyEquipmentFilter;
pub use selector::{
    FinalSelector, LlmSelectionStrategy, SelectionContext, SelectionStrategy,
    SimilaritySelectionStrategy,
};
pub use service::ExerciseSelectionService;
pub use vector::VectorCandidateRetriever;

use crate::errors::{AppResult, Collaborator, RetrievalError};
use std::future::Future;
use std::time::Duration;

/// Run a collaborator call under a deadline, mapping failure and elapsed time
/// to [`RetrievalError::CollaboratorUnavailable`]
///
/// # Errors
///
/// Returns `CollaboratorUnavailable` when the call fails or the deadline passes
pub async fn call_with_timeout<T, F>(
    collaborator: Collaborator,
    limit: Duration,
    call: F,
) -> Result<T, RetrievalError>
where
    F: Future<Output = AppResult<T>> + Send,
{
    match tokio::time::timeout(limit, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(RetrievalError::unavailable(collaborator, e)),
        Err(_) => Err(RetrievalError::timed_out(collaborator, limit)),
    }
}
