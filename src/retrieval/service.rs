// ABOUTME: Exercise selection entrypoint composing retrieval, safety filtering, and final selection
// ABOUTME: Falls back to a body-part listing from the reference store when vector retrieval is short
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::call_with_timeout;
use super::query::expand_focus_area;
use super::{FinalSelector, SafetyEquipmentFilter, VectorCandidateRetriever};
use crate::database::ExerciseStore;
use crate::errors::Collaborator;
use crate::models::{CandidateResult, MatchSource, SelectionRequest, WorkoutExercise};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Rows requested from the reference store when falling back
const FALLBACK_LISTING_LIMIT: usize = 100;

/// Selects safe, equipment-compatible exercises for generated workouts
#[derive(Clone)]
pub struct ExerciseSelectionService {
    retriever: VectorCandidateRetriever,
    store: Arc<dyn ExerciseStore>,
    filter: SafetyEquipmentFilter,
    selector: FinalSelector,
    store_timeout: Duration,
}

impl ExerciseSelectionService {
    /// Compose the selection pipeline
    #[must_use]
    pub fn new(
        retriever: VectorCandidateRetriever,
        store: Arc<dyn ExerciseStore>,
        filter: SafetyEquipmentFilter,
        selector: FinalSelector,
        store_timeout: Duration,
    ) -> Self {
        Self {
            retriever,
            store,
            filter,
            selector,
            store_timeout,
        }
    }

    /// Name of the active final selection strategy
    #[must_use]
    pub fn strategy_name(&self) -> &'static str {
        self.selector.strategy_name()
    }

    /// Choose up to `request.count` exercises
    ///
    /// `count` is clamped to the selector window (20). Within that bound the
    /// result has exactly `count` entries whenever that many safe candidates
    /// exist. Collaborator failures degrade the result and are only logged.
    #[instrument(skip(self, request), fields(focus_area = %request.focus_area, count = request.count))]
    pub async fn select_exercises(&self, request: &SelectionRequest) -> Vec<WorkoutExercise> {
        if request.count == 0 {
            return Vec::new();
        }
        let clamped;
        let request = if FinalSelector::clamp_count(request.count) < request.count {
            clamped = SelectionRequest {
                count: FinalSelector::clamp_count(request.count),
                ..request.clone()
            };
            warn!(
                requested = request.count,
                selecting = clamped.count,
                "Requested count exceeds the selection window, clamping"
            );
            &clamped
        } else {
            request
        };

        let mut pool = match self.retriever.retrieve(request).await {
            Ok(candidates) => self.filter.apply(candidates, request),
            Err(e) => {
                warn!(error = %e, "Vector retrieval unavailable, using reference listing");
                Vec::new()
            }
        };

        if pool.len() < request.count {
            let fallback = self.fallback_candidates(request).await;
            if !fallback.is_empty() {
                let mut seen: HashSet<String> = pool.iter().map(|c| c.id().to_owned()).collect();
                pool.extend(
                    fallback
                        .into_iter()
                        .filter(|c| seen.insert(c.id().to_owned())),
                );
                pool = self.filter.apply(pool, request);
            }
        }

        let selected = self.selector.select(pool, request).await;
        info!(
            selected = selected.len(),
            strategy = self.selector.strategy_name(),
            "Selected exercises"
        );
        selected
    }

    /// Focus-area body-part listing tagged fuzzy with zero similarity
    async fn fallback_candidates(&self, request: &SelectionRequest) -> Vec<CandidateResult> {
        let body_parts = expand_focus_area(&request.focus_area).body_parts;
        match call_with_timeout(
            Collaborator::ReferenceStore,
            self.store_timeout,
            self.store
                .list_by_body_parts(&body_parts, FALLBACK_LISTING_LIMIT),
        )
        .await
        {
            Ok(records) => records
                .into_iter()
                .map(|r| CandidateResult::new(r, 0.0, MatchSource::Fuzzy))
                .collect(),
            Err(e) => {
                warn!(error = %e, "Reference listing unavailable");
                Vec::new()
            }
        }
    }
}
