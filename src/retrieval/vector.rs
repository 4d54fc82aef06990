// ABOUTME: Embedding plus nearest-neighbour retrieval of candidate exercises
// ABOUTME: Every collaborator call runs under its own deadline; failures become RetrievalError values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::call_with_timeout;
use super::query::build_selection_query;
use crate::config::CollaboratorTimeouts;
use crate::constants::retrieval::{MAX_OVER_FETCH, OVER_FETCH_FACTOR};
use crate::database::ExerciseStore;
use crate::embedding::EmbeddingProvider;
use crate::errors::{Collaborator, RetrievalError};
use crate::index::{Neighbour, SimilarityIndex};
use crate::models::{CandidateResult, ExerciseRecord, SearchFilters, SelectionRequest};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Semantic candidate source backed by an embedding model and a similarity index
#[derive(Clone)]
pub struct VectorCandidateRetriever {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn SimilarityIndex>,
    store: Arc<dyn ExerciseStore>,
    timeouts: CollaboratorTimeouts,
}

impl VectorCandidateRetriever {
    /// Create a retriever over the given collaborators
    #[must_use]
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn SimilarityIndex>,
        store: Arc<dyn ExerciseStore>,
        timeouts: CollaboratorTimeouts,
    ) -> Self {
        Self {
            embedder,
            index,
            store,
            timeouts,
        }
    }

    /// Neighbours fetched for a selection of `count` exercises
    #[must_use]
    pub fn over_fetch(count: usize) -> usize {
        count.saturating_mul(OVER_FETCH_FACTOR).min(MAX_OVER_FETCH)
    }

    /// Candidates for a workout selection, nearest first
    ///
    /// # Errors
    ///
    /// Returns `EmptyCandidates` when nothing is found and
    /// `CollaboratorUnavailable` when a collaborator fails or times out
    #[instrument(skip(self, request), fields(focus_area = %request.focus_area, count = request.count))]
    pub async fn retrieve(
        &self,
        request: &SelectionRequest,
    ) -> Result<Vec<CandidateResult>, RetrievalError> {
        let k = Self::over_fetch(request.count);
        if k == 0 {
            return Err(RetrievalError::EmptyCandidates);
        }
        let query = build_selection_query(request);
        debug!(query = %query, k, "Retrieving selection candidates");
        self.run(&query, &SearchFilters::default(), k).await
    }

    /// Semantic branch of exercise search: the query is embedded as-is and the
    /// filters are pushed down to the index
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::retrieve`]
    #[instrument(skip(self, filters))]
    pub async fn search(
        &self,
        query: &str,
        filters: &SearchFilters,
        limit: usize,
    ) -> Result<Vec<CandidateResult>, RetrievalError> {
        if limit == 0 || query.trim().is_empty() {
            return Err(RetrievalError::EmptyCandidates);
        }
        self.run(query, filters, limit).await
    }

    async fn run(
        &self,
        text: &str,
        filters: &SearchFilters,
        k: usize,
    ) -> Result<Vec<CandidateResult>, RetrievalError> {
        let vector = call_with_timeout(
            Collaborator::Embedding,
            self.timeouts.embedding,
            self.embedder.embed(text),
        )
        .await?;

        let neighbours = call_with_timeout(
            Collaborator::Index,
            self.timeouts.index,
            self.index.nearest(&vector, k, filters),
        )
        .await?;

        self.hydrate(neighbours).await
    }

    /// Load records for neighbours in one store call, keeping neighbour order
    async fn hydrate(
        &self,
        neighbours: Vec<Neighbour>,
    ) -> Result<Vec<CandidateResult>, RetrievalError> {
        if neighbours.is_empty() {
            return Err(RetrievalError::EmptyCandidates);
        }

        let ids: Vec<String> = neighbours.iter().map(|n| n.id.clone()).collect();
        let records = call_with_timeout(
            Collaborator::ReferenceStore,
            self.timeouts.reference_store,
            self.store.get_by_ids(&ids),
        )
        .await?;

        let mut by_id: HashMap<String, ExerciseRecord> =
            records.into_iter().map(|r| (r.id.clone(), r)).collect();
        let candidates: Vec<CandidateResult> = neighbours
            .into_iter()
            .filter_map(|n| {
                by_id
                    .remove(&n.id)
                    .map(|record| CandidateResult::from_distance(record, n.distance))
            })
            .collect();

        if candidates.is_empty() {
            return Err(RetrievalError::EmptyCandidates);
        }
        debug!(candidates = candidates.len(), "Hydrated semantic candidates");
        Ok(candidates)
    }
}
