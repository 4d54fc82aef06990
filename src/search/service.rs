// ABOUTME: Exercise search entrypoint: cache check, parallel fuzzy and semantic retrieval, fusion
// ABOUTME: Either branch may fail or time out; the other branch still produces a result
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{normalize_query, suggest_correction, RankFusionEngine};
use crate::cache::{CacheKey, CacheTier, CachedSearch, SearchCache};
use crate::errors::{Collaborator, RetrievalError};
use crate::fuzzy::FuzzySearchProvider;
use crate::models::{CandidateResult, ExerciseSearchHit, SearchRequest};
use crate::retrieval::equipment::effective_equipment;
use crate::retrieval::{call_with_timeout, VectorCandidateRetriever};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Result of one search call
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Ranked hits
    pub results: Vec<ExerciseSearchHit>,
    /// "Did you mean" hint
    pub correction: Option<String>,
    /// Tier that served the response, when cached
    pub cache_tier: Option<CacheTier>,
    /// Wall time spent in the service
    pub search_time_ms: u64,
}

impl SearchOutcome {
    /// Whether the response came from cache
    #[must_use]
    pub const fn cache_hit(&self) -> bool {
        self.cache_tier.is_some()
    }
}

/// Fused fuzzy + semantic exercise search
#[derive(Clone)]
pub struct ExerciseSearchService {
    fuzzy: Arc<dyn FuzzySearchProvider>,
    semantic: VectorCandidateRetriever,
    fusion: RankFusionEngine,
    cache: Arc<SearchCache>,
    fuzzy_timeout: Duration,
}

impl ExerciseSearchService {
    /// Compose the search pipeline
    #[must_use]
    pub fn new(
        fuzzy: Arc<dyn FuzzySearchProvider>,
        semantic: VectorCandidateRetriever,
        fusion: RankFusionEngine,
        cache: Arc<SearchCache>,
        fuzzy_timeout: Duration,
    ) -> Self {
        Self {
            fuzzy,
            semantic,
            fusion,
            cache,
            fuzzy_timeout,
        }
    }

    /// Cache handle shared with readiness checks
    #[must_use]
    pub fn cache(&self) -> &Arc<SearchCache> {
        &self.cache
    }

    /// Run a validated search request
    #[instrument(skip(self, request), fields(query = %request.query, limit = request.limit, semantic = request.semantic))]
    pub async fn search(&self, request: &SearchRequest) -> SearchOutcome {
        let started = Instant::now();
        let key = CacheKey::for_request(request);

        if let Some((cached, tier)) = self.cache.get(&key).await {
            debug!(?tier, "Serving search from cache");
            return SearchOutcome {
                results: cached.results,
                correction: cached.correction,
                cache_tier: Some(tier),
                search_time_ms: elapsed_ms(started),
            };
        }

        let query = normalize_query(&request.query);
        let filters = request.filters();
        let limit = request.limit;

        let fuzzy_branch = call_with_timeout(
            Collaborator::FuzzySearch,
            self.fuzzy_timeout,
            self.fuzzy.search(&query, &filters, limit),
        );
        let semantic_branch = async {
            if request.semantic {
                self.semantic.search(&query, &filters, limit).await
            } else {
                Ok(Vec::new())
            }
        };
        let (fuzzy, semantic) = tokio::join!(fuzzy_branch, semantic_branch);

        let fuzzy = recover(fuzzy, "fuzzy");
        let semantic = recover(semantic, "semantic");

        let results: Vec<ExerciseSearchHit> = self
            .fusion
            .fuse(&fuzzy, &semantic, limit)
            .into_iter()
            .map(|fused| {
                let equipment = effective_equipment(&fused.record);
                ExerciseSearchHit::new(fused.record, equipment, fused.score, fused.sources)
            })
            .collect();
        let correction = suggest_correction(&query, &results);

        info!(
            fuzzy = fuzzy.len(),
            semantic = semantic.len(),
            fused = results.len(),
            "Search complete"
        );

        self.cache.put(
            &key,
            CachedSearch {
                results: results.clone(),
                correction: correction.clone(),
            },
        );

        SearchOutcome {
            results,
            correction,
            cache_tier: None,
            search_time_ms: elapsed_ms(started),
        }
    }
}

/// A failed branch contributes nothing to fusion
fn recover(
    branch: Result<Vec<CandidateResult>, RetrievalError>,
    label: &'static str,
) -> Vec<CandidateResult> {
    match branch {
        Ok(candidates) => candidates,
        Err(RetrievalError::EmptyCandidates) => Vec::new(),
        Err(e) => {
            warn!(branch = label, error = %e, "Search branch degraded");
            Vec::new()
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
