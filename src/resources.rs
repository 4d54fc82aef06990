// ABOUTME: Shared server resources wiring stores, providers, and pipelines together
// ABOUTME: Built once at startup (or from injected collaborators in tests) and shared via Arc
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Server Resources
//!
// NOTE: All `.clone()` calls in this file are Arc clones of shared collaborators.
//!
//! Centralized container for the search and selection pipelines. Every
//! external collaborator sits behind a trait object so tests can inject
//! in-memory fakes through [`Collaborators`].

use crate::cache::{Clock, DurableCacheStore, RedisDurableStore, SearchCache, SystemClock};
use crate::config::ServerConfig;
use crate::database::{ExerciseCatalog, ExerciseStore, SqliteExerciseStore};
use crate::embedding::{EmbeddingProvider, OpenAiCompatibleEmbedder};
use crate::errors::AppResult;
use crate::fuzzy::{FuzzySearchProvider, TrigramFuzzySearch};
use crate::index::{InMemoryVectorIndex, SimilarityIndex};
use crate::llm::{LlmProvider, OpenAiCompatibleProvider};
use crate::retrieval::{
    ExerciseSelectionService, FinalSelector, LlmSelectionStrategy, SafetyEquipmentFilter,
    VectorCandidateRetriever,
};
use crate::search::{ExerciseSearchService, RankFusionEngine};
use std::sync::Arc;
use tracing::{info, warn};

/// External collaborators the pipelines depend on
#[derive(Clone)]
pub struct Collaborators {
    /// Exercise reference store
    pub store: Arc<dyn ExerciseStore>,
    /// Fuzzy text search
    pub fuzzy: Arc<dyn FuzzySearchProvider>,
    /// Query embedder
    pub embedder: Arc<dyn EmbeddingProvider>,
    /// Vector similarity index
    pub index: Arc<dyn SimilarityIndex>,
    /// Chat model for final selection; `None` selects by similarity only
    pub llm: Option<Arc<dyn LlmProvider>>,
    /// Shared durable cache tier
    pub durable_cache: Option<Arc<dyn DurableCacheStore>>,
    /// Time source for cache expiry
    pub clock: Arc<dyn Clock>,
}

/// Centralized resource container shared by HTTP handlers
#[derive(Clone)]
pub struct ServerResources {
    /// Effective configuration
    pub config: Arc<ServerConfig>,
    /// Exercise search pipeline
    pub search: Arc<ExerciseSearchService>,
    /// Workout exercise selection pipeline
    pub selection: Arc<ExerciseSelectionService>,
    /// Search cache (readiness and shutdown)
    pub cache: Arc<SearchCache>,
}

impl ServerResources {
    /// Assemble both pipelines from already constructed collaborators
    #[must_use]
    pub fn from_collaborators(config: Arc<ServerConfig>, collaborators: Collaborators) -> Self {
        let retrieval = &config.retrieval;
        let timeouts = retrieval.timeouts;

        let cache = Arc::new(SearchCache::new(
            &config.cache,
            collaborators.clock.clone(),
            collaborators.durable_cache.clone(),
            timeouts.durable_cache,
        ));

        let retriever = VectorCandidateRetriever::new(
            collaborators.embedder.clone(),
            collaborators.index.clone(),
            collaborators.store.clone(),
            timeouts,
        );

        let selector = collaborators.llm.clone().map_or_else(FinalSelector::similarity_only, |llm| {
            FinalSelector::new(Arc::new(LlmSelectionStrategy::new(llm, timeouts.reasoning)))
        });

        let selection = Arc::new(ExerciseSelectionService::new(
            retriever.clone(),
            collaborators.store.clone(),
            SafetyEquipmentFilter::new(retrieval.dedup_overlap_threshold),
            selector,
            timeouts.reference_store,
        ));

        let search = Arc::new(ExerciseSearchService::new(
            collaborators.fuzzy.clone(),
            retriever,
            RankFusionEngine::new(retrieval.fusion),
            cache.clone(),
            timeouts.fuzzy,
        ));

        Self {
            config,
            search,
            selection,
            cache,
        }
    }

    /// Connect to every configured backend and build the pipelines
    ///
    /// Optional backends (vector index, Redis, LLM) degrade with a warning
    /// instead of failing startup.
    ///
    /// # Errors
    ///
    /// Returns an error if the exercise store cannot be opened or an HTTP
    /// client cannot be created
    pub async fn from_config(config: ServerConfig) -> AppResult<Self> {
        let store = Arc::new(SqliteExerciseStore::connect(&config.database_url).await?);
        let catalog = ExerciseCatalog::load_from(store.as_ref()).await?;
        info!(exercises = catalog.len(), "Loaded exercise catalog");

        let embedder = Arc::new(OpenAiCompatibleEmbedder::new(config.embedding.clone())?);
        let index = match InMemoryVectorIndex::build(&catalog, embedder.as_ref()).await {
            Ok(index) => index,
            Err(e) => {
                warn!(error = %e, "Vector index build failed, semantic retrieval disabled until restart");
                InMemoryVectorIndex::default()
            }
        };

        let fuzzy = TrigramFuzzySearch::new(catalog)
            .with_min_similarity(config.retrieval.fuzzy_min_similarity);

        let durable_cache: Option<Arc<dyn DurableCacheStore>> = match &config.cache.redis_url {
            Some(url) => match RedisDurableStore::connect(url, &config.cache.redis_connection).await
            {
                Ok(store) => Some(Arc::new(store)),
                Err(e) => {
                    warn!(error = %e, "Redis unavailable, running with the in-process cache only");
                    None
                }
            },
            None => None,
        };

        let llm: Option<Arc<dyn LlmProvider>> = if config.llm.use_llm_selection {
            Some(Arc::new(OpenAiCompatibleProvider::new(config.llm.clone())?))
        } else {
            None
        };

        let collaborators = Collaborators {
            store,
            fuzzy: Arc::new(fuzzy),
            embedder,
            index: Arc::new(index),
            llm,
            durable_cache,
            clock: Arc::new(SystemClock),
        };

        Ok(Self::from_collaborators(Arc::new(config), collaborators))
    }
}
