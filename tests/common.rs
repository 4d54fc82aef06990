// ABOUTME: Shared fixtures and fake collaborators for integration tests
// ABOUTME: Fixture exercise catalog, deterministic embedder, failing/slow doubles, scripted LLM
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `pierre_exercise_engine`

use async_trait::async_trait;
use pierre_exercise_engine::{
    cache::{DurableCacheStore, SystemClock},
    config::ServerConfig,
    database::ExerciseCatalog,
    embedding::EmbeddingProvider,
    errors::{AppError, AppResult, RetrievalError},
    fuzzy::TrigramFuzzySearch,
    index::{InMemoryVectorIndex, Neighbour, SimilarityIndex},
    llm::{ChatRequest, ChatResponse, LlmProvider},
    models::{DifficultyLevel, ExerciseRecord, SearchFilters},
    resources::{Collaborators, ServerResources},
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Build one fixture record
pub fn record(
    id: &str,
    name: &str,
    body_part: &str,
    target_muscle: &str,
    equipment: Option<&str>,
) -> ExerciseRecord {
    ExerciseRecord {
        id: id.to_owned(),
        name: name.to_owned(),
        body_part: body_part.to_owned(),
        target_muscle: target_muscle.to_owned(),
        secondary_muscles: vec![],
        equipment: equipment.map(ToOwned::to_owned),
        difficulty: DifficultyLevel::Intermediate,
        instructions: vec![format!("Perform the {name} with control.")],
        gif_url: Some(format!("https://cdn.example.com/{id}.gif")),
        video_url: None,
        single_dumbbell_friendly: false,
        single_kettlebell_friendly: false,
    }
}

fn single_dumbbell(mut r: ExerciseRecord) -> ExerciseRecord {
    r.single_dumbbell_friendly = true;
    r
}

/// Small catalog covering chest presses, knee-loading leg work, and knee-safe leg work
pub fn fixture_records() -> Vec<ExerciseRecord> {
    vec![
        record("ex-001", "Bench Press", "chest", "pectorals", Some("Barbell")),
        record("ex-002", "Dumbbell Bench Press", "chest", "pectorals", Some("Dumbbell")),
        single_dumbbell(record("ex-003", "Incline Dumbbell Press", "chest", "pectorals", None)),
        record("ex-004", "Push Up", "chest", "pectorals", None),
        record("ex-005", "Barbell Back Squat", "upper legs", "quads", Some("Barbell")),
        single_dumbbell(record("ex-006", "Goblet Squat", "upper legs", "quads", Some("Dumbbell"))),
        record("ex-007", "Dumbbell Walking Lunge", "upper legs", "quads", None),
        record("ex-008", "Box Jump", "upper legs", "quads", None),
        single_dumbbell(record("ex-009", "Dumbbell Step-Up", "upper legs", "quads", None)),
        record("ex-010", "Jump Squat", "upper legs", "quads", None),
        record("ex-011", "Glute Bridge", "glutes", "glutes", None),
        record("ex-012", "Dumbbell Romanian Deadlift", "upper legs", "hamstrings", None),
        record("ex-013", "Nordic Hamstring Curl", "upper legs", "hamstrings", None),
        single_dumbbell(record("ex-014", "Dumbbell Calf Raise", "lower legs", "calves", None)),
        record("ex-015", "Single Leg Calf Raise", "lower legs", "calves", None),
        single_dumbbell(record("ex-016", "Dumbbell Hip Thrust", "glutes", "glutes", None)),
        record("ex-017", "Clamshell", "glutes", "abductors", Some("Bodyweight")),
        record("ex-018", "Wall Sit", "upper legs", "quads", None),
        single_dumbbell(record(
            "ex-019",
            "Dumbbell Single Leg Deadlift",
            "upper legs",
            "hamstrings",
            None,
        )),
        record("ex-020", "Leg Press", "upper legs", "quads", None),
    ]
}

/// Fixture catalog snapshot
pub fn fixture_catalog() -> ExerciseCatalog {
    ExerciseCatalog::new(fixture_records())
}

/// Names that must never appear for a knee injury
pub const KNEE_PATTERNS: &[&str] = &["squat", "lunge", "jump", "step-up", "step up"];

/// Deterministic bag-of-words embedder: each token increments one hashed dimension
#[derive(Debug, Default)]
pub struct HashingEmbedder;

impl HashingEmbedder {
    pub const DIMS: usize = 64;

    pub fn vector(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; Self::DIMS];
        for token in text
            .to_lowercase()
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let bucket = token
                .bytes()
                .fold(7_usize, |h, b| h.wrapping_mul(31).wrapping_add(usize::from(b)))
                % Self::DIMS;
            vector[bucket] += 1.0;
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    fn name(&self) -> &'static str {
        "hashing"
    }

    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        Ok(Self::vector(text))
    }
}

/// Embedder that answers only after `delay`
#[derive(Debug)]
pub struct SlowEmbedder {
    pub delay: Duration,
}

#[async_trait]
impl EmbeddingProvider for SlowEmbedder {
    fn name(&self) -> &'static str {
        "slow"
    }

    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        tokio::time::sleep(self.delay).await;
        Ok(HashingEmbedder::vector(text))
    }
}

/// Index whose every query fails
#[derive(Debug, Default)]
pub struct FailingIndex;

#[async_trait]
impl SimilarityIndex for FailingIndex {
    async fn nearest(
        &self,
        _vector: &[f32],
        _k: usize,
        _filters: &SearchFilters,
    ) -> AppResult<Vec<Neighbour>> {
        Err(AppError::external_unavailable("vector-index", "connection refused"))
    }

    fn len(&self) -> usize {
        0
    }
}

/// LLM returning a fixed reply (or error) and counting calls
#[derive(Debug)]
pub struct ScriptedLlm {
    reply: Result<String, String>,
    calls: AtomicUsize,
}

impl ScriptedLlm {
    pub fn replying(content: impl Into<String>) -> Self {
        Self {
            reply: Ok(content.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, _request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(content) => Ok(ChatResponse {
                content: content.clone(),
                model: "scripted-model".to_owned(),
                finish_reason: Some("stop".to_owned()),
            }),
            Err(message) => Err(AppError::external_unavailable("scripted", message.clone())),
        }
    }
}

/// In-memory durable store that records writes; can be switched to fail
#[derive(Debug, Default)]
pub struct RecordingDurableStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    writes: AtomicUsize,
    failing: bool,
}

impl RecordingDurableStore {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Wait until at least `n` writes landed (background writes are spawned)
    pub async fn wait_for_writes(&self, n: usize) -> bool {
        for _ in 0..100 {
            if self.writes() >= n {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }
}

#[async_trait]
impl DurableCacheStore for RecordingDurableStore {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, RetrievalError> {
        if self.failing {
            return Err(RetrievalError::cache_unavailable("recording store offline"));
        }
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>, _ttl: Duration) -> Result<(), RetrievalError> {
        if self.failing {
            return Err(RetrievalError::cache_unavailable("recording store offline"));
        }
        self.entries.lock().unwrap().insert(key.to_owned(), value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn ping(&self) -> Result<(), RetrievalError> {
        if self.failing {
            Err(RetrievalError::cache_unavailable("recording store offline"))
        } else {
            Ok(())
        }
    }
}

/// Configuration with short collaborator timeouts and no background sweeps
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.cache.enable_background_cleanup = false;
    config.retrieval.timeouts.embedding = Duration::from_millis(200);
    config.retrieval.timeouts.index = Duration::from_millis(200);
    config.retrieval.timeouts.fuzzy = Duration::from_millis(500);
    config.retrieval.timeouts.reasoning = Duration::from_millis(200);
    config.retrieval.timeouts.durable_cache = Duration::from_millis(200);
    config.retrieval.timeouts.reference_store = Duration::from_millis(500);
    config
}

/// Collaborators over the fixture catalog with a prebuilt hashing index
pub async fn fixture_collaborators() -> Collaborators {
    init_test_logging();
    let catalog = fixture_catalog();
    let embedder = Arc::new(HashingEmbedder);
    let index = InMemoryVectorIndex::build(&catalog, embedder.as_ref())
        .await
        .expect("hashing embedder never fails");

    Collaborators {
        store: Arc::new(catalog.clone()),
        fuzzy: Arc::new(TrigramFuzzySearch::new(catalog)),
        embedder,
        index: Arc::new(index),
        llm: None,
        durable_cache: None,
        clock: Arc::new(SystemClock),
    }
}

/// Resources over the fixture catalog with the default test configuration
pub async fn fixture_resources() -> Arc<ServerResources> {
    Arc::new(ServerResources::from_collaborators(
        Arc::new(test_config()),
        fixture_collaborators().await,
    ))
}
