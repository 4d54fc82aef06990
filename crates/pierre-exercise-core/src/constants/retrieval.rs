// ABOUTME: Retrieval, final-selection, and rank-fusion tuning defaults
// ABOUTME: All values are overridable through RetrievalConfig environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Neighbours fetched per requested exercise
pub const OVER_FETCH_FACTOR: usize = 4;

/// Upper bound on neighbours fetched for one selection
pub const MAX_OVER_FETCH: usize = 30;

/// Candidates shown to the reasoning collaborator
pub const SELECTOR_CANDIDATE_CAP: usize = 20;

/// Token overlap (fraction of the smaller set) at which two names collapse
pub const DEDUP_OVERLAP_THRESHOLD: f64 = 0.8;

/// RRF smoothing constant
pub const RRF_K: f64 = 60.0;

/// RRF weight for the fuzzy source
pub const FUZZY_WEIGHT: f64 = 1.0;

/// RRF weight for the semantic source
pub const SEMANTIC_WEIGHT: f64 = 1.2;

/// Minimum trigram similarity for a fuzzy hit
pub const FUZZY_MIN_SIMILARITY: f64 = 0.3;

/// Collaborator timeouts in milliseconds
pub mod timeouts {
    /// Embedding call
    pub const EMBEDDING_MS: u64 = 3_000;
    /// Vector index lookup
    pub const INDEX_MS: u64 = 2_000;
    /// Fuzzy search call
    pub const FUZZY_MS: u64 = 2_000;
    /// Reasoning (LLM) call
    pub const REASONING_MS: u64 = 15_000;
    /// Durable cache read
    pub const DURABLE_CACHE_MS: u64 = 500;
    /// Reference store read
    pub const REFERENCE_STORE_MS: u64 = 2_000;
}

/// Sets/reps/rest defaults by fitness level
pub mod prescription {
    /// Beginner: sets, reps, rest seconds
    pub const BEGINNER: (u32, u32, u32) = (2, 10, 90);
    /// Intermediate: sets, reps, rest seconds
    pub const INTERMEDIATE: (u32, u32, u32) = (3, 12, 60);
    /// Advanced: sets, reps, rest seconds
    pub const ADVANCED: (u32, u32, u32) = (4, 12, 45);
}
