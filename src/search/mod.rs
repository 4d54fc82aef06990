// ABOUTME: Natural-language exercise search combining fuzzy and semantic retrieval
// ABOUTME: Parallel sources fused with weighted RRF behind a two-tier cache
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Query normalization and spelling hints
pub mod correction;
/// Reciprocal Rank Fusion
pub mod fusion;
/// Search entrypoint
pub mod service;

pub use correction::{normalize_query, suggest_correction};
pub use fusion::{FusedResult, RankFusionEngine};
pub use service::{ExerciseSearchService, SearchOutcome};
