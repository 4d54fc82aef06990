// ABOUTME: Core data models shared by the retrieval, selection, and search layers
// ABOUTME: Exercise reference records, per-request candidates, and request shapes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

mod candidate;
mod exercise;
mod request;
mod search;
mod workout;

pub use candidate::{CandidateResult, MatchSource};
pub use exercise::{DifficultyLevel, ExerciseRecord};
pub use request::{
    FitnessLevel, SearchFilters, SearchRequest, SelectionRequest, SingleImplementCounts,
};
pub use search::ExerciseSearchHit;
pub use workout::WorkoutExercise;
