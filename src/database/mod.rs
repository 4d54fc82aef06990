// ABOUTME: Exercise reference store abstraction with SQLite and in-memory implementations
// ABOUTME: Read-only during requests; bulk lookups preserve caller-supplied id order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Exercise Reference Store
//!
//! The engine never writes exercise data while serving a request. Lookups by id
//! come from the vector index (neighbour order matters), listings by body part
//! back the selection fallback, and `list_all` feeds the trigram search and the
//! development vector index at startup.

mod catalog;
mod exercises;

pub use catalog::ExerciseCatalog;
pub use exercises::SqliteExerciseStore;

use crate::errors::AppResult;
use crate::models::ExerciseRecord;
use async_trait::async_trait;

/// Read access to the exercise library
#[async_trait]
pub trait ExerciseStore: Send + Sync {
    /// Fetch records by id, returned in the order of `ids`; unknown ids are skipped
    async fn get_by_ids(&self, ids: &[String]) -> AppResult<Vec<ExerciseRecord>>;

    /// List exercises whose body part matches any of `body_parts` (case-insensitive)
    async fn list_by_body_parts(
        &self,
        body_parts: &[String],
        limit: usize,
    ) -> AppResult<Vec<ExerciseRecord>>;

    /// Every exercise in the library
    async fn list_all(&self) -> AppResult<Vec<ExerciseRecord>>;
}
