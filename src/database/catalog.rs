// ABOUTME: In-memory exercise catalog snapshot implementing ExerciseStore
// ABOUTME: Backs the trigram search, the dev vector index, and tests without a database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::ExerciseStore;
use crate::errors::AppResult;
use crate::models::ExerciseRecord;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Immutable snapshot of the exercise library
#[derive(Debug, Clone, Default)]
pub struct ExerciseCatalog {
    records: Arc<Vec<ExerciseRecord>>,
    by_id: Arc<HashMap<String, usize>>,
}

impl ExerciseCatalog {
    /// Build a catalog; later duplicates of an id replace earlier ones in lookups
    #[must_use]
    pub fn new(records: Vec<ExerciseRecord>) -> Self {
        let by_id = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();
        Self {
            records: Arc::new(records),
            by_id: Arc::new(by_id),
        }
    }

    /// Snapshot the full contents of another store
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be listed
    pub async fn load_from(store: &dyn ExerciseStore) -> AppResult<Self> {
        Ok(Self::new(store.list_all().await?))
    }

    /// All records in insertion order
    #[must_use]
    pub fn records(&self) -> &[ExerciseRecord] {
        &self.records
    }

    /// Look up one record
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ExerciseRecord> {
        self.by_id.get(id).and_then(|&i| self.records.get(i))
    }

    /// Number of exercises
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog has no exercises
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl ExerciseStore for ExerciseCatalog {
    async fn get_by_ids(&self, ids: &[String]) -> AppResult<Vec<ExerciseRecord>> {
        Ok(ids.iter().filter_map(|id| self.get(id)).cloned().collect())
    }

    async fn list_by_body_parts(
        &self,
        body_parts: &[String],
        limit: usize,
    ) -> AppResult<Vec<ExerciseRecord>> {
        let wanted: Vec<String> = body_parts.iter().map(|b| b.trim().to_lowercase()).collect();
        Ok(self
            .records
            .iter()
            .filter(|r| wanted.contains(&r.body_part.trim().to_lowercase()))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> AppResult<Vec<ExerciseRecord>> {
        Ok(self.records.to_vec())
    }
}
