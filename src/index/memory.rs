// ABOUTME: Brute-force in-memory cosine index over catalog embeddings
// ABOUTME: Development backend; built by embedding every catalog exercise at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{Neighbour, SimilarityIndex};
use crate::database::ExerciseCatalog;
use crate::embedding::EmbeddingProvider;
use crate::errors::AppResult;
use crate::models::{ExerciseRecord, SearchFilters};
use crate::retrieval::equipment::{effective_equipment, matches_filters};
use async_trait::async_trait;
use tracing::info;

/// Embeddings are requested in chunks of this size while building
const BUILD_BATCH_SIZE: usize = 64;

#[derive(Debug, Clone)]
struct IndexEntry {
    record: ExerciseRecord,
    vector: Vec<f32>,
    norm: f64,
}

/// Brute-force cosine similarity index
#[derive(Debug, Clone, Default)]
pub struct InMemoryVectorIndex {
    entries: Vec<IndexEntry>,
}

fn norm(vector: &[f32]) -> f64 {
    vector
        .iter()
        .map(|v| f64::from(*v) * f64::from(*v))
        .sum::<f64>()
        .sqrt()
}

/// Cosine distance clamped into `[0, 2]`
fn cosine_distance(a: &[f32], a_norm: f64, b: &[f32], b_norm: f64) -> f64 {
    let dot: f64 = a
        .iter()
        .zip(b)
        .map(|(x, y)| f64::from(*x) * f64::from(*y))
        .sum();
    (1.0 - dot / (a_norm * b_norm)).clamp(0.0, 2.0)
}

/// Text embedded for each exercise
fn document_text(record: &ExerciseRecord) -> String {
    let mut text = format!(
        "{} {} {} {}",
        record.name,
        record.body_part,
        record.target_muscle,
        effective_equipment(record)
    );
    if !record.secondary_muscles.is_empty() {
        text.push(' ');
        text.push_str(&record.secondary_muscles.join(" "));
    }
    text
}

impl InMemoryVectorIndex {
    /// Build from precomputed `(record, vector)` pairs; zero vectors are skipped
    #[must_use]
    pub fn from_vectors(pairs: Vec<(ExerciseRecord, Vec<f32>)>) -> Self {
        let entries = pairs
            .into_iter()
            .filter_map(|(record, vector)| {
                let n = norm(&vector);
                (n > 0.0).then_some(IndexEntry {
                    record,
                    vector,
                    norm: n,
                })
            })
            .collect();
        Self { entries }
    }

    /// Embed every catalog exercise
    ///
    /// # Errors
    ///
    /// Returns an error if the embedding provider fails
    pub async fn build(
        catalog: &ExerciseCatalog,
        embedder: &dyn EmbeddingProvider,
    ) -> AppResult<Self> {
        let mut pairs = Vec::with_capacity(catalog.len());
        for chunk in catalog.records().chunks(BUILD_BATCH_SIZE) {
            let texts: Vec<String> = chunk.iter().map(document_text).collect();
            let vectors = embedder.embed_batch(&texts).await?;
            pairs.extend(chunk.iter().cloned().zip(vectors));
        }
        let index = Self::from_vectors(pairs);
        info!(
            indexed = index.entries.len(),
            catalog = catalog.len(),
            provider = embedder.name(),
            "Built in-memory vector index"
        );
        Ok(index)
    }
}

#[async_trait]
impl SimilarityIndex for InMemoryVectorIndex {
    async fn nearest(
        &self,
        vector: &[f32],
        k: usize,
        filters: &SearchFilters,
    ) -> AppResult<Vec<Neighbour>> {
        let query_norm = norm(vector);
        if k == 0 || query_norm == 0.0 {
            return Ok(Vec::new());
        }

        let mut scored: Vec<Neighbour> = self
            .entries
            .iter()
            .filter(|e| e.vector.len() == vector.len())
            .filter(|e| matches_filters(&e.record, filters))
            .map(|e| Neighbour {
                id: e.record.id.clone(),
                distance: cosine_distance(vector, query_norm, &e.vector, e.norm),
            })
            .collect();

        scored.sort_by(|a, b| a.distance.total_cmp(&b.distance).then_with(|| a.id.cmp(&b.id)));
        scored.truncate(k);
        Ok(scored)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DifficultyLevel;

    fn record(id: &str, body_part: &str, equipment: &str) -> ExerciseRecord {
        ExerciseRecord {
            id: id.to_owned(),
            name: format!("Exercise {id}"),
            body_part: body_part.to_owned(),
            target_muscle: String::new(),
            secondary_muscles: vec![],
            equipment: Some(equipment.to_owned()),
            difficulty: DifficultyLevel::Beginner,
            instructions: vec![],
            gif_url: None,
            video_url: None,
            single_dumbbell_friendly: false,
            single_kettlebell_friendly: false,
        }
    }

    #[tokio::test]
    async fn test_nearest_orders_by_distance() {
        let index = InMemoryVectorIndex::from_vectors(vec![
            (record("a", "chest", "barbell"), vec![1.0, 0.0]),
            (record("b", "chest", "dumbbell"), vec![0.0, 1.0]),
            (record("c", "back", "dumbbell"), vec![-1.0, 0.0]),
            (record("zero", "back", "dumbbell"), vec![0.0, 0.0]),
        ]);
        assert_eq!(index.len(), 3);

        let hits = index
            .nearest(&[1.0, 0.1], 3, &SearchFilters::default())
            .await
            .unwrap();
        let ids: Vec<&str> = hits.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(hits.iter().all(|n| (0.0..=2.0).contains(&n.distance)));
    }

    #[tokio::test]
    async fn test_nearest_applies_filters() {
        let index = InMemoryVectorIndex::from_vectors(vec![
            (record("a", "chest", "barbell"), vec![1.0, 0.0]),
            (record("b", "chest", "dumbbell"), vec![0.9, 0.1]),
        ]);
        let filters = SearchFilters {
            equipment: vec!["Dumbbells".to_owned()],
            body_parts: vec![],
        };
        let hits = index.nearest(&[1.0, 0.0], 5, &filters).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "b");
    }
}
