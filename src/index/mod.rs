// ABOUTME: Vector similarity index abstraction returning neighbour ids with cosine distance
// ABOUTME: Distances are in [0, 2]; filters restrict neighbours by equipment and body part
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Similarity Index
//!
//! Production deployments point [`SimilarityIndex`] at a real vector store.
//! [`InMemoryVectorIndex`] is a brute-force development backend built at startup.

mod memory;

pub use memory::InMemoryVectorIndex;

use crate::errors::AppResult;
use crate::models::SearchFilters;
use async_trait::async_trait;

/// One nearest-neighbour hit
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbour {
    /// Exercise id
    pub id: String,
    /// Cosine distance in `[0, 2]`
    pub distance: f64,
}

/// Nearest-neighbour lookup over exercise embeddings
#[async_trait]
pub trait SimilarityIndex: Send + Sync {
    /// Up to `k` neighbours ordered by ascending distance
    async fn nearest(
        &self,
        vector: &[f32],
        k: usize,
        filters: &SearchFilters,
    ) -> AppResult<Vec<Neighbour>>;

    /// Number of indexed vectors
    fn len(&self) -> usize;

    /// Whether nothing is indexed
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
