// ABOUTME: Fuzzy text search provider abstraction for literal and trigram name matching
// ABOUTME: Returns ranked fuzzy-tagged candidates filtered by equipment and body part
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

mod trigram;

pub use trigram::{trigram_similarity, TrigramFuzzySearch};

use crate::errors::AppResult;
use crate::models::{CandidateResult, SearchFilters};
use async_trait::async_trait;

/// Literal/trigram search over exercise names
#[async_trait]
pub trait FuzzySearchProvider: Send + Sync {
    /// Provider identifier for logs
    fn name(&self) -> &'static str;

    /// Up to `limit` candidates, best first, tagged `fuzzy`
    async fn search(
        &self,
        term: &str,
        filters: &SearchFilters,
        limit: usize,
    ) -> AppResult<Vec<CandidateResult>>;
}
