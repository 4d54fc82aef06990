// ABOUTME: Per-request retrieval candidate with provenance and similarity
// ABOUTME: Created by a retrieval source and discarded once the response is built
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::ExerciseRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Retrieval pipeline that produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSource {
    /// Literal / trigram text search
    Fuzzy,
    /// Embedding similarity search
    Semantic,
}

impl MatchSource {
    /// Wire representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fuzzy => "fuzzy",
            Self::Semantic => "semantic",
        }
    }
}

impl fmt::Display for MatchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An exercise plus a provenance-tagged relevance score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    /// The exercise
    pub record: ExerciseRecord,
    /// Similarity in `[0, 1]`
    pub similarity: f64,
    /// Which source found it
    pub source: MatchSource,
}

impl CandidateResult {
    /// Build a candidate, clamping the similarity into `[0, 1]`
    #[must_use]
    pub fn new(record: ExerciseRecord, similarity: f64, source: MatchSource) -> Self {
        let similarity = if similarity.is_finite() {
            similarity.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            record,
            similarity,
            source,
        }
    }

    /// Semantic candidate from a cosine distance in `[0, 2]`
    #[must_use]
    pub fn from_distance(record: ExerciseRecord, distance: f64) -> Self {
        Self::new(record, 1.0 - distance / 2.0, MatchSource::Semantic)
    }

    /// Library id of the underlying exercise
    #[must_use]
    pub fn id(&self) -> &str {
        &self.record.id
    }

    /// Display name of the underlying exercise
    #[must_use]
    pub fn name(&self) -> &str {
        &self.record.name
    }
}
