// ABOUTME: Ranked exercise search hit returned by the search endpoint and cached
// ABOUTME: Flattened record fields plus fused relevance score and contributing sources
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{DifficultyLevel, ExerciseRecord, MatchSource};
use serde::{Deserialize, Serialize};

/// One ranked search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSearchHit {
    /// Library id
    pub id: String,
    /// Display name
    pub name: String,
    /// Coarse body region
    pub body_part: String,
    /// Primary muscle
    pub target_muscle: String,
    /// Equipment label (declared or inferred)
    pub equipment: String,
    /// Difficulty
    pub difficulty: DifficultyLevel,
    /// Animated demonstration
    pub gif_url: Option<String>,
    /// Video demonstration
    pub video_url: Option<String>,
    /// Fused score normalized to `[0, 1]`
    pub relevance_score: f64,
    /// Sources that returned this exercise
    pub match_sources: Vec<MatchSource>,
}

impl ExerciseSearchHit {
    /// Build a hit from a record, its resolved equipment label, and fusion output
    #[must_use]
    pub fn new(
        record: ExerciseRecord,
        equipment: String,
        relevance_score: f64,
        match_sources: Vec<MatchSource>,
    ) -> Self {
        Self {
            id: record.id,
            name: record.name,
            body_part: record.body_part,
            target_muscle: record.target_muscle,
            equipment,
            difficulty: record.difficulty,
            gif_url: record.gif_url,
            video_url: record.video_url,
            relevance_score,
            match_sources,
        }
    }
}
