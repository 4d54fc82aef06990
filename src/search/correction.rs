// ABOUTME: Query normalization and "did you mean" hints derived from the top search result
// ABOUTME: A hint is offered when the best hit's name does not contain the normalized query
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::models::ExerciseSearchHit;

/// Trim, lowercase, and collapse internal whitespace
#[must_use]
pub fn normalize_query(query: &str) -> String {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Name of the top hit when it differs from what the user typed
#[must_use]
pub fn suggest_correction(normalized_query: &str, results: &[ExerciseSearchHit]) -> Option<String> {
    let top = results.first()?;
    if normalized_query.is_empty() || top.name.to_lowercase().contains(normalized_query) {
        None
    } else {
        Some(top.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DifficultyLevel, MatchSource};

    fn hit(name: &str) -> ExerciseSearchHit {
        ExerciseSearchHit {
            id: "1".to_owned(),
            name: name.to_owned(),
            body_part: "chest".to_owned(),
            target_muscle: "pectorals".to_owned(),
            equipment: "Barbell".to_owned(),
            difficulty: DifficultyLevel::Intermediate,
            gif_url: None,
            video_url: None,
            relevance_score: 1.0,
            match_sources: vec![MatchSource::Fuzzy],
        }
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  Bench\tPRESS  "), "bench press");
        assert_eq!(normalize_query("   "), "");
    }

    #[test]
    fn test_suggests_top_name_for_misspelling() {
        assert_eq!(
            suggest_correction("benchpress", &[hit("Bench Press")]),
            Some("Bench Press".to_owned())
        );
        assert_eq!(suggest_correction("bench", &[hit("Bench Press")]), None);
        assert_eq!(suggest_correction("bench", &[]), None);
    }
}
