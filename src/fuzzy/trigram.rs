// ABOUTME: Trigram fuzzy search over an in-memory catalog snapshot
// ABOUTME: Padded word trigrams with Jaccard similarity plus a whitespace-insensitive comparison
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::FuzzySearchProvider;
use crate::constants::retrieval::FUZZY_MIN_SIMILARITY;
use crate::database::ExerciseCatalog;
use crate::errors::AppResult;
use crate::models::{CandidateResult, MatchSource, SearchFilters};
use crate::retrieval::equipment::matches_filters;
use async_trait::async_trait;
use std::collections::HashSet;

/// Added when the name literally contains the query
const LITERAL_CONTAINMENT_BONUS: f64 = 0.25;

/// Trigrams of one word padded like `pg_trgm` ("  word ")
fn word_trigrams(word: &str, into: &mut HashSet<[char; 3]>) {
    let padded: Vec<char> = "  ".chars().chain(word.chars()).chain(" ".chars()).collect();
    for w in padded.windows(3) {
        into.insert([w[0], w[1], w[2]]);
    }
}

fn trigrams(text: &str) -> HashSet<[char; 3]> {
    let mut set = HashSet::new();
    for word in text
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        word_trigrams(word, &mut set);
    }
    set
}

fn jaccard(a: &HashSet<[char; 3]>, b: &HashSet<[char; 3]>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let shared = a.intersection(b).count() as f64;
    let union = (a.len() + b.len()) as f64 - shared;
    shared / union
}

fn compact(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// `pg_trgm`-style similarity, also comparing with whitespace removed so
/// "benchpress" still matches "Bench Press"
#[must_use]
pub fn trigram_similarity(query: &str, name: &str) -> f64 {
    let by_words = jaccard(&trigrams(query), &trigrams(name));
    let by_compact = jaccard(&trigrams(&compact(query)), &trigrams(&compact(name)));
    by_words.max(by_compact)
}

/// Fuzzy search over a catalog snapshot
#[derive(Debug, Clone)]
pub struct TrigramFuzzySearch {
    catalog: ExerciseCatalog,
    min_similarity: f64,
}

impl TrigramFuzzySearch {
    /// Search `catalog` with the default minimum similarity
    #[must_use]
    pub const fn new(catalog: ExerciseCatalog) -> Self {
        Self {
            catalog,
            min_similarity: FUZZY_MIN_SIMILARITY,
        }
    }

    /// Override the minimum similarity
    #[must_use]
    pub const fn with_min_similarity(mut self, min_similarity: f64) -> Self {
        self.min_similarity = min_similarity;
        self
    }

    fn score(query: &str, query_lower: &str, name: &str) -> f64 {
        let mut score = trigram_similarity(query, name);
        if !query_lower.is_empty() && name.to_lowercase().contains(query_lower) {
            score += LITERAL_CONTAINMENT_BONUS;
        }
        score.min(1.0)
    }
}

#[async_trait]
impl FuzzySearchProvider for TrigramFuzzySearch {
    fn name(&self) -> &'static str {
        "trigram"
    }

    async fn search(
        &self,
        term: &str,
        filters: &SearchFilters,
        limit: usize,
    ) -> AppResult<Vec<CandidateResult>> {
        let query_lower = term.trim().to_lowercase();
        if query_lower.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(f64, &crate::models::ExerciseRecord)> = self
            .catalog
            .records()
            .iter()
            .filter(|r| matches_filters(r, filters))
            .map(|r| (Self::score(term, &query_lower, &r.name), r))
            .filter(|(score, _)| *score >= self.min_similarity)
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.name.cmp(&b.1.name)));
        scored.truncate(limit);

        Ok(scored
            .into_iter()
            .map(|(score, r)| CandidateResult::new(r.clone(), score, MatchSource::Fuzzy))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DifficultyLevel, ExerciseRecord};

    fn record(id: &str, name: &str, equipment: &str) -> ExerciseRecord {
        ExerciseRecord {
            id: id.to_owned(),
            name: name.to_owned(),
            body_part: "chest".to_owned(),
            target_muscle: "pectorals".to_owned(),
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

    #[test]
    fn test_identical_text_scores_one() {
        assert!((trigram_similarity("Bench Press", "bench press") - 1.0).abs() < 1e-9);
        assert!(trigram_similarity("xyz", "Bench Press") < 0.1);
    }

    #[test]
    fn test_whitespace_insensitive() {
        assert!((trigram_similarity("benchpress", "Bench Press") - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_search_ranks_closest_first_and_filters() {
        let search = TrigramFuzzySearch::new(ExerciseCatalog::new(vec![
            record("1", "Dumbbell Bench Press", "dumbbell"),
            record("2", "Bench Press", "barbell"),
            record("3", "Cable Crossover", "cable"),
        ]));

        let all = search
            .search("benchpress", &SearchFilters::default(), 10)
            .await
            .unwrap();
        assert_eq!(all[0].name(), "Bench Press");
        assert!(all.iter().all(|c| c.source == MatchSource::Fuzzy));
        assert!(all.iter().all(|c| c.name() != "Cable Crossover"));

        let filters = SearchFilters {
            equipment: vec!["dumbbell".to_owned()],
            body_parts: vec![],
        };
        let dumbbell_only = search.search("bench press", &filters, 10).await.unwrap();
        assert_eq!(dumbbell_only.len(), 1);
        assert_eq!(dumbbell_only[0].id(), "1");
    }
}
