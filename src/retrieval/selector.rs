// ABOUTME: Final exercise selection through a pluggable strategy with a deterministic fallback
// ABOUTME: LLM picks are sanitized, topped up by similarity, and mapped to workout entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::retrieval::SELECTOR_CANDIDATE_CAP;
use crate::errors::{Collaborator, RetrievalError};
use crate::llm::{ChatRequest, LlmProvider};
use crate::models::{CandidateResult, FitnessLevel, SelectionRequest, WorkoutExercise};
use crate::retrieval::equipment::effective_equipment;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// What a strategy needs to know about the request
#[derive(Debug, Clone, Copy)]
pub struct SelectionContext<'a> {
    /// Exercises wanted (already bounded by the candidate count)
    pub count: usize,
    /// Focus area key
    pub focus_area: &'a str,
    /// Experience level
    pub fitness_level: FitnessLevel,
    /// Training goals
    pub goals: &'a [String],
    /// Active injuries, free text
    pub injuries: &'a [String],
}

impl<'a> SelectionContext<'a> {
    /// Context for `request` choosing `count` exercises
    #[must_use]
    pub fn new(request: &'a SelectionRequest, count: usize) -> Self {
        Self {
            count,
            focus_area: &request.focus_area,
            fitness_level: request.fitness_level,
            goals: &request.goals,
            injuries: &request.injuries,
        }
    }
}

/// Chooses which candidates make the final set
#[async_trait]
pub trait SelectionStrategy: Send + Sync {
    /// Strategy identifier for logs
    fn name(&self) -> &'static str;

    /// Indices into `candidates`, in the order they should appear
    async fn select(
        &self,
        candidates: &[CandidateResult],
        context: &SelectionContext<'_>,
    ) -> Result<Vec<usize>, RetrievalError>;
}

/// Top `count` candidates by similarity
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilaritySelectionStrategy;

impl SimilaritySelectionStrategy {
    /// Candidate indices ordered by descending similarity, ties by position
    #[must_use]
    pub fn ranked(candidates: &[CandidateResult]) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..candidates.len()).collect();
        indices.sort_by(|&a, &b| candidates[b].similarity.total_cmp(&candidates[a].similarity));
        indices
    }
}

#[async_trait]
impl SelectionStrategy for SimilaritySelectionStrategy {
    fn name(&self) -> &'static str {
        "similarity"
    }

    async fn select(
        &self,
        candidates: &[CandidateResult],
        context: &SelectionContext<'_>,
    ) -> Result<Vec<usize>, RetrievalError> {
        let mut indices = Self::ranked(candidates);
        indices.truncate(context.count);
        Ok(indices)
    }
}

#[derive(Debug, Deserialize)]
struct IndicesPayload {
    indices: Vec<i64>,
}

/// Asks a chat model to pick exercises from the candidate list
#[derive(Clone)]
pub struct LlmSelectionStrategy {
    provider: Arc<dyn LlmProvider>,
    timeout: Duration,
}

impl LlmSelectionStrategy {
    /// Strategy calling `provider` with a per-call deadline
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    fn system_prompt() -> &'static str {
        "You are a strength and conditioning coach choosing exercises for a workout. \
         Never choose an exercise that could aggravate the user's injuries. \
         Prefer a balanced mix of movement patterns and avoid near-identical exercises. \
         Respond with JSON only, in the form {\"indices\": [0, 3, 5]}, using the \
         candidate numbers shown."
    }

    fn user_prompt(candidates: &[CandidateResult], context: &SelectionContext<'_>) -> String {
        let mut prompt = format!(
            "Choose exactly {} exercises for a {} workout.\nFitness level: {}\n",
            context.count,
            context.focus_area,
            context.fitness_level.as_str()
        );
        if !context.goals.is_empty() {
            let _ = writeln!(prompt, "Goals: {}", context.goals.join(", "));
        }
        if context.injuries.is_empty() {
            prompt.push_str("Injuries: none\n");
        } else {
            let _ = writeln!(
                prompt,
                "Injuries (must be respected): {}",
                context.injuries.join(", ")
            );
        }
        prompt.push_str("\nCandidates:\n");
        for (i, c) in candidates.iter().enumerate() {
            let _ = writeln!(
                prompt,
                "{i}. {} | equipment: {} | target: {} | body part: {}",
                c.name(),
                effective_equipment(&c.record),
                c.record.target_muscle,
                c.record.body_part
            );
        }
        let _ = write!(
            prompt,
            "\nReturn exactly {} distinct indices between 0 and {} as {{\"indices\": [...]}}.",
            context.count,
            candidates.len().saturating_sub(1)
        );
        prompt
    }

    /// Extract indices from a model reply
    ///
    /// Accepts a bare `{"indices": [...]}` object, the same object embedded in
    /// prose or a code fence, or a bare JSON array. Negative numbers are dropped.
    ///
    /// # Errors
    ///
    /// Returns `InvalidReasoningOutput` when no index list can be found
    pub fn parse_indices(content: &str) -> Result<Vec<usize>, RetrievalError> {
        let trimmed = content.trim();

        let raw: Vec<i64> = serde_json::from_str::<IndicesPayload>(trimmed)
            .map(|p| p.indices)
            .or_else(|_| {
                slice_between(trimmed, '{', '}')
                    .ok_or(())
                    .and_then(|s| serde_json::from_str::<IndicesPayload>(s).map_err(|_| ()))
                    .map(|p| p.indices)
            })
            .or_else(|()| {
                slice_between(trimmed, '[', ']')
                    .ok_or(())
                    .and_then(|s| serde_json::from_str::<Vec<i64>>(s).map_err(|_| ()))
            })
            .map_err(|()| {
                RetrievalError::invalid_reasoning(format!(
                    "no index list in reply: {}",
                    trimmed.chars().take(120).collect::<String>()
                ))
            })?;

        Ok(raw
            .into_iter()
            .filter_map(|i| usize::try_from(i).ok())
            .collect())
    }
}

/// Substring from the first `open` to the last `close`, inclusive
fn slice_between(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

#[async_trait]
impl SelectionStrategy for LlmSelectionStrategy {
    fn name(&self) -> &'static str {
        "llm"
    }

    async fn select(
        &self,
        candidates: &[CandidateResult],
        context: &SelectionContext<'_>,
    ) -> Result<Vec<usize>, RetrievalError> {
        let request = ChatRequest::new(Self::system_prompt(), Self::user_prompt(candidates, context))
            .expecting_json();

        let response = super::call_with_timeout(
            Collaborator::Reasoning,
            self.timeout,
            self.provider.complete(&request),
        )
        .await?;

        if response.truncated() {
            warn!(
                provider = self.provider.name(),
                model = %response.model,
                "Selection reply hit the token cap"
            );
        }
        debug!(
            provider = self.provider.name(),
            chars = response.content.len(),
            "Received selection reply"
        );
        Self::parse_indices(&response.content)
    }
}

/// Bounded, ordered final selection
#[derive(Clone)]
pub struct FinalSelector {
    strategy: Arc<dyn SelectionStrategy>,
}

impl FinalSelector {
    /// Selector asking `strategy` first
    #[must_use]
    pub fn new(strategy: Arc<dyn SelectionStrategy>) -> Self {
        Self { strategy }
    }

    /// Similarity-only selector
    #[must_use]
    pub fn similarity_only() -> Self {
        Self::new(Arc::new(SimilaritySelectionStrategy))
    }

    /// Name of the primary strategy
    #[must_use]
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Largest set one selection returns; the candidate window bounds it
    #[must_use]
    pub const fn clamp_count(requested: usize) -> usize {
        if requested > SELECTOR_CANDIDATE_CAP {
            SELECTOR_CANDIDATE_CAP
        } else {
            requested
        }
    }

    /// Keep in-range first occurrences, cap at `n`, then top up by similarity
    fn sanitize(indices: &[usize], candidates: &[CandidateResult], n: usize) -> Vec<usize> {
        let mut seen = HashSet::with_capacity(n);
        let mut chosen: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < candidates.len() && seen.insert(i))
            .take(n)
            .collect();

        if !chosen.is_empty() && chosen.len() < n {
            for i in SimilaritySelectionStrategy::ranked(candidates) {
                if chosen.len() == n {
                    break;
                }
                if seen.insert(i) {
                    chosen.push(i);
                }
            }
        }
        chosen
    }

    /// Indices of the final set within `candidates` (capped at the selector
    /// window), exactly `min(request.count, window)` long
    pub async fn choose(
        &self,
        candidates: &[CandidateResult],
        request: &SelectionRequest,
    ) -> Vec<usize> {
        let window = &candidates[..candidates.len().min(SELECTOR_CANDIDATE_CAP)];
        let n = Self::clamp_count(request.count).min(window.len());
        if n == 0 {
            return Vec::new();
        }
        let context = SelectionContext::new(request, n);

        let picked = match self.strategy.select(window, &context).await {
            Ok(indices) => {
                let valid = Self::sanitize(&indices, window, n);
                if valid.is_empty() {
                    warn!(
                        strategy = self.strategy.name(),
                        returned = indices.len(),
                        "Strategy returned no usable indices, using similarity order"
                    );
                }
                valid
            }
            Err(e) => {
                warn!(
                    strategy = self.strategy.name(),
                    error = %e,
                    "Selection strategy failed, using similarity order"
                );
                Vec::new()
            }
        };

        if picked.is_empty() {
            let mut fallback = SimilaritySelectionStrategy::ranked(window);
            fallback.truncate(n);
            fallback
        } else {
            picked
        }
    }

    /// Final workout entries for `request`
    pub async fn select(
        &self,
        candidates: Vec<CandidateResult>,
        request: &SelectionRequest,
    ) -> Vec<WorkoutExercise> {
        let indices = self.choose(&candidates, request).await;
        indices
            .into_iter()
            .map(|i| to_workout_exercise(&candidates[i], request.fitness_level))
            .collect()
    }
}

/// Map a candidate to a workout slot with level-based prescription
#[must_use]
pub fn to_workout_exercise(candidate: &CandidateResult, level: FitnessLevel) -> WorkoutExercise {
    let (sets, reps, rest_seconds) = level.prescription();
    let record = &candidate.record;
    let muscle_group = if record.target_muscle.trim().is_empty() {
        record.body_part.clone()
    } else {
        record.target_muscle.clone()
    };
    WorkoutExercise {
        name: record.name.clone(),
        sets,
        reps,
        rest_seconds,
        equipment: effective_equipment(record),
        muscle_group,
        notes: record.instructions.first().cloned().unwrap_or_default(),
        gif_url: record.gif_url.clone(),
        video_url: record.video_url.clone(),
        library_id: record.id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DifficultyLevel, ExerciseRecord, MatchSource};

    fn candidates(similarities: &[f64]) -> Vec<CandidateResult> {
        similarities
            .iter()
            .enumerate()
            .map(|(i, s)| {
                CandidateResult::new(
                    ExerciseRecord {
                        id: format!("ex-{i}"),
                        name: format!("Exercise {i}"),
                        body_part: "chest".to_owned(),
                        target_muscle: String::new(),
                        secondary_muscles: vec![],
                        equipment: None,
                        difficulty: DifficultyLevel::Beginner,
                        instructions: vec!["Brace first.".to_owned()],
                        gif_url: None,
                        video_url: None,
                        single_dumbbell_friendly: false,
                        single_kettlebell_friendly: false,
                    },
                    *s,
                    MatchSource::Semantic,
                )
            })
            .collect()
    }

    struct FixedStrategy(Result<Vec<usize>, RetrievalError>);

    #[async_trait]
    impl SelectionStrategy for FixedStrategy {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn select(
            &self,
            _candidates: &[CandidateResult],
            _context: &SelectionContext<'_>,
        ) -> Result<Vec<usize>, RetrievalError> {
            self.0.clone()
        }
    }

    fn request(count: usize) -> SelectionRequest {
        SelectionRequest {
            focus_area: "upper_body".to_owned(),
            count,
            ..SelectionRequest::default()
        }
    }

    #[test]
    fn test_parse_indices_variants() {
        assert_eq!(
            LlmSelectionStrategy::parse_indices(r#"{"indices": [2, 0, 1]}"#).unwrap(),
            vec![2, 0, 1]
        );
        assert_eq!(
            LlmSelectionStrategy::parse_indices("Sure!\n```json\n{\"indices\": [4, 1]}\n```")
                .unwrap(),
            vec![4, 1]
        );
        assert_eq!(
            LlmSelectionStrategy::parse_indices("picks: [3, -1, 5]").unwrap(),
            vec![3, 5]
        );
        assert!(matches!(
            LlmSelectionStrategy::parse_indices("I would pick the bench press"),
            Err(RetrievalError::InvalidReasoningOutput { .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_indices_are_dropped_and_topped_up() {
        let pool = candidates(&[0.9, 0.5, 0.8, 0.7]);
        let selector = FinalSelector::new(Arc::new(FixedStrategy(Ok(vec![1, 1, 40]))));
        let chosen = selector.choose(&pool, &request(3)).await;
        assert_eq!(chosen, vec![1, 0, 2]);
    }

    #[tokio::test]
    async fn test_strategy_error_falls_back_to_similarity() {
        let pool = candidates(&[0.2, 0.9, 0.5]);
        let selector = FinalSelector::new(Arc::new(FixedStrategy(Err(
            RetrievalError::timed_out(Collaborator::Reasoning, Duration::from_millis(10)),
        ))));
        assert_eq!(selector.choose(&pool, &request(2)).await, vec![1, 2]);

        let all_invalid = FinalSelector::new(Arc::new(FixedStrategy(Ok(vec![99]))));
        assert_eq!(all_invalid.choose(&pool, &request(2)).await, vec![1, 2]);
    }

    #[test]
    fn test_clamp_count_to_window() {
        assert_eq!(FinalSelector::clamp_count(6), 6);
        assert_eq!(FinalSelector::clamp_count(SELECTOR_CANDIDATE_CAP), SELECTOR_CANDIDATE_CAP);
        assert_eq!(FinalSelector::clamp_count(30), SELECTOR_CANDIDATE_CAP);
    }

    #[tokio::test]
    async fn test_count_bounded_by_window_and_prescription() {
        let pool = candidates(&[0.5; 25]);
        let selector = FinalSelector::similarity_only();
        let mut req = request(30);
        req.fitness_level = FitnessLevel::Beginner;

        let workout = selector.select(pool, &req).await;
        assert_eq!(workout.len(), SELECTOR_CANDIDATE_CAP);
        let first = &workout[0];
        assert_eq!((first.sets, first.reps, first.rest_seconds), (2, 10, 90));
        assert_eq!(first.muscle_group, "chest");
        assert_eq!(first.notes, "Brace first.");
        assert_eq!(first.equipment, "Bodyweight");
        assert_eq!(first.library_id, "ex-0");
    }
}
