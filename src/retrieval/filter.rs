// ABOUTME: Deterministic safety and equipment filter applied before any reasoning step
// ABOUTME: Equipment, single-implement, injury, and avoid-list checks then near-duplicate collapsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::dedup::{collapse_near_duplicates, is_avoided};
use super::equipment::{effective_equipment, EquipmentSet};
use super::safety::{active_injury_rules, is_contraindicated, passes_single_implement};
use crate::constants::retrieval::DEDUP_OVERLAP_THRESHOLD;
use crate::models::{CandidateResult, SelectionRequest};
use tracing::debug;

/// Pure filter over retrieval candidates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafetyEquipmentFilter {
    dedup_threshold: f64,
}

impl Default for SafetyEquipmentFilter {
    fn default() -> Self {
        Self::new(DEDUP_OVERLAP_THRESHOLD)
    }
}

impl SafetyEquipmentFilter {
    /// Filter collapsing names whose token overlap reaches `dedup_threshold`
    #[must_use]
    pub const fn new(dedup_threshold: f64) -> Self {
        Self { dedup_threshold }
    }

    /// Overlap threshold used for near-duplicate collapsing and avoid matching
    #[must_use]
    pub const fn dedup_threshold(&self) -> f64 {
        self.dedup_threshold
    }

    /// Keep candidates the user can safely do with their equipment
    ///
    /// Output is ordered by descending similarity (stable) with near-duplicates
    /// collapsed to their highest-similarity instance.
    #[must_use]
    pub fn apply(
        &self,
        candidates: Vec<CandidateResult>,
        request: &SelectionRequest,
    ) -> Vec<CandidateResult> {
        let input = candidates.len();
        let equipment = EquipmentSet::from_selections(&request.equipment);
        let injuries = active_injury_rules(&request.injuries);
        let counts = request.single_implement_counts;

        let mut kept: Vec<CandidateResult> = candidates
            .into_iter()
            .filter(|c| equipment.allows(&effective_equipment(&c.record)))
            .filter(|c| passes_single_implement(&c.record, &counts))
            .filter(|c| !is_contraindicated(&c.record, &injuries))
            .filter(|c| !is_avoided(c.name(), &request.avoid, self.dedup_threshold))
            .collect();
        let after_rules = kept.len();

        kept.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        let kept = collapse_near_duplicates(kept, CandidateResult::name, self.dedup_threshold);

        debug!(
            input,
            after_rules,
            output = kept.len(),
            active_injuries = injuries.len(),
            "Applied safety/equipment filter"
        );
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        DifficultyLevel, ExerciseRecord, MatchSource, SingleImplementCounts,
    };
    use crate::retrieval::safety::INJURY_TABLE;

    fn candidate(name: &str, equipment: Option<&str>, similarity: f64) -> CandidateResult {
        CandidateResult::new(
            ExerciseRecord {
                id: name.to_lowercase().replace(' ', "-"),
                name: name.to_owned(),
                body_part: "upper legs".to_owned(),
                target_muscle: "quads".to_owned(),
                secondary_muscles: vec![],
                equipment: equipment.map(str::to_owned),
                difficulty: DifficultyLevel::Beginner,
                instructions: vec![],
                gif_url: None,
                video_url: None,
                single_dumbbell_friendly: false,
                single_kettlebell_friendly: false,
            },
            similarity,
            MatchSource::Semantic,
        )
    }

    fn request(equipment: &[&str], injuries: &[&str]) -> SelectionRequest {
        SelectionRequest {
            focus_area: "legs".to_owned(),
            equipment: equipment.iter().map(|s| (*s).to_owned()).collect(),
            count: 5,
            injuries: injuries.iter().map(|s| (*s).to_owned()).collect(),
            ..SelectionRequest::default()
        }
    }

    #[test]
    fn test_equipment_and_bodyweight() {
        let filter = SafetyEquipmentFilter::default();
        let out = filter.apply(
            vec![
                candidate("Barbell Deadlift", Some("barbell"), 0.9),
                candidate("Dumbbell Romanian Deadlift", None, 0.8),
                candidate("Glute Bridge", None, 0.7),
            ],
            &request(&["Dumbbells"], &[]),
        );
        let names: Vec<&str> = out.iter().map(CandidateResult::name).collect();
        assert_eq!(names, vec!["Dumbbell Romanian Deadlift", "Glute Bridge"]);
    }

    #[test]
    fn test_sorted_by_similarity_and_collapsed() {
        let filter = SafetyEquipmentFilter::default();
        let out = filter.apply(
            vec![
                candidate("Glute Bridge", None, 0.4),
                candidate("Glute Bridge (female)", None, 0.6),
                candidate("Calf Raise", None, 0.5),
            ],
            &request(&["bodyweight only"], &[]),
        );
        let names: Vec<&str> = out.iter().map(CandidateResult::name).collect();
        assert_eq!(names, vec!["Glute Bridge (female)", "Calf Raise"]);
    }

    #[test]
    fn test_single_dumbbell_requires_friendly_flag() {
        let mut friendly = candidate("Goblet Squat", Some("dumbbell"), 0.5);
        friendly.record.single_dumbbell_friendly = true;
        let pair_only = candidate("Dumbbell Step Down", Some("dumbbell"), 0.9);

        let mut req = request(&["dumbbell"], &[]);
        req.single_implement_counts = SingleImplementCounts {
            dumbbells: Some(1),
            kettlebells: None,
        };

        let out = SafetyEquipmentFilter::default().apply(vec![pair_only, friendly], &req);
        assert_eq!(out.len(), 1);
        assert!(out.iter().all(|c| c.record.single_dumbbell_friendly));
    }

    #[test]
    fn test_avoid_list() {
        let mut req = request(&["full gym"], &[]);
        req.avoid = vec!["deadlift".to_owned()];
        let out = SafetyEquipmentFilter::default().apply(
            vec![
                candidate("Barbell Deadlift", Some("barbell"), 0.9),
                candidate("Leg Press", Some("leg press machine"), 0.8),
            ],
            &req,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name(), "Leg Press");
    }

    #[test]
    fn test_no_output_matches_any_active_injury() {
        let pool: Vec<CandidateResult> = [
            "Barbell Back Squat",
            "Walking Lunge",
            "Box Jump",
            "Overhead Press",
            "Good Morning",
            "Wrist Curl",
            "Skull Crusher",
            "Hip Thrust",
            "Calf Raise",
            "Neck Flexion",
            "Plank",
        ]
        .iter()
        .map(|n| candidate(n, Some("barbell"), 0.5))
        .collect();

        let filter = SafetyEquipmentFilter::default();
        for rule in INJURY_TABLE {
            let req = request(&["full gym"], &[rule.aliases[0]]);
            let out = filter.apply(pool.clone(), &req);
            assert!(
                out.iter().all(|c| !rule.contraindicates(&c.record)),
                "{} leaked through",
                rule.key
            );
        }
    }
}
