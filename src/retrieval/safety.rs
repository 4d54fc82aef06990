// ABOUTME: Deterministic injury contraindication table and single-implement constraints
// ABOUTME: Applied before any AI reasoning so unsafe movements never reach the selector
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::equipment::{effective_equipment, normalize_label};
use crate::models::{ExerciseRecord, SingleImplementCounts};

/// Contraindication patterns for one injury
#[derive(Debug, Clone, Copy)]
pub struct InjuryRule {
    /// Canonical injury key
    pub key: &'static str,
    /// Substrings that activate this rule when found in the user's injury text
    pub aliases: &'static [&'static str],
    /// Disallowed substrings of the exercise name
    pub name_patterns: &'static [&'static str],
    /// Disallowed substrings of the target muscle
    pub target_patterns: &'static [&'static str],
    /// Disallowed substrings of the body part
    pub body_part_patterns: &'static [&'static str],
}

impl InjuryRule {
    /// Whether `record` matches any of this rule's patterns
    #[must_use]
    pub fn contraindicates(&self, record: &ExerciseRecord) -> bool {
        let name = record.name.to_lowercase();
        let target = record.target_muscle.to_lowercase();
        let body_part = record.body_part.to_lowercase();
        self.name_patterns.iter().any(|p| name.contains(p))
            || self.target_patterns.iter().any(|p| target.contains(p))
            || self.body_part_patterns.iter().any(|p| body_part.contains(p))
    }
}

/// Injury keyword table
pub const INJURY_TABLE: &[InjuryRule] = &[
    InjuryRule {
        key: "knee",
        aliases: &["knee", "acl", "mcl", "meniscus", "patella"],
        name_patterns: &[
            "squat",
            "lunge",
            "jump",
            "step-up",
            "step up",
            "pistol",
            "leg extension",
            "burpee",
            "plyo",
            "skater",
        ],
        target_patterns: &[],
        body_part_patterns: &[],
    },
    InjuryRule {
        key: "shoulder",
        aliases: &["shoulder", "rotator cuff", "labrum", "impingement"],
        name_patterns: &[
            "overhead press",
            "military press",
            "shoulder press",
            "push press",
            "upright row",
            "behind the neck",
            "behind neck",
            "handstand",
            "snatch",
            "jerk",
            "dip",
            "arnold press",
        ],
        target_patterns: &["delts"],
        body_part_patterns: &["shoulders"],
    },
    InjuryRule {
        key: "lower back",
        aliases: &[
            "lower back",
            "low back",
            "lumbar",
            "back pain",
            "herniated",
            "slipped disc",
            "sciatica",
        ],
        name_patterns: &[
            "deadlift",
            "good morning",
            "back extension",
            "hyperextension",
            "bent over row",
            "bent-over row",
            "superman",
            "swing",
            "clean",
            "snatch",
            "sit-up",
            "sit up",
        ],
        target_patterns: &["spine", "erector", "lower back"],
        body_part_patterns: &[],
    },
    InjuryRule {
        key: "wrist",
        aliases: &["wrist", "carpal"],
        name_patterns: &[
            "push-up",
            "push up",
            "pushup",
            "plank",
            "handstand",
            "front squat",
            "clean",
            "burpee",
            "wrist curl",
            "bear crawl",
            "mountain climber",
        ],
        target_patterns: &["forearms"],
        body_part_patterns: &["lower arms"],
    },
    InjuryRule {
        key: "elbow",
        aliases: &["elbow", "epicondyl", "golfer"],
        name_patterns: &[
            "skull crusher",
            "skullcrusher",
            "triceps extension",
            "tricep extension",
            "close grip bench",
            "close-grip bench",
            "dip",
            "preacher curl",
            "french press",
        ],
        target_patterns: &[],
        body_part_patterns: &[],
    },
    InjuryRule {
        key: "hip",
        aliases: &["hip", "groin", "labral"],
        name_patterns: &[
            "pistol",
            "deep squat",
            "sumo",
            "cossack",
            "lunge",
            "split squat",
            "hip adduction",
            "hip abduction",
            "frog",
        ],
        target_patterns: &["adductors", "abductors", "hip flexors"],
        body_part_patterns: &[],
    },
    InjuryRule {
        key: "ankle",
        aliases: &["ankle", "achilles", "plantar", "heel"],
        name_patterns: &[
            "jump",
            "hopping",
            "skip",
            "bound",
            "sprint",
            "running",
            "calf raise",
            "plyo",
            "skater",
            "burpee",
        ],
        target_patterns: &["calves"],
        body_part_patterns: &["lower legs"],
    },
    InjuryRule {
        key: "neck",
        aliases: &["neck", "cervical", "whiplash"],
        name_patterns: &[
            "shrug",
            "behind the neck",
            "behind neck",
            "headstand",
            "neck flexion",
            "neck extension",
            "wrestler bridge",
            "plough",
        ],
        target_patterns: &["traps", "levator scapulae"],
        body_part_patterns: &["neck"],
    },
];

/// Rules activated by free-text injuries; each rule appears at most once
#[must_use]
pub fn active_injury_rules(injuries: &[String]) -> Vec<&'static InjuryRule> {
    let texts: Vec<String> = injuries.iter().map(|i| i.to_lowercase()).collect();
    INJURY_TABLE
        .iter()
        .filter(|rule| {
            texts
                .iter()
                .any(|text| rule.aliases.iter().any(|alias| text.contains(alias)))
        })
        .collect()
}

/// Whether any active rule contraindicates `record`
#[must_use]
pub fn is_contraindicated(record: &ExerciseRecord, rules: &[&InjuryRule]) -> bool {
    rules.iter().any(|rule| rule.contraindicates(record))
}

/// Drop exercises that need a pair of implements the user only has one of
#[must_use]
pub fn passes_single_implement(record: &ExerciseRecord, counts: &SingleImplementCounts) -> bool {
    if !counts.single_dumbbell() && !counts.single_kettlebell() {
        return true;
    }
    let equipment = normalize_label(&effective_equipment(record));
    if counts.single_dumbbell() && equipment.contains("dumbbell") && !record.single_dumbbell_friendly
    {
        return false;
    }
    if counts.single_kettlebell()
        && equipment.contains("kettlebell")
        && !record.single_kettlebell_friendly
    {
        return false;
    }
    true
}
