// ABOUTME: Focus-area and goal keyword expansion into a retrieval query string
// ABOUTME: Unknown focus areas pass through verbatim as both body part and keyword
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::models::SelectionRequest;

/// Body parts and descriptive keywords for one focus area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusExpansion {
    /// Body parts as stored in the reference library
    pub body_parts: Vec<String>,
    /// Extra words for the embedding query
    pub keywords: Vec<String>,
}

struct FocusRule {
    keys: &'static [&'static str],
    body_parts: &'static [&'static str],
    keywords: &'static [&'static str],
}

const FOCUS_TABLE: &[FocusRule] = &[
    FocusRule {
        keys: &["full_body_legs", "legs", "lower_body"],
        body_parts: &[
            "upper legs",
            "lower legs",
            "glutes",
            "quadriceps",
            "hamstrings",
            "calves",
        ],
        keywords: &["legs", "lower body", "full body"],
    },
    FocusRule {
        keys: &["upper_body"],
        body_parts: &["chest", "back", "shoulders", "upper arms"],
        keywords: &["upper body", "push", "pull"],
    },
    FocusRule {
        keys: &["core", "abs"],
        body_parts: &["waist", "abs", "obliques"],
        keywords: &["core", "stability", "trunk"],
    },
    FocusRule {
        keys: &["cardio", "conditioning"],
        body_parts: &["cardio", "conditioning"],
        keywords: &["cardio", "conditioning"],
    },
    FocusRule {
        keys: &["full_body"],
        body_parts: &["upper legs", "chest", "back", "shoulders", "waist"],
        keywords: &["full body", "compound"],
    },
];

struct GoalRule {
    keys: &'static [&'static str],
    keywords: &'static str,
}

const GOAL_TABLE: &[GoalRule] = &[
    GoalRule {
        keys: &["strength"],
        keywords: "compound strength heavy",
    },
    GoalRule {
        keys: &["muscle_gain", "hypertrophy"],
        keywords: "hypertrophy isolation volume",
    },
    GoalRule {
        keys: &["weight_loss", "fat_loss"],
        keywords: "metabolic conditioning high intensity",
    },
    GoalRule {
        keys: &["endurance"],
        keywords: "muscular endurance high repetition",
    },
    GoalRule {
        keys: &["mobility", "flexibility"],
        keywords: "mobility range of motion control",
    },
];

fn table_key(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Expand a focus area key into body parts and keywords
#[must_use]
pub fn expand_focus_area(focus_area: &str) -> FocusExpansion {
    let key = table_key(focus_area);
    FOCUS_TABLE
        .iter()
        .find(|rule| rule.keys.contains(&key.as_str()))
        .map_or_else(
            || {
                let verbatim = focus_area.trim().to_owned();
                FocusExpansion {
                    body_parts: vec![verbatim.clone()],
                    keywords: vec![verbatim],
                }
            },
            |rule| FocusExpansion {
                body_parts: rule.body_parts.iter().map(|s| (*s).to_owned()).collect(),
                keywords: rule.keywords.iter().map(|s| (*s).to_owned()).collect(),
            },
        )
}

/// Descriptive keywords for a training goal, if known
#[must_use]
pub fn goal_keywords(goal: &str) -> Option<&'static str> {
    let key = table_key(goal);
    GOAL_TABLE
        .iter()
        .find(|rule| rule.keys.contains(&key.as_str()))
        .map(|rule| rule.keywords)
}

/// Build the text embedded for a selection request
#[must_use]
pub fn build_selection_query(request: &SelectionRequest) -> String {
    let focus = expand_focus_area(&request.focus_area);
    let mut parts: Vec<String> = Vec::new();

    parts.push(focus.keywords.join(" "));
    parts.push(format!("exercises for {}", focus.body_parts.join(", ")));

    let equipment: Vec<&str> = request
        .equipment
        .iter()
        .map(|e| e.trim())
        .filter(|e| !e.is_empty())
        .collect();
    if !equipment.is_empty() {
        parts.push(format!("using {}", equipment.join(", ")));
    }

    parts.push(format!("{} level", request.fitness_level.as_str()));

    for goal in &request.goals {
        if let Some(keywords) = goal_keywords(goal) {
            parts.push(keywords.to_owned());
        }
    }

    parts
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
