// ABOUTME: Immutable request shapes for exercise selection and exercise search
// ABOUTME: Includes fitness level parsing and single-implement equipment counts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::retrieval::prescription;
use serde::{Deserialize, Serialize};

/// Training experience used for prescription defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FitnessLevel {
    /// New to resistance training
    Beginner,
    /// Trains regularly
    #[default]
    Intermediate,
    /// Experienced lifter
    Advanced,
}

impl FitnessLevel {
    /// Parse a free-form level; anything unrecognized is intermediate
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "beginner" | "novice" | "new" => Self::Beginner,
            "advanced" | "expert" | "elite" => Self::Advanced,
            _ => Self::Intermediate,
        }
    }

    /// Lowercase label
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    /// Default `(sets, reps, rest_seconds)` for this level
    #[must_use]
    pub const fn prescription(&self) -> (u32, u32, u32) {
        match self {
            Self::Beginner => prescription::BEGINNER,
            Self::Intermediate => prescription::INTERMEDIATE,
            Self::Advanced => prescription::ADVANCED,
        }
    }
}

/// How many units of normally-paired implements the user owns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleImplementCounts {
    /// Number of dumbbells, when known
    #[serde(default)]
    pub dumbbells: Option<u32>,
    /// Number of kettlebells, when known
    #[serde(default)]
    pub kettlebells: Option<u32>,
}

impl SingleImplementCounts {
    /// User owns exactly one dumbbell
    #[must_use]
    pub const fn single_dumbbell(&self) -> bool {
        matches!(self.dumbbells, Some(1))
    }

    /// User owns exactly one kettlebell
    #[must_use]
    pub const fn single_kettlebell(&self) -> bool {
        matches!(self.kettlebells, Some(1))
    }
}

/// Input for selecting exercises for a generated workout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionRequest {
    /// Focus area key (e.g. `full_body_legs`, `upper_body`)
    pub focus_area: String,
    /// Equipment the user has (umbrella values like "home gym" allowed)
    #[serde(default)]
    pub equipment: Vec<String>,
    /// Experience level
    #[serde(default)]
    pub fitness_level: FitnessLevel,
    /// Training goals (e.g. `strength`, `weight_loss`)
    #[serde(default)]
    pub goals: Vec<String>,
    /// Number of exercises wanted
    pub count: usize,
    /// Exercise names to leave out
    #[serde(default)]
    pub avoid: Vec<String>,
    /// Active injuries or conditions (free text, e.g. "left knee")
    #[serde(default)]
    pub injuries: Vec<String>,
    /// Single-implement ownership
    #[serde(default)]
    pub single_implement_counts: SingleImplementCounts,
}

/// Equipment and body-part restrictions shared by the fuzzy and semantic sources
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Allowed equipment labels; empty means any
    #[serde(default)]
    pub equipment: Vec<String>,
    /// Allowed body parts; empty means any
    #[serde(default)]
    pub body_parts: Vec<String>,
}

impl SearchFilters {
    /// No restriction at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.equipment.is_empty() && self.body_parts.is_empty()
    }
}

/// Input for natural-language exercise search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text query
    pub query: String,
    /// Equipment filter
    #[serde(default)]
    pub equipment: Vec<String>,
    /// Body-part filter
    #[serde(default)]
    pub body_parts: Vec<String>,
    /// Maximum results
    pub limit: usize,
    /// Run the semantic branch
    pub semantic: bool,
}

impl SearchRequest {
    /// Equipment/body-part filters of this request
    #[must_use]
    pub fn filters(&self) -> SearchFilters {
        SearchFilters {
            equipment: self.equipment.clone(),
            body_parts: self.body_parts.clone(),
        }
    }
}
