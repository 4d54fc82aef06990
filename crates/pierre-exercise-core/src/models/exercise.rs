// ABOUTME: Exercise reference record as stored in the exercise library
// ABOUTME: Immutable data the engine reads but never writes during a request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// Difficulty level for exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    /// Suitable for beginners with no prior experience
    #[default]
    Beginner,
    /// Requires some training background
    Intermediate,
    /// For experienced lifters
    Advanced,
}

impl DifficultyLevel {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "intermediate" => Self::Intermediate,
            "advanced" | "expert" => Self::Advanced,
            // Default to Beginner for unrecognized values
            _ => Self::Beginner,
        }
    }
}

/// An exercise in the reference library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseRecord {
    /// Library identifier
    pub id: String,
    /// Canonical display name
    pub name: String,
    /// Coarse body region (e.g. "upper legs")
    pub body_part: String,
    /// Primary muscle
    pub target_muscle: String,
    /// Secondary muscles
    #[serde(default)]
    pub secondary_muscles: Vec<String>,
    /// Equipment label; `None` or blank means it has to be inferred from the name
    #[serde(default)]
    pub equipment: Option<String>,
    /// Difficulty
    #[serde(default)]
    pub difficulty: DifficultyLevel,
    /// Step-by-step instructions
    #[serde(default)]
    pub instructions: Vec<String>,
    /// Animated demonstration
    #[serde(default)]
    pub gif_url: Option<String>,
    /// Video demonstration
    #[serde(default)]
    pub video_url: Option<String>,
    /// Can be performed with a single dumbbell
    #[serde(default)]
    pub single_dumbbell_friendly: bool,
    /// Can be performed with a single kettlebell
    #[serde(default)]
    pub single_kettlebell_friendly: bool,
}

impl ExerciseRecord {
    /// Equipment label if present and non-blank
    #[must_use]
    pub fn declared_equipment(&self) -> Option<&str> {
        self.equipment
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }
}
