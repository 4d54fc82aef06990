// ABOUTME: Workout-ready exercise entry produced by the final selector
// ABOUTME: Carries prescription (sets/reps/rest) plus library references for the CRUD layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// One exercise slot in a generated workout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutExercise {
    /// Display name
    pub name: String,
    /// Working sets
    pub sets: u32,
    /// Reps per set
    pub reps: u32,
    /// Rest between sets
    pub rest_seconds: u32,
    /// Equipment label (declared or inferred)
    pub equipment: String,
    /// Primary muscle group
    pub muscle_group: String,
    /// Coaching note
    pub notes: String,
    /// Animated demonstration
    pub gif_url: Option<String>,
    /// Video demonstration
    pub video_url: Option<String>,
    /// Exercise library id
    pub library_id: String,
}
