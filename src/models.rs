// ABOUTME: Re-exports the exercise domain models from pierre-exercise-core
// ABOUTME: Records, candidates, request shapes, and workout entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use pierre_exercise_core::models::*;
