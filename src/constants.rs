// ABOUTME: Re-exports application constants from pierre-exercise-core
// ABOUTME: Cache, retrieval, fusion, and server defaults live in the core crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use pierre_exercise_core::constants::*;
