// ABOUTME: Re-exports the unified error types from pierre-exercise-core
// ABOUTME: AppError/ErrorCode for request validation plus the RetrievalError taxonomy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use pierre_exercise_core::errors::*;
