// ABOUTME: Core types and constants for the Pierre exercise retrieval engine
// ABOUTME: Foundation crate with error handling, exercise models, and tuning constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Exercise Core
//!
//! Foundation crate providing shared types and constants for the exercise
//! retrieval and ranking engine. This crate is designed to change infrequently,
//! enabling incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and the retrieval taxonomy
//! - **constants**: Retrieval, fusion, and cache tuning defaults
//! - **models**: Exercise records, candidates, and request/response shapes

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants and tuning defaults organized by domain
pub mod constants;

/// Core data models (`ExerciseRecord`, `CandidateResult`, requests)
pub mod models;
