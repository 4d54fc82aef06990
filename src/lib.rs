// ABOUTME: Main library entry point for the Pierre exercise engine
// ABOUTME: Safe exercise selection for generated workouts and hybrid fuzzy/semantic exercise search
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![recursion_limit = "256"]
#![deny(unsafe_code)]

//! # Pierre Exercise Engine
//!
//! Retrieval and ranking engine behind workout generation and exercise search.
//!
//! ## Features
//!
//! - **Selection**: vector retrieval, deterministic injury/equipment safety filtering,
//!   near-duplicate collapsing, and LLM-assisted final selection with a similarity fallback
//! - **Search**: parallel fuzzy and semantic retrieval merged with Reciprocal Rank Fusion
//! - **Caching**: bounded in-process LRU tier in front of an optional Redis tier
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pierre_exercise_engine::config::environment::ServerConfig;
//! use pierre_exercise_engine::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Exercise engine configured on port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Two-tier search cache (in-process LRU + durable store)
pub mod cache;

/// Environment-driven configuration
pub mod config;

/// Application constants
pub mod constants;

/// Exercise reference store (`SQLite` and in-memory catalog)
pub mod database;

/// Text embedding providers
pub mod embedding;

/// Unified error handling
pub mod errors;

/// Fuzzy text search providers
pub mod fuzzy;

/// Vector similarity index
pub mod index;

/// LLM provider abstraction used by the final selector
pub mod llm;

/// Structured logging setup
pub mod logging;

/// Domain models shared across the engine
pub mod models;

/// Shared server resources wiring collaborators together
pub mod resources;

/// Exercise selection pipeline for generated workouts
pub mod retrieval;

/// HTTP routes
pub mod routes;

/// Hybrid exercise search pipeline
pub mod search;
