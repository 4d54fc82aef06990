// ABOUTME: Configuration management module for the exercise engine
// ABOUTME: Environment-driven server, cache, retrieval, and provider settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module
//!
//! - **Environment**: `ServerConfig` composed from the sections below
//! - **Cache**: fast/durable search cache and Redis connection settings
//! - **Retrieval**: collaborator timeouts, RRF parameters, dedup threshold
//! - **Providers**: embedding and LLM endpoints

/// Search cache configuration
pub mod cache;
/// Server configuration from environment variables
pub mod environment;
/// Embedding and LLM endpoint configuration
pub mod providers;
/// Retrieval and fusion configuration
pub mod retrieval;

pub use cache::{RedisConnectionConfig, SearchCacheConfig};
pub use environment::ServerConfig;
pub use providers::{EmbeddingConfig, LlmConfig};
pub use retrieval::{CollaboratorTimeouts, FusionConfig, RetrievalConfig};

use std::env;
use std::str::FromStr;

/// Parsed value of `name`, or `default` when unset or unparseable
pub(crate) fn env_parse<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

/// Boolean flag: `1`/`true`/`yes`/`on` enable, `0`/`false`/`no`/`off` disable
pub(crate) fn env_flag(name: &str, default: bool) -> bool {
    env::var(name).map_or(default, |v| match v.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    })
}
