// ABOUTME: Embedding and LLM endpoint configuration for OpenAI-compatible servers
// ABOUTME: Reads EMBEDDING_* and LOCAL_LLM_* variables plus the LLM selection toggle
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::env_flag;
use crate::constants::{embedding, llm};
use serde::{Deserialize, Serialize};
use std::env;

/// Embedding endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Base URL of an `OpenAI`-compatible API (the `/embeddings` path is appended)
    pub base_url: String,
    /// Embedding model name
    pub model: String,
    /// API key (optional for local servers)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: embedding::DEFAULT_BASE_URL.to_owned(),
            model: embedding::DEFAULT_MODEL.to_owned(),
            api_key: None,
        }
    }
}

impl EmbeddingConfig {
    /// Load from `EMBEDDING_BASE_URL`, `EMBEDDING_MODEL`, `EMBEDDING_API_KEY`
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("EMBEDDING_BASE_URL")
                .unwrap_or_else(|_| embedding::DEFAULT_BASE_URL.to_owned()),
            model: env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| embedding::DEFAULT_MODEL.to_owned()),
            api_key: env::var("EMBEDDING_API_KEY").ok().filter(|k| !k.is_empty()),
        }
    }
}

/// LLM endpoint configuration for the selection strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Use the LLM strategy; when false selection is similarity-only
    pub use_llm_selection: bool,
    /// Base URL of an `OpenAI`-compatible API
    pub base_url: String,
    /// Chat model name
    pub model: String,
    /// API key (optional for local servers)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            use_llm_selection: false,
            base_url: llm::DEFAULT_BASE_URL.to_owned(),
            model: llm::DEFAULT_MODEL.to_owned(),
            api_key: None,
        }
    }
}

impl LlmConfig {
    /// Load from `LOCAL_LLM_*` and `EXERCISE_SELECTION_USE_LLM`
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            use_llm_selection: env_flag("EXERCISE_SELECTION_USE_LLM", false),
            base_url: env::var("LOCAL_LLM_BASE_URL")
                .unwrap_or_else(|_| llm::DEFAULT_BASE_URL.to_owned()),
            model: env::var("LOCAL_LLM_MODEL").unwrap_or_else(|_| llm::DEFAULT_MODEL.to_owned()),
            api_key: env::var("LOCAL_LLM_API_KEY").ok().filter(|k| !k.is_empty()),
        }
    }
}
