// ABOUTME: Server configuration assembled from environment variables
// ABOUTME: Composes port, database, cache, retrieval, embedding, and LLM sections
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::cache::SearchCacheConfig;
use super::providers::{EmbeddingConfig, LlmConfig};
use super::retrieval::RetrievalConfig;
use super::env_parse;
use crate::constants::server;
use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::env;
use tracing::info;

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP API port
    pub http_port: u16,
    /// Exercise reference store URL
    pub database_url: String,
    /// Two-tier search cache
    pub cache: SearchCacheConfig,
    /// Retrieval, fusion, and timeouts
    pub retrieval: RetrievalConfig,
    /// Embedding endpoint
    pub embedding: EmbeddingConfig,
    /// LLM endpoint and selection toggle
    pub llm: LlmConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: server::DEFAULT_HTTP_PORT,
            database_url: server::DEFAULT_DATABASE_URL.to_owned(),
            cache: SearchCacheConfig::default(),
            retrieval: RetrievalConfig::default(),
            embedding: EmbeddingConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a cache, retrieval, or fusion value is out of range
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            http_port: env_parse("HTTP_PORT", server::DEFAULT_HTTP_PORT),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| server::DEFAULT_DATABASE_URL.to_owned()),
            cache: SearchCacheConfig::from_env()?,
            retrieval: RetrievalConfig::from_env()?,
            embedding: EmbeddingConfig::from_env(),
            llm: LlmConfig::from_env(),
        };

        Ok(config)
    }

    /// Human-readable summary for the startup log (no secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Pierre Exercise Engine Configuration:\n\
             - HTTP Port: {}\n\
             - Database: {}\n\
             - Fast Cache: {} entries, {}s TTL\n\
             - Durable Cache: {}\n\
             - Fusion: k={}, fuzzy={}, semantic={}\n\
             - Dedup Overlap: {}\n\
             - Embeddings: {} ({})\n\
             - LLM Selection: {}",
            self.http_port,
            self.database_url,
            self.cache.max_entries,
            self.cache.fast_ttl_secs,
            if self.cache.redis_url.is_some() {
                format!("redis, {}s TTL", self.cache.durable_ttl_secs)
            } else {
                "disabled".to_owned()
            },
            self.retrieval.fusion.k,
            self.retrieval.fusion.fuzzy_weight,
            self.retrieval.fusion.semantic_weight,
            self.retrieval.dedup_overlap_threshold,
            self.embedding.model,
            self.embedding.base_url,
            if self.llm.use_llm_selection {
                format!("enabled ({})", self.llm.model)
            } else {
                "disabled (similarity only)".to_owned()
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_from_env_reads_port_and_fusion() {
        env::set_var("HTTP_PORT", "9191");
        env::set_var("FUSION_K", "30");
        env::set_var("EXERCISE_SELECTION_USE_LLM", "true");

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.http_port, 9191);
        assert!((config.retrieval.fusion.k - 30.0).abs() < f64::EPSILON);
        assert!(config.llm.use_llm_selection);

        env::remove_var("HTTP_PORT");
        env::remove_var("FUSION_K");
        env::remove_var("EXERCISE_SELECTION_USE_LLM");
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_invalid_dedup_threshold() {
        env::set_var("DEDUP_OVERLAP_THRESHOLD", "0");
        let result = ServerConfig::from_env();
        env::remove_var("DEDUP_OVERLAP_THRESHOLD");
        assert!(result.is_err());
    }

    #[test]
    fn test_summary_omits_api_keys() {
        let mut config = ServerConfig::default();
        config.embedding.api_key = Some("sk-secret".to_owned());
        assert!(!config.summary().contains("sk-secret"));
        assert!(config.summary().contains("similarity only"));
    }
}
