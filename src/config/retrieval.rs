// ABOUTME: Retrieval, fusion, and collaborator timeout configuration
// ABOUTME: Every external call gets its own timeout; fusion and dedup knobs are tunable
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::env_parse;
use crate::constants::retrieval::{self, timeouts};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-collaborator call timeouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollaboratorTimeouts {
    /// Embedding model call
    pub embedding: Duration,
    /// Vector index query
    pub index: Duration,
    /// Fuzzy text search
    pub fuzzy: Duration,
    /// LLM reasoning call
    pub reasoning: Duration,
    /// Durable cache read/write
    pub durable_cache: Duration,
    /// Reference store lookup
    pub reference_store: Duration,
}

impl Default for CollaboratorTimeouts {
    fn default() -> Self {
        Self {
            embedding: Duration::from_millis(timeouts::EMBEDDING_MS),
            index: Duration::from_millis(timeouts::INDEX_MS),
            fuzzy: Duration::from_millis(timeouts::FUZZY_MS),
            reasoning: Duration::from_millis(timeouts::REASONING_MS),
            durable_cache: Duration::from_millis(timeouts::DURABLE_CACHE_MS),
            reference_store: Duration::from_millis(timeouts::REFERENCE_STORE_MS),
        }
    }
}

impl CollaboratorTimeouts {
    /// Load timeouts from `*_TIMEOUT_MS` environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let millis = |name: &str, default: u64| {
            Duration::from_millis(env_parse(name, default))
        };

        Self {
            embedding: millis("EMBEDDING_TIMEOUT_MS", timeouts::EMBEDDING_MS),
            index: millis("INDEX_TIMEOUT_MS", timeouts::INDEX_MS),
            fuzzy: millis("FUZZY_TIMEOUT_MS", timeouts::FUZZY_MS),
            reasoning: millis("REASONING_TIMEOUT_MS", timeouts::REASONING_MS),
            durable_cache: millis("DURABLE_CACHE_TIMEOUT_MS", timeouts::DURABLE_CACHE_MS),
            reference_store: millis("REFERENCE_STORE_TIMEOUT_MS", timeouts::REFERENCE_STORE_MS),
        }
    }
}

/// Reciprocal Rank Fusion parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusionConfig {
    /// Smoothing constant `k`
    pub k: f64,
    /// Weight applied to the fuzzy ranking
    pub fuzzy_weight: f64,
    /// Weight applied to the semantic ranking
    pub semantic_weight: f64,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            k: retrieval::RRF_K,
            fuzzy_weight: retrieval::FUZZY_WEIGHT,
            semantic_weight: retrieval::SEMANTIC_WEIGHT,
        }
    }
}

impl FusionConfig {
    /// Load fusion parameters from environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            k: env_parse("FUSION_K", retrieval::RRF_K),
            fuzzy_weight: env_parse("FUSION_FUZZY_WEIGHT", retrieval::FUZZY_WEIGHT),
            semantic_weight: env_parse("FUSION_SEMANTIC_WEIGHT", retrieval::SEMANTIC_WEIGHT),
        }
    }

    /// Reject parameters that would break score ordering
    ///
    /// # Errors
    ///
    /// Returns a config error if `k` is not positive or a weight is negative
    pub fn validate(&self) -> AppResult<()> {
        if !(self.k.is_finite() && self.k > 0.0) {
            return Err(AppError::config(format!("FUSION_K must be > 0, got {}", self.k)));
        }
        if !(self.fuzzy_weight.is_finite() && self.fuzzy_weight >= 0.0)
            || !(self.semantic_weight.is_finite() && self.semantic_weight >= 0.0)
        {
            return Err(AppError::config("Fusion weights must be finite and >= 0"));
        }
        Ok(())
    }
}

/// Retrieval pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Collaborator call timeouts
    pub timeouts: CollaboratorTimeouts,
    /// Rank fusion parameters
    pub fusion: FusionConfig,
    /// Token overlap (fraction of the smaller name) at which two names are duplicates
    pub dedup_overlap_threshold: f64,
    /// Minimum trigram similarity for fuzzy matches
    pub fuzzy_min_similarity: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            timeouts: CollaboratorTimeouts::default(),
            fusion: FusionConfig::default(),
            dedup_overlap_threshold: retrieval::DEDUP_OVERLAP_THRESHOLD,
            fuzzy_min_similarity: retrieval::FUZZY_MIN_SIMILARITY,
        }
    }
}

impl RetrievalConfig {
    /// Load and validate retrieval configuration from environment
    ///
    /// # Errors
    ///
    /// Returns a config error if a value is outside its valid range
    pub fn from_env() -> AppResult<Self> {
        let config = Self {
            timeouts: CollaboratorTimeouts::from_env(),
            fusion: FusionConfig::from_env(),
            dedup_overlap_threshold: env_parse(
                "DEDUP_OVERLAP_THRESHOLD",
                retrieval::DEDUP_OVERLAP_THRESHOLD,
            ),
            fuzzy_min_similarity: env_parse(
                "FUZZY_MIN_SIMILARITY",
                retrieval::FUZZY_MIN_SIMILARITY,
            ),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate ranges
    ///
    /// # Errors
    ///
    /// Returns a config error if a value is outside its valid range
    pub fn validate(&self) -> AppResult<()> {
        self.fusion.validate()?;
        if !(self.dedup_overlap_threshold > 0.0 && self.dedup_overlap_threshold <= 1.0) {
            return Err(AppError::config(format!(
                "DEDUP_OVERLAP_THRESHOLD must be in (0, 1], got {}",
                self.dedup_overlap_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.fuzzy_min_similarity) {
            return Err(AppError::config(format!(
                "FUZZY_MIN_SIMILARITY must be in [0, 1], got {}",
                self.fuzzy_min_similarity
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RetrievalConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.fusion.k - 60.0).abs() < f64::EPSILON);
        assert!((config.fusion.semantic_weight - 1.2).abs() < f64::EPSILON);
        assert!((config.dedup_overlap_threshold - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_bad_threshold() {
        let config = RetrievalConfig {
            dedup_overlap_threshold: 1.5,
            ..RetrievalConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_positive_k() {
        let fusion = FusionConfig {
            k: 0.0,
            ..FusionConfig::default()
        };
        assert!(fusion.validate().is_err());
    }
}
