// ABOUTME: Error taxonomy for the exercise retrieval and ranking pipeline
// ABOUTME: Every variant is recoverable and converts to AppError for logging or HTTP use
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Retrieval Error Types
//!
//! Collaborator failures are values, not panics. Each component catches the
//! failures of the collaborators it calls and turns them into a degraded but
//! valid result, so these errors never leave the selection or search
//! entrypoints.

use super::{AppError, ErrorCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// External collaborator consumed by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collaborator {
    /// Text embedding model
    Embedding,
    /// Vector similarity index
    Index,
    /// Literal/trigram search provider
    FuzzySearch,
    /// LLM reasoning call used by the final selector
    Reasoning,
    /// Durable cache tier
    DurableCache,
    /// Relational reference-data store
    ReferenceStore,
}

impl Collaborator {
    /// Stable name used in logs
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Embedding => "embedding",
            Self::Index => "index",
            Self::FuzzySearch => "fuzzy_search",
            Self::Reasoning => "reasoning",
            Self::DurableCache => "durable_cache",
            Self::ReferenceStore => "reference_store",
        }
    }
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure modes of the retrieval pipeline
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RetrievalError {
    /// No candidates survived retrieval or filtering
    #[error("no candidate exercises available")]
    EmptyCandidates,

    /// A collaborator call failed or timed out
    #[error("{collaborator} unavailable: {reason}")]
    CollaboratorUnavailable {
        /// Which collaborator failed
        collaborator: Collaborator,
        /// Failure detail
        reason: String,
    },

    /// The reasoning collaborator returned malformed or out-of-range output
    #[error("invalid reasoning output: {reason}")]
    InvalidReasoningOutput {
        /// What was wrong with the output
        reason: String,
    },

    /// The durable cache tier is unreachable
    #[error("durable cache unavailable: {reason}")]
    CacheUnavailable {
        /// Failure detail
        reason: String,
    },
}

impl RetrievalError {
    /// Collaborator call failed
    #[must_use]
    pub fn unavailable(collaborator: Collaborator, reason: impl fmt::Display) -> Self {
        Self::CollaboratorUnavailable {
            collaborator,
            reason: reason.to_string(),
        }
    }

    /// Collaborator call exceeded its deadline
    #[must_use]
    pub fn timed_out(collaborator: Collaborator, after: Duration) -> Self {
        Self::CollaboratorUnavailable {
            collaborator,
            reason: format!("timed out after {}ms", after.as_millis()),
        }
    }

    /// Reasoning output could not be used
    #[must_use]
    pub fn invalid_reasoning(reason: impl Into<String>) -> Self {
        Self::InvalidReasoningOutput {
            reason: reason.into(),
        }
    }

    /// Durable cache call failed
    #[must_use]
    pub fn cache_unavailable(reason: impl fmt::Display) -> Self {
        Self::CacheUnavailable {
            reason: reason.to_string(),
        }
    }
}

impl From<RetrievalError> for AppError {
    fn from(error: RetrievalError) -> Self {
        let code = match &error {
            RetrievalError::EmptyCandidates => ErrorCode::ResourceNotFound,
            RetrievalError::CollaboratorUnavailable { .. } => ErrorCode::ExternalServiceUnavailable,
            RetrievalError::InvalidReasoningOutput { .. } => ErrorCode::ExternalServiceError,
            RetrievalError::CacheUnavailable { .. } => ErrorCode::CacheError,
        };
        Self::new(code, error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message() {
        let err = RetrievalError::timed_out(Collaborator::Embedding, Duration::from_millis(250));
        assert_eq!(err.to_string(), "embedding unavailable: timed out after 250ms");
    }

    #[test]
    fn test_conversion_to_app_error() {
        let app: AppError = RetrievalError::invalid_reasoning("index 40 out of range").into();
        assert_eq!(app.code, ErrorCode::ExternalServiceError);
        assert!(app.message.contains("index 40"));
    }
}
