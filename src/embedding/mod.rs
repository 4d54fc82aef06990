// ABOUTME: Text embedding provider abstraction used by vector retrieval
// ABOUTME: Implementations turn query text into a dense vector for the similarity index
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Embedding Providers
//!
//! The engine never trains or hosts embedding models; it calls one through
//! [`EmbeddingProvider`]. [`OpenAiCompatibleEmbedder`] talks to any server that
//! implements the `/embeddings` endpoint (Ollama, vLLM, `LocalAI`, hosted APIs).

mod openai_compatible;

pub use openai_compatible::OpenAiCompatibleEmbedder;

use crate::errors::AppResult;
use async_trait::async_trait;

/// Text to vector
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider identifier for logs
    fn name(&self) -> &'static str;

    /// Embed a single text
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>>;

    /// Embed several texts, preserving order
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }
}
