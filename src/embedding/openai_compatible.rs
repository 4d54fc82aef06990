// ABOUTME: OpenAI-compatible /embeddings client for local or hosted embedding models
// ABOUTME: Supports single and batched input with optional bearer authentication
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::EmbeddingProvider;
use crate::config::EmbeddingConfig;
use crate::constants::embedding::{CONNECT_TIMEOUT_SECS, REQUEST_TIMEOUT_SECS};
use crate::errors::{AppError, AppResult, ErrorCode};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, instrument};

const SERVICE_NAME: &str = "Embeddings";

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Embedding client for any `OpenAI`-compatible endpoint
pub struct OpenAiCompatibleEmbedder {
    client: Client,
    config: EmbeddingConfig,
}

impl OpenAiCompatibleEmbedder {
    /// Create a new embedder
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: EmbeddingConfig) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        info!(
            "Initializing embeddings client: base_url={}, model={}",
            config.base_url, config.model
        );

        Ok(Self { client, config })
    }

    fn api_url(&self) -> String {
        format!("{}/embeddings", self.config.base_url.trim_end_matches('/'))
    }

    fn parse_error_response(status: reqwest::StatusCode, body: &str) -> AppError {
        let message = serde_json::from_str::<ErrorResponse>(body).map_or_else(
            |_| body.chars().take(200).collect::<String>(),
            |e| e.error.message,
        );
        match status.as_u16() {
            429 => AppError::new(
                ErrorCode::ExternalRateLimited,
                format!("Embedding rate limit reached: {message}"),
            ),
            502..=504 => AppError::external_unavailable(SERVICE_NAME, message),
            _ => AppError::external_service(SERVICE_NAME, format!("API error ({status}): {message}")),
        }
    }

    async fn request(&self, input: &[String]) -> AppResult<Vec<Vec<f32>>> {
        let body = EmbeddingRequest {
            model: &self.config.model,
            input,
        };

        let mut request = self.client.post(self.api_url()).json(&body);
        if let Some(ref api_key) = self.config.api_key {
            request = request.header("Authorization", format!("Bearer {api_key}"));
        }

        let response = request.send().await.map_err(|e| {
            error!("Failed to send embeddings request: {}", e);
            if e.is_connect() {
                AppError::external_unavailable(
                    SERVICE_NAME,
                    format!("Cannot connect to {}", self.config.base_url),
                )
            } else {
                AppError::external_service(SERVICE_NAME, format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            AppError::external_service(SERVICE_NAME, format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            return Err(Self::parse_error_response(status, &text));
        }

        let mut parsed: EmbeddingResponse = serde_json::from_str(&text).map_err(|e| {
            AppError::external_service(SERVICE_NAME, format!("Failed to parse response: {e}"))
        })?;

        if parsed.data.len() != input.len() {
            return Err(AppError::external_service(
                SERVICE_NAME,
                format!(
                    "Expected {} embeddings, received {}",
                    input.len(),
                    parsed.data.len()
                ),
            ));
        }

        parsed.data.sort_by_key(|d| d.index);
        debug!(count = parsed.data.len(), "Received embeddings");
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiCompatibleEmbedder {
    fn name(&self) -> &'static str {
        "openai_compatible"
    }

    #[instrument(skip(self, text), fields(model = %self.config.model, chars = text.len()))]
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut vectors = self.request(&[text.to_owned()]).await?;
        vectors
            .pop()
            .ok_or_else(|| AppError::external_service(SERVICE_NAME, "API returned no embedding"))
    }

    #[instrument(skip(self, texts), fields(model = %self.config.model, count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request(texts).await
    }
}
