// ABOUTME: Chat completions client for OpenAI-compatible servers (Ollama, vLLM, hosted APIs)
// ABOUTME: Non-streaming; maps HTTP and payload failures onto external-service errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{ChatMessage, ChatRequest, ChatResponse, LlmProvider};
use crate::config::LlmConfig;
use crate::constants::llm::{CONNECT_TIMEOUT_SECS, REQUEST_TIMEOUT_SECS};
use crate::errors::{AppError, AppResult, ErrorCode};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, instrument};

const SERVICE_NAME: &str = "SelectionLLM";

#[derive(Debug, Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct CompletionReply {
    choices: Vec<Choice>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorReply {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Chat client for any `OpenAI`-compatible `/chat/completions` endpoint
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: LlmConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a client for `config.base_url`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: LlmConfig) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        info!(
            "Initializing selection LLM client: base_url={}, model={}",
            config.base_url, config.model
        );

        Ok(Self { client, config })
    }

    fn api_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn body<'a>(&'a self, request: &'a ChatRequest) -> CompletionBody<'a> {
        CompletionBody {
            model: &self.config.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
            response_format: request.json_reply.then_some(ResponseFormat {
                kind: "json_object",
            }),
        }
    }

    fn parse_error_response(status: StatusCode, body: &str) -> AppError {
        let message = serde_json::from_str::<ErrorReply>(body).map_or_else(
            |_| body.chars().take(200).collect::<String>(),
            |e| e.error.message,
        );
        match status.as_u16() {
            429 => AppError::new(
                ErrorCode::ExternalRateLimited,
                format!("Selection model rate limited: {message}"),
            ),
            404 => AppError::external_service(
                SERVICE_NAME,
                format!("Model or endpoint not found: {message}"),
            ),
            502..=504 => AppError::external_unavailable(SERVICE_NAME, message),
            _ => AppError::external_service(SERVICE_NAME, format!("API error ({status}): {message}")),
        }
    }

    fn parse_reply(&self, body: &str) -> AppResult<ChatResponse> {
        let reply: CompletionReply = serde_json::from_str(body).map_err(|e| {
            AppError::external_service(SERVICE_NAME, format!("Failed to parse response: {e}"))
        })?;

        if let Some(usage) = &reply.usage {
            debug!(total_tokens = usage.total_tokens, "Selection completion usage");
        }

        let choice = reply
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::external_service(SERVICE_NAME, "API returned no choices"))?;

        Ok(ChatResponse {
            content: choice.message.content.unwrap_or_default(),
            model: reply.model.unwrap_or_else(|| self.config.model.clone()),
            finish_reason: choice.finish_reason,
        })
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        "openai_compatible"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    #[instrument(skip(self, request), fields(model = %self.config.model, json = request.json_reply))]
    async fn complete(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        let mut http_request = self.client.post(self.api_url()).json(&self.body(request));
        if let Some(ref api_key) = self.config.api_key {
            http_request = http_request.header("Authorization", format!("Bearer {api_key}"));
        }

        let response = http_request.send().await.map_err(|e| {
            error!("Failed to send selection request: {}", e);
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
        self.parse_reply(&text)
    }
}
