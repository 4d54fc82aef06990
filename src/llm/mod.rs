// ABOUTME: Chat model contract consumed by the reasoning-based exercise selection strategy
// ABOUTME: One system prompt plus one user prompt in, one text reply out
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Reasoning Collaborator
//!
//! The final selector hands a short, numbered candidate list to a chat model
//! and asks for the indices to keep. Nothing else in the engine talks to a
//! model, so the contract is deliberately small: a single-turn prompt, a
//! sampling temperature, a token cap, and an optional JSON reply mode.
//!
//! ```rust,no_run
//! use pierre_exercise_engine::llm::{ChatRequest, LlmProvider};
//!
//! async fn example(provider: &dyn LlmProvider) {
//!     let request = ChatRequest::new(
//!         "You pick exercises for a workout.",
//!         "Candidates: 0. Push Up 1. Glute Bridge. Return {\"indices\": [..]}",
//!     )
//!     .expecting_json();
//!     let _reply = provider.complete(&request).await;
//! }
//! ```

mod openai_compatible;

pub use openai_compatible::OpenAiCompatibleProvider;

use crate::errors::AppResult;
use async_trait::async_trait;
use serde::Serialize;

/// Default sampling temperature for selection prompts
const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Default completion cap; an index list is a few dozen tokens
const DEFAULT_MAX_TOKENS: u32 = 256;

/// Finish reason reported when the token cap cut the reply short
const FINISH_REASON_LENGTH: &str = "length";

/// Speaker of a prompt message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions and output contract
    System,
    /// Request-specific payload
    User,
}

/// A single prompt message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    /// Speaker
    pub role: Role,
    /// Text
    pub content: String,
}

/// Single-turn completion request
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// System then user message
    pub messages: [ChatMessage; 2],
    /// Sampling temperature
    pub temperature: f32,
    /// Completion token cap
    pub max_tokens: u32,
    /// Ask the server to constrain the reply to a JSON object
    pub json_reply: bool,
}

impl ChatRequest {
    /// Request with the default temperature and token cap
    #[must_use]
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            messages: [
                ChatMessage {
                    role: Role::System,
                    content: system.into(),
                },
                ChatMessage {
                    role: Role::User,
                    content: user.into(),
                },
            ],
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            json_reply: false,
        }
    }

    /// Override the sampling temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Override the completion token cap
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Request JSON-object output from servers that support it
    #[must_use]
    pub const fn expecting_json(mut self) -> Self {
        self.json_reply = true;
        self
    }

    /// The user message
    #[must_use]
    pub fn user_prompt(&self) -> &str {
        &self.messages[1].content
    }
}

/// Completion text plus the metadata the selector logs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatResponse {
    /// Reply text
    pub content: String,
    /// Model that answered
    pub model: String,
    /// Server-reported stop reason
    pub finish_reason: Option<String>,
}

impl ChatResponse {
    /// Whether the token cap truncated the reply
    #[must_use]
    pub fn truncated(&self) -> bool {
        self.finish_reason.as_deref() == Some(FINISH_REASON_LENGTH)
    }
}

/// Chat model used by the LLM selection strategy
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short label for logs
    fn name(&self) -> &'static str;

    /// Model the provider sends requests to
    fn model(&self) -> &str;

    /// Run one completion
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is unreachable, rejects the request,
    /// or replies with something that is not a completion
    async fn complete(&self, request: &ChatRequest) -> AppResult<ChatResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_and_builders() {
        let request = ChatRequest::new("sys", "pick three");
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.user_prompt(), "pick three");
        assert!(!request.json_reply);
        assert_eq!(request.max_tokens, DEFAULT_MAX_TOKENS);

        let tuned = request.with_temperature(0.0).with_max_tokens(64).expecting_json();
        assert!(tuned.json_reply);
        assert_eq!(tuned.max_tokens, 64);
        assert!(tuned.temperature.abs() < f32::EPSILON);
    }

    #[test]
    fn test_truncation_detected_from_finish_reason() {
        let mut response = ChatResponse {
            content: "[1, 2".to_owned(),
            model: "m".to_owned(),
            finish_reason: Some("length".to_owned()),
        };
        assert!(response.truncated());

        response.finish_reason = Some("stop".to_owned());
        assert!(!response.truncated());
        response.finish_reason = None;
        assert!(!response.truncated());
    }
}
