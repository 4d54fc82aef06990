// ABOUTME: Application error type, machine-readable error codes, and the HTTP error body
// ABOUTME: AppError is the only error that crosses the HTTP boundary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Error Handling
//!
//! Routes and startup code return [`AppError`]. Collaborator failures inside
//! the retrieval pipeline use [`RetrievalError`] and are recovered before
//! they reach a route; the `From` conversion exists for logging and for the
//! binaries.
//!
//! Every error renders as
//!
//! ```json
//! {"error": {"code": "VALUE_OUT_OF_RANGE", "message": "...", "request_id": "...", "details": {...}}}
//! ```

/// Retrieval pipeline error taxonomy
pub mod retrieval;

pub use retrieval::{Collaborator, RetrievalError};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Machine-readable error code; the numeric value groups codes by family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed parameter
    InvalidInput = 3000,
    /// Required parameter absent or blank
    MissingRequiredField = 3001,
    /// Parameter outside its accepted range
    ValueOutOfRange = 3003,
    /// Nothing matched the request
    ResourceNotFound = 4000,
    /// Embedding, LLM, or index endpoint returned an error
    ExternalServiceError = 5000,
    /// Embedding, LLM, or index endpoint unreachable
    ExternalServiceUnavailable = 5001,
    /// Endpoint asked us to slow down
    ExternalRateLimited = 5003,
    /// Invalid configuration
    ConfigError = 6000,
    /// Unclassified failure
    InternalError = 9000,
    /// Exercise reference store failure
    DatabaseError = 9001,
    /// Cache backend failure
    CacheError = 9002,
    /// Payload could not be encoded or decoded
    SerializationError = 9003,
}

impl ErrorCode {
    /// HTTP status for responses carrying this code
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidInput | Self::MissingRequiredField | Self::ValueOutOfRange => 400,
            Self::ResourceNotFound => 404,
            Self::ExternalServiceError | Self::ExternalServiceUnavailable => 502,
            Self::ExternalRateLimited => 503,
            Self::ConfigError
            | Self::InternalError
            | Self::DatabaseError
            | Self::CacheError
            | Self::SerializationError => 500,
        }
    }

    /// Short summary used as the `Display` prefix
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "Invalid request parameter",
            Self::MissingRequiredField => "Missing request parameter",
            Self::ValueOutOfRange => "Request parameter out of range",
            Self::ResourceNotFound => "No matching exercises",
            Self::ExternalServiceError => "Upstream service error",
            Self::ExternalServiceUnavailable => "Upstream service unavailable",
            Self::ExternalRateLimited => "Upstream rate limit",
            Self::ConfigError => "Configuration error",
            Self::InternalError => "Internal error",
            Self::DatabaseError => "Exercise store error",
            Self::CacheError => "Cache error",
            Self::SerializationError => "Serialization error",
        }
    }

    /// Whether the caller can fix the request
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.http_status() < 500
    }
}

/// Error returned by routes, configuration loading, and collaborator clients
#[derive(Debug, Error)]
pub struct AppError {
    /// Code
    pub code: ErrorCode,
    /// Message shown to the caller
    pub message: String,
    /// Request id from the `x-request-id` header, when known
    pub request_id: Option<String>,
    /// Structured context such as the offending parameter
    pub details: serde_json::Value,
}

impl AppError {
    /// Error with `code` and `message`
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            request_id: None,
            details: serde_json::Value::Null,
        }
    }

    /// Attach the request id
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Attach structured details
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    /// HTTP status for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Malformed parameter
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Parameter outside its range
    #[must_use]
    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValueOutOfRange, message)
    }

    /// Required parameter `field` absent
    #[must_use]
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("'{field}' is required"),
        )
    }

    /// Unclassified failure
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Exercise store failure
    #[must_use]
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Cache backend failure
    #[must_use]
    pub fn cache(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CacheError, message)
    }

    /// Invalid configuration
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// `service` returned an error
    #[must_use]
    pub fn external_service(service: &str, message: impl fmt::Display) -> Self {
        Self::new(ErrorCode::ExternalServiceError, format!("{service}: {message}"))
    }

    /// `service` could not be reached
    #[must_use]
    pub fn external_unavailable(service: &str, message: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::ExternalServiceUnavailable,
            format!("{service}: {message}"),
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string())
    }
}

/// Result alias used across the engine
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error payload
    pub error: ErrorBody,
}

/// Inner object of an [`ErrorResponse`]
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Code
    pub code: ErrorCode,
    /// Message
    pub message: String,
    /// Request id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Structured context
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: ErrorBody {
                code: error.code,
                message: error.message,
                request_id: error.request_id,
                details: error.details,
            },
        }
    }
}

#[cfg(feature = "http-response")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = http::StatusCode::from_u16(self.http_status())
            .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);
        if self.code.is_client_error() {
            tracing::debug!(code = ?self.code, request_id = ?self.request_id, "{}", self.message);
        } else {
            tracing::error!(code = ?self.code, request_id = ?self.request_id, "{}", self.message);
        }
        (status, axum::Json(ErrorResponse::from(self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_codes_are_client_errors() {
        for code in [
            ErrorCode::InvalidInput,
            ErrorCode::MissingRequiredField,
            ErrorCode::ValueOutOfRange,
        ] {
            assert_eq!(code.http_status(), 400);
            assert!(code.is_client_error());
        }
        assert_eq!(ErrorCode::ExternalServiceUnavailable.http_status(), 502);
        assert!(!ErrorCode::DatabaseError.is_client_error());
    }

    #[test]
    fn test_codes_serialize_screaming_snake_case() {
        assert_eq!(
            serde_json::to_value(ErrorCode::MissingRequiredField).unwrap(),
            "MISSING_REQUIRED_FIELD"
        );
        assert_eq!(
            serde_json::to_value(ErrorCode::ValueOutOfRange).unwrap(),
            "VALUE_OUT_OF_RANGE"
        );
    }

    #[test]
    fn test_error_body_omits_empty_fields() {
        let bare = serde_json::to_value(ErrorResponse::from(AppError::missing_field("q"))).unwrap();
        assert_eq!(bare["error"]["code"], "MISSING_REQUIRED_FIELD");
        assert!(bare["error"].get("request_id").is_none());
        assert!(bare["error"].get("details").is_none());

        let full = AppError::out_of_range("limit must be between 1 and 50")
            .with_request_id("req-123")
            .with_details(serde_json::json!({ "parameter": "limit" }));
        let body = serde_json::to_value(ErrorResponse::from(full)).unwrap();
        assert_eq!(body["error"]["request_id"], "req-123");
        assert_eq!(body["error"]["details"]["parameter"], "limit");
    }
}
