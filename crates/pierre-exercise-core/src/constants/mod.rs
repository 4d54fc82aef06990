// ABOUTME: Application constants organized by domain
// ABOUTME: Defaults for retrieval, fusion, caching, and service identity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Search cache TTLs, capacity, and key prefix
pub mod cache;

/// Retrieval, selection, and fusion defaults
pub mod retrieval;

/// Service names for structured logging
pub mod service_names {
    /// Server binary / logging service name
    pub const PIERRE_EXERCISE_SERVER: &str = "pierre-exercise-server";
}

/// HTTP search endpoint limits
pub mod search_api {
    /// Minimum query length after trimming
    pub const MIN_QUERY_CHARS: usize = 2;
    /// Maximum query length after trimming
    pub const MAX_QUERY_CHARS: usize = 200;
    /// Default result limit
    pub const DEFAULT_LIMIT: usize = 20;
    /// Maximum result limit
    pub const MAX_LIMIT: usize = 50;
}

/// Server defaults
pub mod server {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 8081;
    /// Default `SQLite` reference store
    pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/exercises.db";
    /// Default request timeout applied by the HTTP layer
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
}

/// Embedding endpoint defaults
pub mod embedding {
    /// Default `OpenAI`-compatible embeddings base URL (Ollama)
    pub const DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";
    /// Default embedding model
    pub const DEFAULT_MODEL: &str = "nomic-embed-text";
    /// Connection timeout for the embeddings endpoint
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;
    /// Request timeout for the embeddings endpoint
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;
}

/// Selection LLM endpoint defaults
pub mod llm {
    /// Default `OpenAI`-compatible chat base URL (Ollama)
    pub const DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";
    /// Default chat model
    pub const DEFAULT_MODEL: &str = "qwen2.5:14b-instruct";
    /// Connection timeout for the chat endpoint
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;
    /// Transport ceiling; the selector enforces its own tighter deadline
    pub const REQUEST_TIMEOUT_SECS: u64 = 120;
}
