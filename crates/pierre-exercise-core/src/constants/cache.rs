// ABOUTME: Search cache constants for TTL, capacity, and cleanup intervals
// ABOUTME: Covers the in-process fast tier and the Redis durable tier
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Default maximum entries held by the fast tier
pub const DEFAULT_FAST_TIER_MAX_ENTRIES: usize = 1_000;

/// Fast tier TTL (5 minutes)
pub const FAST_TIER_TTL_SECS: u64 = 300;

/// Durable tier TTL (1 hour)
pub const DURABLE_TIER_TTL_SECS: u64 = 3_600;

/// Default cleanup interval in seconds for expired fast-tier entries
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 60;

/// Cache key prefix for namespacing in Redis
pub const CACHE_KEY_PREFIX: &str = "pierre:exercise-search:";

/// Version tag mixed into every key so payload shape changes invalidate old entries
pub const CACHE_KEY_VERSION: &str = "v1";

/// Redis connection defaults
pub mod redis {
    /// TCP connect timeout in seconds
    pub const CONNECT_TIMEOUT_SECS: u64 = 5;
    /// Per-command response timeout in seconds
    pub const RESPONSE_TIMEOUT_SECS: u64 = 2;
    /// Reconnect attempts after a dropped connection
    pub const RECONNECT_RETRIES: usize = 3;
    /// Extra attempts for the first connection at startup
    pub const STARTUP_RETRIES: u32 = 3;
    /// First startup retry delay in milliseconds
    pub const RETRY_DELAY_MS: u64 = 500;
    /// Ceiling for any retry delay in milliseconds
    pub const MAX_RETRY_DELAY_MS: u64 = 5_000;
}
