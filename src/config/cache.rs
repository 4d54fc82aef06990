// ABOUTME: Search cache configuration: fast-tier bounds, tier TTLs, and Redis connection policy
// ABOUTME: Read from SEARCH_CACHE_* and REDIS_* environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{env_flag, env_parse};
use crate::constants::cache::{self, redis};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Two-tier search cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCacheConfig {
    /// Redis URL for the durable tier; `None` runs fast-tier only
    #[serde(default)]
    pub redis_url: Option<String>,
    /// Fast-tier capacity before LRU eviction
    pub max_entries: usize,
    /// Fast-tier TTL in seconds
    pub fast_ttl_secs: u64,
    /// Durable-tier TTL in seconds
    pub durable_ttl_secs: u64,
    /// Expired-entry sweep interval in seconds
    pub cleanup_interval_secs: u64,
    /// Run the background sweep task
    pub enable_background_cleanup: bool,
    /// Redis connection policy
    #[serde(default)]
    pub redis_connection: RedisConnectionConfig,
}

impl Default for SearchCacheConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            max_entries: cache::DEFAULT_FAST_TIER_MAX_ENTRIES,
            fast_ttl_secs: cache::FAST_TIER_TTL_SECS,
            durable_ttl_secs: cache::DURABLE_TIER_TTL_SECS,
            cleanup_interval_secs: cache::DEFAULT_CLEANUP_INTERVAL_SECS,
            enable_background_cleanup: true,
            redis_connection: RedisConnectionConfig::default(),
        }
    }
}

impl SearchCacheConfig {
    /// Load from `REDIS_URL` and `SEARCH_CACHE_*`
    ///
    /// # Errors
    ///
    /// Returns a config error for a zero capacity or zero TTL
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();
        let config = Self {
            redis_url: env::var("REDIS_URL").ok().filter(|u| !u.trim().is_empty()),
            max_entries: env_parse("SEARCH_CACHE_MAX_ENTRIES", defaults.max_entries),
            fast_ttl_secs: env_parse("SEARCH_CACHE_FAST_TTL_SECS", defaults.fast_ttl_secs),
            durable_ttl_secs: env_parse("SEARCH_CACHE_DURABLE_TTL_SECS", defaults.durable_ttl_secs),
            cleanup_interval_secs: env_parse(
                "SEARCH_CACHE_CLEANUP_INTERVAL_SECS",
                defaults.cleanup_interval_secs,
            ),
            enable_background_cleanup: env_flag(
                "SEARCH_CACHE_BACKGROUND_CLEANUP",
                defaults.enable_background_cleanup,
            ),
            redis_connection: RedisConnectionConfig::from_env(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make the fast tier useless
    ///
    /// # Errors
    ///
    /// Returns a config error naming the offending variable
    pub fn validate(&self) -> AppResult<()> {
        if self.max_entries == 0 {
            return Err(AppError::config("SEARCH_CACHE_MAX_ENTRIES must be at least 1"));
        }
        if self.fast_ttl_secs == 0 || self.durable_ttl_secs == 0 {
            return Err(AppError::config("Search cache TTLs must be at least 1 second"));
        }
        if self.enable_background_cleanup && self.cleanup_interval_secs == 0 {
            return Err(AppError::config(
                "SEARCH_CACHE_CLEANUP_INTERVAL_SECS must be at least 1 when cleanup is enabled",
            ));
        }
        Ok(())
    }

    /// Fast-tier TTL
    #[must_use]
    pub const fn fast_ttl(&self) -> Duration {
        Duration::from_secs(self.fast_ttl_secs)
    }

    /// Durable-tier TTL
    #[must_use]
    pub const fn durable_ttl(&self) -> Duration {
        Duration::from_secs(self.durable_ttl_secs)
    }

    /// Background sweep interval
    #[must_use]
    pub const fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}

/// Redis connection policy for the durable tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConnectionConfig {
    /// TCP connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Per-command response timeout in seconds
    pub response_timeout_secs: u64,
    /// Reconnect attempts after the connection drops
    pub reconnect_retries: usize,
    /// Extra attempts for the first connection at startup
    pub startup_retries: u32,
    /// First startup retry delay in milliseconds; doubles each attempt
    pub retry_delay_ms: u64,
    /// Ceiling for any retry delay in milliseconds
    pub max_retry_delay_ms: u64,
}

impl Default for RedisConnectionConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: redis::CONNECT_TIMEOUT_SECS,
            response_timeout_secs: redis::RESPONSE_TIMEOUT_SECS,
            reconnect_retries: redis::RECONNECT_RETRIES,
            startup_retries: redis::STARTUP_RETRIES,
            retry_delay_ms: redis::RETRY_DELAY_MS,
            max_retry_delay_ms: redis::MAX_RETRY_DELAY_MS,
        }
    }
}

impl RedisConnectionConfig {
    /// Load from `REDIS_*` variables
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            connect_timeout_secs: env_parse("REDIS_CONNECT_TIMEOUT_SECS", defaults.connect_timeout_secs),
            response_timeout_secs: env_parse(
                "REDIS_RESPONSE_TIMEOUT_SECS",
                defaults.response_timeout_secs,
            ),
            reconnect_retries: env_parse("REDIS_RECONNECT_RETRIES", defaults.reconnect_retries),
            startup_retries: env_parse("REDIS_STARTUP_RETRIES", defaults.startup_retries),
            retry_delay_ms: env_parse("REDIS_RETRY_DELAY_MS", defaults.retry_delay_ms),
            max_retry_delay_ms: env_parse("REDIS_MAX_RETRY_DELAY_MS", defaults.max_retry_delay_ms),
        }
    }

    /// Connect timeout
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Command response timeout
    #[must_use]
    pub const fn response_timeout(&self) -> Duration {
        Duration::from_secs(self.response_timeout_secs)
    }

    /// Sleep before each startup retry: doubling from `retry_delay_ms`, capped
    #[must_use]
    pub fn startup_backoff(&self) -> Vec<Duration> {
        std::iter::successors(Some(self.retry_delay_ms), |d| Some(d.saturating_mul(2)))
            .map(|d| Duration::from_millis(d.min(self.max_retry_delay_ms)))
            .take(self.startup_retries as usize)
            .collect()
    }
}
