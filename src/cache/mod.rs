// ABOUTME: Two-tier search result cache with an in-process LRU tier and an optional durable tier
// ABOUTME: Keys are SHA-256 digests of the normalized query, sorted filters, limit, and semantic flag
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Search Cache
//!
//! Reads check the fast tier first, then the durable tier; a durable hit is
//! copied into the fast tier. Writes land in the fast tier synchronously and
//! are pushed to the durable tier from a spawned task whose outcome is only
//! logged.
//!
//! ```rust,no_run
//! use pierre_exercise_engine::cache::{CacheKey, CachedSearch, SearchCache, SystemClock};
//! use pierre_exercise_engine::config::SearchCacheConfig;
//! use pierre_exercise_engine::models::SearchRequest;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() {
//! let config = SearchCacheConfig {
//!     enable_background_cleanup: false,
//!     ..SearchCacheConfig::default()
//! };
//! let cache = SearchCache::new(&config, Arc::new(SystemClock), None, Duration::from_millis(500));
//!
//! let request = SearchRequest {
//!     query: "bench press".to_owned(),
//!     equipment: vec![],
//!     body_parts: vec![],
//!     limit: 20,
//!     semantic: true,
//! };
//! let key = CacheKey::for_request(&request);
//! cache.put(&key, CachedSearch::default());
//! assert!(cache.get(&key).await.is_some());
//! # }
//! ```

/// Injectable clocks
pub mod clock;
/// In-process LRU tier
pub mod memory;
/// Redis durable tier
pub mod redis;

pub use clock::{Clock, ManualClock, SystemClock};
pub use memory::FastTierCache;
pub use self::redis::RedisDurableStore;

use crate::config::SearchCacheConfig;
use crate::constants::cache::CACHE_KEY_VERSION;
use crate::errors::RetrievalError;
use crate::models::{ExerciseSearchHit, SearchRequest};
use crate::search::normalize_query;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Byte store with per-key TTL shared across instances
#[async_trait]
pub trait DurableCacheStore: Send + Sync {
    /// Backend identifier for logs and readiness
    fn name(&self) -> &'static str;

    /// Stored bytes for `key`, if present and unexpired
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, RetrievalError>;

    /// Store `value` under `key` for `ttl`
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), RetrievalError>;

    /// Connectivity check
    async fn ping(&self) -> Result<(), RetrievalError>;
}

/// SHA-256 hex digest identifying one normalized search request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

fn canonical_list(values: &[String]) -> String {
    let mut items: Vec<String> = values
        .iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect();
    items.sort();
    items.dedup();
    items.join(",")
}

impl CacheKey {
    /// Key for `request`; filter order, case, and duplicates do not matter
    #[must_use]
    pub fn for_request(request: &SearchRequest) -> Self {
        let material = format!(
            "{CACHE_KEY_VERSION}|{}|{}|{}|{}|{}",
            normalize_query(&request.query),
            canonical_list(&request.equipment),
            canonical_list(&request.body_parts),
            request.limit,
            request.semantic
        );
        Self(hex::encode(Sha256::digest(material.as_bytes())))
    }

    /// Hex digest
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cached search payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CachedSearch {
    /// Ranked hits
    pub results: Vec<ExerciseSearchHit>,
    /// Spelling-correction hint computed with the results
    #[serde(default)]
    pub correction: Option<String>,
}

/// Tier that served a cache hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheTier {
    /// In-process LRU
    Fast,
    /// Shared durable store
    Durable,
}

/// Durable tier state reported by readiness checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DurableStatus {
    /// No durable tier configured
    Disabled,
    /// Durable tier answered a ping
    Healthy {
        /// Backend name
        backend: String,
    },
    /// Durable tier did not answer
    Unavailable {
        /// Backend name
        backend: String,
        /// Failure detail
        reason: String,
    },
}

/// Two-tier cache in front of the fused search pipeline
pub struct SearchCache {
    fast: FastTierCache<CachedSearch>,
    durable: Option<Arc<dyn DurableCacheStore>>,
    durable_ttl: Duration,
    durable_timeout: Duration,
}

impl SearchCache {
    /// Build the cache; the fast-tier sweep task starts when enabled in `config`
    #[must_use]
    pub fn new(
        config: &SearchCacheConfig,
        clock: Arc<dyn Clock>,
        durable: Option<Arc<dyn DurableCacheStore>>,
        durable_timeout: Duration,
    ) -> Self {
        let cleanup = config
            .enable_background_cleanup
            .then(|| config.cleanup_interval());
        Self {
            fast: FastTierCache::new(config.max_entries, config.fast_ttl(), clock, cleanup),
            durable,
            durable_ttl: config.durable_ttl(),
            durable_timeout,
        }
    }

    /// Whether a durable tier is configured
    #[must_use]
    pub fn has_durable_tier(&self) -> bool {
        self.durable.is_some()
    }

    /// Fast-tier handle (inspection and tests)
    #[must_use]
    pub const fn fast_tier(&self) -> &FastTierCache<CachedSearch> {
        &self.fast
    }

    /// Cached payload for `key` and the tier that held it
    pub async fn get(&self, key: &CacheKey) -> Option<(CachedSearch, CacheTier)> {
        if let Some(hit) = self.fast.get(key.as_str()) {
            debug!(key = %key, "Fast-tier cache hit");
            return Some((hit, CacheTier::Fast));
        }

        let durable = self.durable.as_ref()?;
        let bytes = match tokio::time::timeout(self.durable_timeout, durable.get(key.as_str()))
            .await
        {
            Ok(Ok(Some(bytes))) => bytes,
            Ok(Ok(None)) => return None,
            Ok(Err(e)) => {
                warn!(error = %e, "Durable cache read failed, continuing without it");
                return None;
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.durable_timeout.as_millis(),
                    "Durable cache read timed out, continuing without it"
                );
                return None;
            }
        };

        match serde_json::from_slice::<CachedSearch>(&bytes) {
            Ok(payload) => {
                debug!(key = %key, "Durable-tier cache hit, backfilling fast tier");
                self.fast.insert(key.as_str(), payload.clone());
                Some((payload, CacheTier::Durable))
            }
            Err(e) => {
                warn!(error = %e, "Discarding undecodable durable cache entry");
                None
            }
        }
    }

    /// Store `payload`: fast tier now, durable tier in the background
    ///
    /// Returns the handle of the spawned durable write, if one was started.
    pub fn put(&self, key: &CacheKey, payload: CachedSearch) -> Option<JoinHandle<()>> {
        let bytes = self
            .durable
            .is_some()
            .then(|| serde_json::to_vec(&payload));
        self.fast.insert(key.as_str(), payload);

        let store = Arc::clone(self.durable.as_ref()?);
        let bytes = match bytes? {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "Failed to encode search payload for durable cache");
                return None;
            }
        };

        let runtime = tokio::runtime::Handle::try_current().ok()?;
        let key = key.as_str().to_owned();
        let ttl = self.durable_ttl;
        let limit = self.durable_timeout;
        Some(runtime.spawn(async move {
            match tokio::time::timeout(limit, store.set(&key, bytes, ttl)).await {
                Ok(Ok(())) => debug!(backend = store.name(), "Durable cache write complete"),
                Ok(Err(e)) => warn!(error = %e, "Durable cache write failed"),
                Err(_) => warn!(
                    timeout_ms = limit.as_millis(),
                    "Durable cache write timed out"
                ),
            }
        }))
    }

    /// Ping the durable tier
    pub async fn durable_status(&self) -> DurableStatus {
        let Some(store) = self.durable.as_ref() else {
            return DurableStatus::Disabled;
        };
        let backend = store.name().to_owned();
        match tokio::time::timeout(self.durable_timeout, store.ping()).await {
            Ok(Ok(())) => DurableStatus::Healthy { backend },
            Ok(Err(e)) => DurableStatus::Unavailable {
                backend,
                reason: e.to_string(),
            },
            Err(_) => DurableStatus::Unavailable {
                backend,
                reason: format!("timed out after {}ms", self.durable_timeout.as_millis()),
            },
        }
    }

    /// Stop background work owned by the cache
    pub fn shutdown(&self) {
        self.fast.shutdown();
    }
}
