// ABOUTME: Redis implementation of the durable search-cache tier
// ABOUTME: Auto-reconnecting ConnectionManager, namespaced keys, SETEX writes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::DurableCacheStore;
use crate::config::RedisConnectionConfig;
use crate::constants::cache::CACHE_KEY_PREFIX;
use crate::errors::{AppError, AppResult, RetrievalError};
use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::AsyncCommands;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Durable tier shared by every engine instance pointing at the same Redis
#[derive(Clone)]
pub struct RedisDurableStore {
    manager: ConnectionManager,
    namespace: String,
}

impl RedisDurableStore {
    /// Connect to `redis_url`, retrying the first connection per `policy`
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or every startup attempt fails
    #[instrument(skip_all)]
    pub async fn connect(redis_url: &str, policy: &RedisConnectionConfig) -> AppResult<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| AppError::config(format!("Invalid Redis URL: {e}")))?;

        let manager_config = ConnectionManagerConfig::new()
            .set_connection_timeout(policy.connect_timeout())
            .set_response_timeout(policy.response_timeout())
            .set_number_of_retries(policy.reconnect_retries)
            .set_max_delay(policy.max_retry_delay_ms);

        let mut backoff = policy.startup_backoff().into_iter();
        let mut attempt = 1_u32;
        let manager = loop {
            match ConnectionManager::new_with_config(client.clone(), manager_config.clone()).await {
                Ok(manager) => break manager,
                Err(e) => match backoff.next() {
                    Some(delay) => {
                        warn!(attempt, ?delay, error = %e, "Redis connection failed, retrying");
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    None => {
                        return Err(AppError::cache(format!(
                            "Redis unreachable after {attempt} attempts: {e}"
                        )));
                    }
                },
            }
        };

        info!(attempts = attempt, "Connected to Redis durable cache");
        Ok(Self {
            manager,
            namespace: CACHE_KEY_PREFIX.to_owned(),
        })
    }

    /// Use a different key prefix (several deployments on one Redis)
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    fn namespaced(&self, key: &str) -> String {
        namespaced_key(&self.namespace, key)
    }
}

fn namespaced_key(namespace: &str, key: &str) -> String {
    format!("{namespace}{key}")
}

/// SETEX rejects a zero expiry
fn expiry_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait]
impl DurableCacheStore for RedisDurableStore {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, RetrievalError> {
        let mut conn = self.manager.clone();
        conn.get(self.namespaced(key))
            .await
            .map_err(RetrievalError::cache_unavailable)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), RetrievalError> {
        let mut conn = self.manager.clone();
        conn.set_ex::<_, _, ()>(self.namespaced(key), value, expiry_secs(ttl))
            .await
            .map_err(RetrievalError::cache_unavailable)
    }

    async fn ping(&self) -> Result<(), RetrievalError> {
        let mut conn = self.manager.clone();
        let reply: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(RetrievalError::cache_unavailable)?;
        if reply == "PONG" {
            Ok(())
        } else {
            Err(RetrievalError::cache_unavailable(format!(
                "unexpected PING reply '{reply}'"
            )))
        }
    }
}
