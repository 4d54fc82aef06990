// ABOUTME: In-process fast cache tier with LRU eviction and clock-driven TTL
// ABOUTME: Optional background task sweeps expired entries until shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::Clock;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

type Store<V> = Arc<Mutex<LruCache<String, CacheEntry<V>>>>;

/// Bounded LRU cache whose entries expire according to an injected clock
///
/// The store sits behind a std `Mutex` so writes stay synchronous; no lock is
/// held across an await point.
pub struct FastTierCache<V> {
    store: Store<V>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    shutdown_tx: Option<mpsc::Sender<()>>,
}

impl<V: Clone + Send + 'static> FastTierCache<V> {
    /// Capacity used when zero is configured
    const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
        Some(n) => n,
        None => unreachable!(),
    };

    /// Create a cache; with `cleanup_interval` set, a sweep task is spawned on
    /// the current tokio runtime when there is one
    #[must_use]
    pub fn new(
        capacity: usize,
        ttl: Duration,
        clock: Arc<dyn Clock>,
        cleanup_interval: Option<Duration>,
    ) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(Self::DEFAULT_CAPACITY);
        let store: Store<V> = Arc::new(Mutex::new(LruCache::new(capacity)));

        let runtime = tokio::runtime::Handle::try_current().ok();
        let shutdown_tx = match (cleanup_interval, runtime) {
            (Some(every), Some(runtime)) => {
                let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
                let store_clone = Arc::clone(&store);
                let clock_clone = Arc::clone(&clock);

                runtime.spawn(async move {
                    let mut interval = tokio::time::interval(every);
                    loop {
                        tokio::select! {
                            _ = interval.tick() => {
                                Self::sweep(&store_clone, clock_clone.now());
                            }
                            _ = shutdown_rx.recv() => {
                                tracing::debug!("Fast-tier cleanup task received shutdown signal");
                                break;
                            }
                        }
                    }
                });
                Some(shutdown_tx)
            }
            (Some(_), None) => {
                tracing::warn!("No tokio runtime, fast-tier sweep disabled; expired entries drop on read");
                None
            }
            (None, _) => None,
        };

        Self {
            store,
            clock,
            ttl,
            shutdown_tx,
        }
    }

    fn lock(store: &Store<V>) -> MutexGuard<'_, LruCache<String, CacheEntry<V>>> {
        store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn sweep(store: &Store<V>, now: Instant) -> usize {
        let mut guard = Self::lock(store);
        let expired: Vec<String> = guard
            .iter()
            .filter(|(_, entry)| now >= entry.expires_at)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            guard.pop(key);
        }
        drop(guard);
        if !expired.is_empty() {
            tracing::debug!("Cleaned up {} expired fast-tier entries", expired.len());
        }
        expired.len()
    }

    /// Default TTL applied by [`Self::insert`]
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Live value for `key`; expired entries are removed on read
    #[must_use]
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut store = Self::lock(&self.store);
        let expired = match store.get(key) {
            Some(entry) if now < entry.expires_at => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            store.pop(key);
        }
        None
    }

    /// Store with the default TTL
    pub fn insert(&self, key: &str, value: V) {
        self.insert_with_ttl(key, value, self.ttl);
    }

    /// Store with an explicit TTL; a rewrite never moves expiry backwards
    pub fn insert_with_ttl(&self, key: &str, value: V, ttl: Duration) {
        let now = self.clock.now();
        let mut expires_at = now + ttl;
        let mut store = Self::lock(&self.store);
        if let Some(existing) = store.peek(key) {
            if existing.expires_at > now {
                expires_at = expires_at.max(existing.expires_at);
            }
        }
        store.put(key.to_owned(), CacheEntry { value, expires_at });
    }

    /// Time left before `key` expires
    #[must_use]
    pub fn remaining_ttl(&self, key: &str) -> Option<Duration> {
        let now = self.clock.now();
        Self::lock(&self.store)
            .peek(key)
            .and_then(|entry| entry.expires_at.checked_duration_since(now))
            .filter(|left| !left.is_zero())
    }

    /// Remove every expired entry, returning how many were dropped
    pub fn cleanup_expired(&self) -> usize {
        Self::sweep(&self.store, self.clock.now())
    }

    /// Entries currently held, expired or not
    #[must_use]
    pub fn len(&self) -> usize {
        Self::lock(&self.store).len()
    }

    /// Whether the cache holds nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry
    pub fn clear(&self) {
        Self::lock(&self.store).clear();
    }

    /// Stop the background sweep task, if running
    pub fn shutdown(&self) {
        if let Some(tx) = &self.shutdown_tx {
            if let Err(e) = tx.try_send(()) {
                tracing::debug!(error = ?e, "Fast-tier shutdown signal send failed (channel likely closed)");
            }
        }
    }
}

impl<V> Drop for FastTierCache<V> {
    fn drop(&mut self) {
        if let Some(tx) = &self.shutdown_tx {
            let _ = tx.try_send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    fn cache(capacity: usize, clock: &Arc<ManualClock>) -> FastTierCache<u32> {
        let clock: Arc<dyn Clock> = clock.clone();
        FastTierCache::new(capacity, Duration::from_secs(300), clock, None)
    }

    #[test]
    fn test_round_trip_and_expiry() {
        let clock = Arc::new(ManualClock::new());
        let cache = cache(10, &clock);
        cache.insert("k", 7);
        assert_eq!(cache.get("k"), Some(7));

        clock.advance(Duration::from_secs(299));
        assert_eq!(cache.get("k"), Some(7));

        clock.advance(Duration::from_secs(1));
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_lru_eviction() {
        let clock = Arc::new(ManualClock::new());
        let cache = cache(2, &clock);
        cache.insert("a", 1);
        cache.insert("b", 2);
        assert_eq!(cache.get("a"), Some(1));
        cache.insert("c", 3);
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("c"), Some(3));
    }

    #[test]
    fn test_rewrite_never_shortens_expiry() {
        let clock = Arc::new(ManualClock::new());
        let cache = cache(10, &clock);
        cache.insert_with_ttl("k", 1, Duration::from_secs(300));
        cache.insert_with_ttl("k", 2, Duration::from_secs(10));
        assert_eq!(cache.remaining_ttl("k"), Some(Duration::from_secs(300)));
        assert_eq!(cache.get("k"), Some(2));
    }

    #[test]
    fn test_cleanup_expired() {
        let clock = Arc::new(ManualClock::new());
        let cache = cache(10, &clock);
        cache.insert_with_ttl("short", 1, Duration::from_secs(5));
        cache.insert("long", 2);
        clock.advance(Duration::from_secs(6));
        assert_eq!(cache.cleanup_expired(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_sweep_requested_without_runtime_still_builds() {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new());
        let cache = FastTierCache::new(10, Duration::from_secs(300), clock, Some(Duration::from_secs(60)));
        cache.insert("k", 1);
        assert_eq!(cache.get("k"), Some(1));
        cache.shutdown();
    }

    #[tokio::test]
    async fn test_sweep_task_runs_inside_runtime() {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new());
        let cache: FastTierCache<u32> =
            FastTierCache::new(10, Duration::from_secs(300), clock, Some(Duration::from_secs(60)));
        assert!(cache.shutdown_tx.is_some());
        cache.shutdown();
    }
}
