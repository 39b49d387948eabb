use crate::config::MemoryCacheConfig;
use crate::contract::Cache;
use crate::entry::CacheEntry;
use crate::events::CacheEvent;
use crate::queue::MemoryQueue;
use futures::future::BoxFuture;
#[cfg(feature = "metrics")]
use metrics::counter;
use outbound_resilience_core::{CorrelationId, Operation, ResilienceError};
use parking_lot::Mutex;
use std::collections::HashMap;
use tokio::time::Instant;

struct CacheState<V> {
    entries: HashMap<String, CacheEntry<V>>,
    queue: MemoryQueue<String>,
    garbage_counter: usize,
}

/// An in-memory cache with fixed per-entry expiration and FIFO eviction.
///
/// Expired entries are swept every `garbage_collect_every` requests. Once
/// `max_entry_count` keys are stored, inserting a new key evicts the oldest
/// one. The lock is never held while the wrapped operation runs, so two
/// concurrent misses for the same key both invoke the operation.
pub struct MemoryCache<V> {
    state: Mutex<CacheState<V>>,
    config: MemoryCacheConfig,
}

impl<V> MemoryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(config: MemoryCacheConfig) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                queue: MemoryQueue::new(config.max_entry_count),
                garbage_counter: 1,
            }),
            config,
        }
    }

    pub fn config(&self) -> &MemoryCacheConfig {
        &self.config
    }

    /// Number of stored entries, expired ones included until collected.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    /// Number of keys tracked by the eviction queue.
    pub fn queued_len(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Returns true if an entry is stored for `key`, expired or not.
    pub fn contains_key(&self, key: &str) -> bool {
        self.state.lock().entries.contains_key(key)
    }

    /// `None` if no entry is stored for `key`.
    pub fn has_expired(&self, key: &str) -> Option<bool> {
        let now = Instant::now();
        self.state
            .lock()
            .entries
            .get(key)
            .map(|entry| entry.is_expired_at(now))
    }

    /// Returns the stored value for `key` if it has not expired.
    pub fn retrieve(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        self.state
            .lock()
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.value().clone())
    }

    /// Stores `value` under `key` until `expires`.
    ///
    /// Re-inserting a key moves it to the back of the eviction order. If the
    /// cache is full the oldest key is evicted first.
    pub fn insert(&self, key: impl Into<String>, value: V, expires: Instant) {
        let key = key.into();
        let mut state = self.state.lock();
        self.insert_locked(&mut state, key, value, expires);
    }

    /// Removes every expired entry and returns how many were removed.
    pub fn garbage_collect(&self) -> usize {
        let mut state = self.state.lock();
        self.collect_locked(&mut state)
    }

    /// Empties the cache and resets the request counter.
    pub fn clear(&self) {
        {
            let mut state = self.state.lock();
            state.entries.clear();
            state.queue.clear();
            state.garbage_counter = 1;
        }

        tracing::warn!(cache = %self.config.name, "Maintenance: MemoryCache cleared");
        self.config.event_listeners.emit_with(|| CacheEvent::Cleared {
            pattern_name: self.config.name.clone(),
            timestamp: Instant::now(),
        });
    }

    async fn call(
        &self,
        operation: Operation<V>,
        key: &str,
        correlation_id: CorrelationId,
    ) -> Result<V, ResilienceError> {
        let name = &self.config.name;

        if key.is_empty() {
            let error = ResilienceError::cache("MemoryCache called with 'key' null or empty", None);
            tracing::error!(cache = %name, correlation_id = %correlation_id, error = %error, "Rejected cache request");
            return Err(error);
        }

        tracing::trace!(cache = %name, correlation_id = %correlation_id, key, "Starting MemoryCache");

        let cached = {
            let mut state = self.state.lock();
            state.garbage_counter += 1;
            if state.garbage_counter % self.config.garbage_collect_every == 0 {
                self.collect_locked(&mut state);
            }

            let now = Instant::now();
            match state.entries.get(key) {
                Some(entry) if !entry.is_expired_at(now) => Some(entry.value().clone()),
                Some(_) => {
                    tracing::debug!(cache = %name, correlation_id = %correlation_id, key, "Key in MemoryCache has already expired");
                    None
                }
                None => {
                    tracing::debug!(cache = %name, correlation_id = %correlation_id, key, "Key is not in MemoryCache");
                    None
                }
            }
        };

        if let Some(value) = cached {
            tracing::debug!(cache = %name, correlation_id = %correlation_id, key, "Returning cached value");
            self.config.event_listeners.emit_with(|| CacheEvent::Hit {
                pattern_name: name.clone(),
                timestamp: Instant::now(),
                key: key.to_string(),
            });
            #[cfg(feature = "metrics")]
            counter!("cache_requests_total", "cache" => name.clone(), "outcome" => "hit").increment(1);
            return Ok(value);
        }

        self.config.event_listeners.emit_with(|| CacheEvent::Miss {
            pattern_name: name.clone(),
            timestamp: Instant::now(),
            key: key.to_string(),
        });
        #[cfg(feature = "metrics")]
        counter!("cache_requests_total", "cache" => name.clone(), "outcome" => "miss").increment(1);

        match operation.call().await {
            Ok(value) => {
                let expires = Instant::now() + self.config.expiration;
                {
                    let mut state = self.state.lock();
                    self.insert_locked(&mut state, key.to_string(), value.clone(), expires);
                }
                tracing::debug!(cache = %name, correlation_id = %correlation_id, key, "Returning fresh value");
                Ok(value)
            }
            Err(cause) => {
                let error = ResilienceError::cache(
                    "Error in MemoryCache occurred calling the operation",
                    Some(cause),
                );
                tracing::error!(cache = %name, correlation_id = %correlation_id, key, error = %error, "Cache miss failed");
                Err(error)
            }
        }
    }

    fn insert_locked(&self, state: &mut CacheState<V>, key: String, value: V, expires: Instant) {
        tracing::debug!(cache = %self.config.name, key = %key, "Storing value in MemoryCache");

        if state.entries.contains_key(&key) {
            state.queue.remove(&key);
        }
        state
            .entries
            .insert(key.clone(), CacheEntry::new(key.clone(), value, expires));

        if let Some(evicted) = state.queue.push(key).popped {
            state.entries.remove(&evicted);
            tracing::trace!(cache = %self.config.name, key = %evicted, "Evicted oldest key from MemoryCache");
            self.config.event_listeners.emit_with(|| CacheEvent::Eviction {
                pattern_name: self.config.name.clone(),
                timestamp: Instant::now(),
                key: evicted.clone(),
            });
            #[cfg(feature = "metrics")]
            counter!("cache_evictions_total", "cache" => self.config.name.clone(), "reason" => "capacity")
                .increment(1);
        }
    }

    fn collect_locked(&self, state: &mut CacheState<V>) -> usize {
        let now = Instant::now();
        let expired: Vec<String> = state
            .entries
            .values()
            .filter(|entry| entry.is_expired_at(now))
            .map(|entry| entry.key().to_string())
            .collect();

        for key in &expired {
            state.entries.remove(key);
            state.queue.remove(key);
        }
        state.garbage_counter = 1;

        let removed = expired.len();
        tracing::trace!(cache = %self.config.name, removed, "MemoryCache garbage collection finished");
        self.config.event_listeners.emit_with(|| CacheEvent::GarbageCollected {
            pattern_name: self.config.name.clone(),
            timestamp: now,
            removed,
        });
        #[cfg(feature = "metrics")]
        if removed > 0 {
            counter!("cache_evictions_total", "cache" => self.config.name.clone(), "reason" => "expired")
                .increment(removed as u64);
        }
        removed
    }
}

impl<V> Cache<V> for MemoryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn execute<'a>(
        &'a self,
        operation: Operation<V>,
        key: &'a str,
        correlation_id: CorrelationId,
    ) -> BoxFuture<'a, Result<V, ResilienceError>> {
        Box::pin(self.call(operation, key, correlation_id))
    }

    fn clear(&self) {
        MemoryCache::clear(self)
    }
}
