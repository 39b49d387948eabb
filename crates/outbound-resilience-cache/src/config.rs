use crate::events::CacheEvent;
use outbound_resilience_core::{ensure_non_zero, ensure_positive, ConfigError, EventListeners};
use std::time::Duration;

/// Configuration for [`MemoryCache`](crate::MemoryCache).
pub struct MemoryCacheConfig {
    pub(crate) expiration: Duration,
    pub(crate) garbage_collect_every: usize,
    pub(crate) max_entry_count: usize,
    pub(crate) event_listeners: EventListeners<CacheEvent>,
    pub(crate) name: String,
}

impl MemoryCacheConfig {
    pub fn builder() -> MemoryCacheConfigBuilder {
        MemoryCacheConfigBuilder::new()
    }

    pub fn expiration(&self) -> Duration {
        self.expiration
    }

    pub fn garbage_collect_every(&self) -> usize {
        self.garbage_collect_every
    }

    pub fn max_entry_count(&self) -> usize {
        self.max_entry_count
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Builder for [`MemoryCacheConfig`].
pub struct MemoryCacheConfigBuilder {
    expiration: Option<Duration>,
    garbage_collect_every: usize,
    max_entry_count: usize,
    event_listeners: EventListeners<CacheEvent>,
    name: String,
}

impl MemoryCacheConfigBuilder {
    pub fn new() -> Self {
        Self {
            expiration: None,
            garbage_collect_every: 50,
            max_entry_count: 1000,
            event_listeners: EventListeners::new(),
            name: String::from("<unnamed>"),
        }
    }

    /// Time an entry stays valid, counted from its insertion. Required.
    pub fn expiration(mut self, expiration: Duration) -> Self {
        self.expiration = Some(expiration);
        self
    }

    /// Run garbage collection on every n-th request.
    ///
    /// Default: 50
    pub fn garbage_collect_every(mut self, requests: usize) -> Self {
        self.garbage_collect_every = requests;
        self
    }

    /// Maximum number of keys held; the oldest key is evicted beyond it.
    ///
    /// Default: 1000
    pub fn max_entry_count(mut self, count: usize) -> Self {
        self.max_entry_count = count;
        self
    }

    /// Default: `<unnamed>`
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Registers a callback invoked with the key on every cache hit.
    pub fn on_hit<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.event_listeners.on(move |event| {
            if let CacheEvent::Hit { key, .. } = event {
                f(key);
            }
        });
        self
    }

    /// Registers a callback invoked with the key on every cache miss.
    pub fn on_miss<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.event_listeners.on(move |event| {
            if let CacheEvent::Miss { key, .. } = event {
                f(key);
            }
        });
        self
    }

    /// Registers a callback invoked with the key of each capacity eviction.
    pub fn on_eviction<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.event_listeners.on(move |event| {
            if let CacheEvent::Eviction { key, .. } = event {
                f(key);
            }
        });
        self
    }

    /// Registers a callback invoked with the number of entries removed by
    /// each garbage collection pass.
    pub fn on_garbage_collected<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.event_listeners.on(move |event| {
            if let CacheEvent::GarbageCollected { removed, .. } = event {
                f(*removed);
            }
        });
        self
    }

    pub fn build(self) -> Result<MemoryCacheConfig, ConfigError> {
        let expiration = self
            .expiration
            .ok_or(ConfigError::argument_null("expiration"))?;
        ensure_non_zero("expiration", expiration)?;
        ensure_positive("garbage_collect_every", self.garbage_collect_every)?;
        ensure_positive("max_entry_count", self.max_entry_count)?;

        Ok(MemoryCacheConfig {
            expiration,
            garbage_collect_every: self.garbage_collect_every,
            max_entry_count: self.max_entry_count,
            event_listeners: self.event_listeners,
            name: self.name,
        })
    }
}

impl Default for MemoryCacheConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
