use crate::events::RetryEvent;
use outbound_resilience_core::{ensure_positive, ConfigError, EventListeners};
use std::time::Duration;

/// Configuration for the retry proxy.
pub struct RetryConfig {
    pub(crate) retries: usize,
    pub(crate) backoff: Duration,
    pub(crate) event_listeners: EventListeners<RetryEvent>,
    pub(crate) name: String,
}

impl RetryConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> RetryConfigBuilder {
        RetryConfigBuilder::new()
    }

    /// Total number of attempts, including the first one.
    pub fn retries(&self) -> usize {
        self.retries
    }

    pub fn backoff(&self) -> Duration {
        self.backoff
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Builder for [`RetryConfig`].
pub struct RetryConfigBuilder {
    retries: usize,
    backoff: Duration,
    event_listeners: EventListeners<RetryEvent>,
    name: String,
}

impl RetryConfigBuilder {
    pub fn new() -> Self {
        Self {
            retries: 3,
            backoff: Duration::ZERO,
            event_listeners: EventListeners::new(),
            name: String::from("<unnamed>"),
        }
    }

    /// Total number of attempts. `1` means a single attempt and no retry.
    ///
    /// Default: 3
    pub fn retries(mut self, retries: usize) -> Self {
        self.retries = retries;
        self
    }

    /// Fixed pause between a failed attempt and the next one.
    ///
    /// Default: zero (the next attempt starts immediately)
    pub fn backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Default: `<unnamed>`
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Registers a callback invoked with the number of the attempt that just failed
    /// whenever another attempt follows.
    pub fn on_retry<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.event_listeners.on(move |event| {
            if let RetryEvent::Retry { attempt, .. } = event {
                f(*attempt);
            }
        });
        self
    }

    /// Registers a callback invoked with the attempt count on success.
    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.event_listeners.on(move |event| {
            if let RetryEvent::Success { attempts, .. } = event {
                f(*attempts);
            }
        });
        self
    }

    /// Registers a callback invoked once every attempt has failed.
    pub fn on_exhausted<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.event_listeners.on(move |event| {
            if let RetryEvent::Exhausted { attempts, .. } = event {
                f(*attempts);
            }
        });
        self
    }

    pub fn build(self) -> Result<RetryConfig, ConfigError> {
        ensure_positive("retries", self.retries)?;

        Ok(RetryConfig {
            retries: self.retries,
            backoff: self.backoff,
            event_listeners: self.event_listeners,
            name: self.name,
        })
    }
}

impl Default for RetryConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
