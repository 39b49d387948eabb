//! Configuration for the timeout proxy.

use crate::events::TimeoutEvent;
use outbound_resilience_core::{ensure_non_zero, ConfigError, EventListeners};
use std::time::Duration;

/// Configuration for the timeout proxy.
pub struct TimeoutConfig {
    pub(crate) timeout: Duration,
    pub(crate) cancel_running_future: bool,
    pub(crate) event_listeners: EventListeners<TimeoutEvent>,
    pub(crate) name: String,
}

impl TimeoutConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> TimeoutConfigBuilder {
        TimeoutConfigBuilder::new()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn cancel_running_future(&self) -> bool {
        self.cancel_running_future
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Builder for [`TimeoutConfig`].
pub struct TimeoutConfigBuilder {
    timeout: Duration,
    cancel_running_future: bool,
    event_listeners: EventListeners<TimeoutEvent>,
    name: String,
}

impl TimeoutConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            cancel_running_future: false,
            event_listeners: EventListeners::new(),
            name: String::from("<unnamed>"),
        }
    }

    /// Sets the deadline.
    ///
    /// Default: 5 seconds
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = duration;
        self
    }

    /// Sets whether the operation is dropped when the deadline fires.
    ///
    /// When false the operation runs as a separate task and keeps running in
    /// the background after a timeout; its result is discarded. When true the
    /// operation's future is dropped at the deadline.
    ///
    /// Default: false
    pub fn cancel_running_future(mut self, cancel: bool) -> Self {
        self.cancel_running_future = cancel;
        self
    }

    /// Sets the name of this proxy instance for observability.
    ///
    /// Default: `"<unnamed>"`
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Registers a callback invoked with the elapsed time of a call that
    /// succeeded within the deadline.
    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: Fn(Duration) + Send + Sync + 'static,
    {
        self.event_listeners.on(move |event| {
            if let TimeoutEvent::Success { duration, .. } = event {
                f(*duration);
            }
        });
        self
    }

    /// Registers a callback invoked with the elapsed time of a call that
    /// failed within the deadline.
    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(Duration) + Send + Sync + 'static,
    {
        self.event_listeners.on(move |event| {
            if let TimeoutEvent::Error { duration, .. } = event {
                f(*duration);
            }
        });
        self
    }

    /// Registers a callback invoked when a call times out.
    pub fn on_timeout<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.event_listeners.on(move |event| {
            if matches!(event, TimeoutEvent::Timeout { .. }) {
                f();
            }
        });
        self
    }

    pub fn build(self) -> Result<TimeoutConfig, ConfigError> {
        ensure_non_zero("timeout", self.timeout)?;

        Ok(TimeoutConfig {
            timeout: self.timeout,
            cancel_running_future: self.cancel_running_future,
            event_listeners: self.event_listeners,
            name: self.name,
        })
    }
}

impl Default for TimeoutConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
