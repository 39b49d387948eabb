use crate::events::CircuitBreakerEvent;
use crate::{CircuitState, LeakingBucket};
use outbound_resilience_core::{ensure_non_zero, ensure_positive, ConfigError, EventListeners};
use std::time::Duration;

/// Configuration for the circuit breaker proxy.
pub struct CircuitBreakerConfig {
    pub(crate) break_duration: Duration,
    pub(crate) max_failed_calls: usize,
    pub(crate) leak_window: Duration,
    pub(crate) initial_state: CircuitState,
    pub(crate) event_listeners: EventListeners<CircuitBreakerEvent>,
    pub(crate) name: String,
}

impl CircuitBreakerConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> CircuitBreakerConfigBuilder {
        CircuitBreakerConfigBuilder::new()
    }

    pub fn break_duration(&self) -> Duration {
        self.break_duration
    }

    pub fn max_failed_calls(&self) -> usize {
        self.max_failed_calls
    }

    pub fn leak_window(&self) -> Duration {
        self.leak_window
    }

    pub fn initial_state(&self) -> CircuitState {
        self.initial_state
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Builder for [`CircuitBreakerConfig`].
pub struct CircuitBreakerConfigBuilder {
    break_duration: Duration,
    max_failed_calls: usize,
    leak_window: Duration,
    initial_state: CircuitState,
    event_listeners: EventListeners<CircuitBreakerEvent>,
    name: String,
}

impl CircuitBreakerConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self {
            break_duration: Duration::from_secs(30),
            max_failed_calls: LeakingBucket::DEFAULT_CAPACITY,
            leak_window: LeakingBucket::DEFAULT_WINDOW,
            initial_state: CircuitState::Closed,
            event_listeners: EventListeners::new(),
            name: String::from("<unnamed>"),
        }
    }

    /// Minimum time the circuit stays open before a trial call is let through.
    ///
    /// Default: 30 seconds
    pub fn break_duration(mut self, duration: Duration) -> Self {
        self.break_duration = duration;
        self
    }

    /// Number of failures inside the leak window that opens the circuit.
    ///
    /// Default: 50
    pub fn max_failed_calls(mut self, n: usize) -> Self {
        self.max_failed_calls = n;
        self
    }

    /// How long a recorded failure counts against the circuit.
    ///
    /// Default: 10 minutes
    pub fn leak_window(mut self, window: Duration) -> Self {
        self.leak_window = window;
        self
    }

    /// State the breaker starts in. An initially open breaker stays open for
    /// one `break_duration` after construction.
    ///
    /// Default: `Closed`
    pub fn initial_state(mut self, state: CircuitState) -> Self {
        self.initial_state = state;
        self
    }

    /// Give this breaker a human-readable name for observability.
    ///
    /// Default: `<unnamed>`
    pub fn name<N: Into<String>>(mut self, n: N) -> Self {
        self.name = n.into();
        self
    }

    /// Registers a callback invoked with `(from, to)` whenever the state changes
    /// or is forced through [`CircuitBreakerProxy::set_state`](crate::CircuitBreakerProxy::set_state).
    pub fn on_state_transition<F>(mut self, f: F) -> Self
    where
        F: Fn(CircuitState, CircuitState) + Send + Sync + 'static,
    {
        self.event_listeners.on(move |event| {
            if let CircuitBreakerEvent::StateTransition {
                from_state,
                to_state,
                ..
            } = event
            {
                f(*from_state, *to_state);
            }
        });
        self
    }

    /// Registers a callback invoked when a call is short-circuited.
    pub fn on_call_rejected<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.event_listeners.on(move |event| {
            if matches!(event, CircuitBreakerEvent::CallRejected { .. }) {
                f();
            }
        });
        self
    }

    /// Registers a callback invoked with the state after each recorded failure
    /// and the number of failures currently in the window.
    pub fn on_failure<F>(mut self, f: F) -> Self
    where
        F: Fn(CircuitState, usize) + Send + Sync + 'static,
    {
        self.event_listeners.on(move |event| {
            if let CircuitBreakerEvent::FailureRecorded {
                state,
                failures_in_window,
                ..
            } = event
            {
                f(*state, *failures_in_window);
            }
        });
        self
    }

    /// Registers a callback invoked with the state after each success.
    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: Fn(CircuitState) + Send + Sync + 'static,
    {
        self.event_listeners.on(move |event| {
            if let CircuitBreakerEvent::SuccessRecorded { state, .. } = event {
                f(*state);
            }
        });
        self
    }

    /// Validates and builds the configuration.
    pub fn build(self) -> Result<CircuitBreakerConfig, ConfigError> {
        ensure_non_zero("break_duration", self.break_duration)?;
        ensure_positive("max_failed_calls", self.max_failed_calls)?;
        ensure_non_zero("leak_window", self.leak_window)?;

        Ok(CircuitBreakerConfig {
            break_duration: self.break_duration,
            max_failed_calls: self.max_failed_calls,
            leak_window: self.leak_window,
            initial_state: self.initial_state,
            event_listeners: self.event_listeners,
            name: self.name,
        })
    }
}

impl Default for CircuitBreakerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
