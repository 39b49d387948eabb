use crate::config::CircuitBreakerConfig;
use crate::events::CircuitBreakerEvent;
use crate::LeakingBucket;
#[cfg(feature = "metrics")]
use metrics::{counter, gauge};
use outbound_resilience_core::{CorrelationId, ResilienceError};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tokio::time::Instant;

/// Represents the state of the circuit breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum CircuitState {
    /// Calls pass through and failures are counted.
    Closed = 0,
    /// Calls fail immediately until the break duration has elapsed.
    Open = 1,
    /// A single trial call decides whether the circuit closes again.
    HalfOpen = 2,
}

impl CircuitState {
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            1 => CircuitState::Open,
            2 => CircuitState::HalfOpen,
            _ => CircuitState::Closed,
        }
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            CircuitState::Closed => "Closed",
            CircuitState::Open => "Open",
            CircuitState::HalfOpen => "HalfOpen",
        }
    }
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a caller was admitted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Permit {
    /// Normal call in the closed state.
    Closed,
    /// The single trial call of the half-open state.
    Trial,
}

pub(crate) struct Circuit {
    state: CircuitState,
    state_atomic: Arc<AtomicU8>,
    bucket: LeakingBucket,
    open_expiration: Instant,
    last_error: Option<ResilienceError>,
    trial_in_flight: bool,
}

impl Circuit {
    pub(crate) fn new(config: &CircuitBreakerConfig, state_atomic: Arc<AtomicU8>) -> Self {
        let now = Instant::now();
        let open_expiration = match config.initial_state {
            CircuitState::Open => now + config.break_duration,
            _ => now,
        };
        state_atomic.store(config.initial_state as u8, Ordering::Release);

        Self {
            state: config.initial_state,
            state_atomic,
            bucket: LeakingBucket::new(config.leak_window, config.max_failed_calls),
            open_expiration,
            last_error: None,
            trial_in_flight: false,
        }
    }

    pub(crate) fn state(&self) -> CircuitState {
        self.state
    }

    pub(crate) fn open_expiration(&self) -> Instant {
        self.open_expiration
    }

    pub(crate) fn failure_count(&mut self) -> usize {
        self.bucket.leak();
        self.bucket.len()
    }

    /// Decides whether a call may invoke the operation.
    ///
    /// An expired open circuit moves to half-open and is evaluated again under
    /// half-open rules. Rejections carry the last recorded failure as cause.
    pub(crate) fn try_acquire(
        &mut self,
        config: &CircuitBreakerConfig,
        correlation_id: CorrelationId,
    ) -> Result<Permit, ResilienceError> {
        loop {
            match self.state {
                CircuitState::Closed => return Ok(Permit::Closed),
                CircuitState::HalfOpen if !self.trial_in_flight => {
                    self.trial_in_flight = true;
                    return Ok(Permit::Trial);
                }
                CircuitState::HalfOpen => {
                    return Err(self.reject(
                        config,
                        correlation_id,
                        String::from("Circuit breaker is half-open and a trial call is already in flight"),
                    ));
                }
                CircuitState::Open => {
                    let now = Instant::now();
                    if now > self.open_expiration {
                        self.open_expiration = now;
                        self.transition_to(CircuitState::HalfOpen, config, correlation_id);
                        continue;
                    }
                    let remaining = self.open_expiration - now;
                    return Err(self.reject(
                        config,
                        correlation_id,
                        format!(
                            "Circuit breaker is in open state; calls will be tried again in {remaining:?}"
                        ),
                    ));
                }
            }
        }
    }

    fn reject(
        &self,
        config: &CircuitBreakerConfig,
        correlation_id: CorrelationId,
        message: String,
    ) -> ResilienceError {
        tracing::debug!(
            circuitbreaker = %config.name,
            correlation_id = %correlation_id,
            state = %self.state,
            "Call rejected"
        );

        config
            .event_listeners
            .emit_with(|| CircuitBreakerEvent::CallRejected {
                pattern_name: config.name.clone(),
                timestamp: Instant::now(),
                state: self.state,
            });

        #[cfg(feature = "metrics")]
        counter!("circuitbreaker_calls_total", "circuitbreaker" => config.name.clone(), "outcome" => "rejected").increment(1);

        ResilienceError::circuit_breaker(message, self.last_error.clone())
    }

    pub(crate) fn record_success(
        &mut self,
        permit: Permit,
        config: &CircuitBreakerConfig,
        correlation_id: CorrelationId,
    ) {
        tracing::debug!(
            circuitbreaker = %config.name,
            correlation_id = %correlation_id,
            "Operation in circuit breaker succeeded"
        );

        if permit == Permit::Trial {
            self.trial_in_flight = false;
            if self.state == CircuitState::HalfOpen {
                self.bucket.clear();
                self.transition_to(CircuitState::Closed, config, correlation_id);
            }
        }

        config
            .event_listeners
            .emit_with(|| CircuitBreakerEvent::SuccessRecorded {
                pattern_name: config.name.clone(),
                timestamp: Instant::now(),
                state: self.state,
            });

        #[cfg(feature = "metrics")]
        counter!("circuitbreaker_calls_total", "circuitbreaker" => config.name.clone(), "outcome" => "success").increment(1);
    }

    /// Records a failure and returns the error surfaced to the caller.
    pub(crate) fn record_failure(
        &mut self,
        permit: Permit,
        error: ResilienceError,
        config: &CircuitBreakerConfig,
        correlation_id: CorrelationId,
    ) -> ResilienceError {
        tracing::debug!(
            circuitbreaker = %config.name,
            correlation_id = %correlation_id,
            error = %error,
            "Operation in circuit breaker failed"
        );

        let now = Instant::now();
        let full = self.bucket.insert(now);

        let should_open = match permit {
            Permit::Trial => {
                self.trial_in_flight = false;
                self.state == CircuitState::HalfOpen
            }
            Permit::Closed => full && self.state == CircuitState::Closed,
        };

        if should_open {
            self.open_expiration = now + config.break_duration;
            tracing::debug!(
                circuitbreaker = %config.name,
                correlation_id = %correlation_id,
                break_duration = ?config.break_duration,
                "Circuit breaker open expiration set"
            );
            self.transition_to(CircuitState::Open, config, correlation_id);
        }

        config
            .event_listeners
            .emit_with(|| CircuitBreakerEvent::FailureRecorded {
                pattern_name: config.name.clone(),
                timestamp: now,
                state: self.state,
                failures_in_window: self.bucket.len(),
            });

        #[cfg(feature = "metrics")]
        counter!("circuitbreaker_calls_total", "circuitbreaker" => config.name.clone(), "outcome" => "failure").increment(1);

        self.last_error = Some(error.clone());
        ResilienceError::circuit_breaker(
            "An error occurred during execution of the operation in the circuit breaker",
            Some(error),
        )
    }

    /// Releases a trial permit whose call never reported an outcome.
    pub(crate) fn abandon_trial(&mut self) {
        self.trial_in_flight = false;
    }

    /// Forces a state; the transition event fires even when the state is unchanged.
    pub(crate) fn force_state(
        &mut self,
        state: CircuitState,
        config: &CircuitBreakerConfig,
        correlation_id: CorrelationId,
    ) {
        match state {
            CircuitState::Open => {
                self.open_expiration = Instant::now() + config.break_duration;
            }
            CircuitState::HalfOpen | CircuitState::Closed => {
                self.trial_in_flight = false;
            }
        }
        self.transition_to(state, config, correlation_id);
    }

    pub(crate) fn reset_error_count(&mut self) {
        self.bucket.clear();
    }

    fn transition_to(
        &mut self,
        state: CircuitState,
        config: &CircuitBreakerConfig,
        correlation_id: CorrelationId,
    ) {
        let from_state = self.state;
        self.state = state;
        self.state_atomic.store(state as u8, Ordering::Release);

        tracing::warn!(
            circuitbreaker = %config.name,
            correlation_id = %correlation_id,
            from = %from_state,
            to = %state,
            "Circuit breaker state changed"
        );

        config
            .event_listeners
            .emit(&CircuitBreakerEvent::StateTransition {
                pattern_name: config.name.clone(),
                timestamp: Instant::now(),
                from_state,
                to_state: state,
            });

        #[cfg(feature = "metrics")]
        {
            counter!(
                "circuitbreaker_transitions_total",
                "circuitbreaker" => config.name.clone(),
                "from" => from_state.as_str(),
                "to" => state.as_str()
            )
            .increment(1);

            gauge!("circuitbreaker_state", "circuitbreaker" => config.name.clone())
                .set(state as u8 as f64);
        }
    }
}
