//! Circuit breaker proxy.
//!
//! Stops calling a failing dependency for a cool-down period. Failures are
//! counted in a [`LeakingBucket`], a time-windowed counter, so only a burst of
//! failures within the leak window trips the breaker.
//!
//! ## States
//!
//! - **Closed**: calls pass through; each failure is recorded in the bucket and
//!   the circuit opens once the bucket is full.
//! - **Open**: calls fail immediately with a circuit breaker error carrying the
//!   last recorded failure, until `break_duration` has elapsed.
//! - **HalfOpen**: exactly one trial call is let through. Success closes the
//!   circuit and clears the bucket; failure re-opens it regardless of the
//!   bucket's fill state.
//!
//! ## Example
//!
//! ```rust
//! use outbound_resilience_circuitbreaker::{CircuitBreakerConfig, CircuitBreakerProxy, CircuitState};
//! use outbound_resilience_core::{CorrelationId, Operation, ResilienceProxy};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let breaker = CircuitBreakerProxy::new(
//!     CircuitBreakerConfig::builder()
//!         .name("inventory")
//!         .break_duration(Duration::from_secs(10))
//!         .max_failed_calls(5)
//!         .on_state_transition(|from, to| println!("{from} -> {to}"))
//!         .build()?,
//! );
//!
//! let op = Operation::from_transport(|| async { Ok::<_, std::io::Error>("stock") });
//! let value = breaker.execute(op, CorrelationId::new()).await?;
//! assert_eq!(value, "stock");
//! assert_eq!(breaker.state(), CircuitState::Closed);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `metrics`: records call and transition counters using the `metrics` crate
//! - `serde`: enables `Serialize`/`Deserialize` for `CircuitState`

use crate::circuit::{Circuit, Permit};
use futures::future::BoxFuture;
use outbound_resilience_core::{CorrelationId, Operation, ResilienceError, ResilienceProxy};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tokio::time::Instant;

pub use bucket::LeakingBucket;
pub use circuit::CircuitState;
pub use config::{CircuitBreakerConfig, CircuitBreakerConfigBuilder};
pub use events::CircuitBreakerEvent;

mod bucket;
mod circuit;
mod config;
mod events;

/// A proxy that applies circuit breaker logic to the operations it executes.
///
/// One instance is meant to be shared (behind an `Arc`) by every call that
/// targets the same dependency.
pub struct CircuitBreakerProxy {
    circuit: Mutex<Circuit>,
    state_atomic: Arc<AtomicU8>,
    config: CircuitBreakerConfig,
}

impl CircuitBreakerProxy {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        let state_atomic = Arc::new(AtomicU8::new(config.initial_state as u8));
        Self {
            circuit: Mutex::new(Circuit::new(&config, Arc::clone(&state_atomic))),
            state_atomic,
            config,
        }
    }

    /// Returns the current state without taking the lock.
    pub fn state(&self) -> CircuitState {
        CircuitState::from_u8(self.state_atomic.load(Ordering::Acquire))
    }

    /// Returns whether the circuit is currently open.
    pub fn is_open(&self) -> bool {
        self.state() == CircuitState::Open
    }

    /// Number of failures currently inside the leak window.
    pub fn failure_count(&self) -> usize {
        self.circuit.lock().failure_count()
    }

    /// Instant after which an open circuit admits a trial call.
    pub fn open_expiration(&self) -> Instant {
        self.circuit.lock().open_expiration()
    }

    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    /// Forces the circuit into `state` and notifies state transition listeners.
    ///
    /// Forcing `Open` starts a fresh break duration.
    pub fn set_state(&self, state: CircuitState) {
        self.circuit
            .lock()
            .force_state(state, &self.config, CorrelationId::empty());
    }

    /// Clears the failure bucket without changing state.
    pub fn reset_error_count(&self) {
        self.circuit.lock().reset_error_count();
        tracing::debug!(circuitbreaker = %self.config.name, "Circuit breaker error count reset");
    }

    async fn call<T: Send + 'static>(
        &self,
        operation: Operation<T>,
        correlation_id: CorrelationId,
    ) -> Result<T, ResilienceError> {
        let permit = {
            let mut circuit = self.circuit.lock();
            tracing::trace!(
                circuitbreaker = %self.config.name,
                correlation_id = %correlation_id,
                state = %circuit.state(),
                "Calling circuit breaker"
            );
            circuit.try_acquire(&self.config, correlation_id)?
        };

        let mut guard = TrialGuard {
            circuit: &self.circuit,
            armed: permit == Permit::Trial,
        };

        let result = operation.call().await;
        guard.armed = false;

        let mut circuit = self.circuit.lock();
        match result {
            Ok(value) => {
                circuit.record_success(permit, &self.config, correlation_id);
                Ok(value)
            }
            Err(error) => Err(circuit.record_failure(permit, error, &self.config, correlation_id)),
        }
    }
}

impl<T: Send + 'static> ResilienceProxy<T> for CircuitBreakerProxy {
    fn execute(
        &self,
        operation: Operation<T>,
        correlation_id: CorrelationId,
    ) -> BoxFuture<'_, Result<T, ResilienceError>> {
        Box::pin(self.call(operation, correlation_id))
    }
}

// Frees the half-open trial slot if the call future is dropped mid-flight.
struct TrialGuard<'a> {
    circuit: &'a Mutex<Circuit>,
    armed: bool,
}

impl Drop for TrialGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.circuit.lock().abandon_trial();
        }
    }
}
