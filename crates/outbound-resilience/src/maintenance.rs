//! Administrative side channel for operators.
//!
//! These hooks are not part of the call path. They force circuit breakers
//! into a state, forget recorded failures, or drop every cached value.

use outbound_resilience_circuitbreaker::{CircuitBreakerProxy, CircuitState};
use std::fmt;
use std::sync::Arc;

type ClearFn = Arc<dyn Fn() + Send + Sync>;

/// Maintenance handle of a [`ResilientClient`](crate::ResilientClient).
#[derive(Clone, Default)]
pub struct Maintenance {
    circuit_breaker: CircuitBreakerMaintenance,
    cache: CacheMaintenance,
}

impl Maintenance {
    pub(crate) fn new(circuit_breaker: CircuitBreakerMaintenance, cache: CacheMaintenance) -> Self {
        Self {
            circuit_breaker,
            cache,
        }
    }

    pub fn circuit_breaker(&self) -> &CircuitBreakerMaintenance {
        &self.circuit_breaker
    }

    pub fn cache(&self) -> &CacheMaintenance {
        &self.cache
    }
}

impl fmt::Debug for Maintenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Maintenance")
            .field("circuit_breakers", &self.circuit_breaker.len())
            .field("cache", &self.cache.is_attached())
            .finish()
    }
}

/// Applies operations to every circuit breaker registered in a pipeline.
#[derive(Clone, Default)]
pub struct CircuitBreakerMaintenance {
    breakers: Vec<Arc<CircuitBreakerProxy>>,
}

impl CircuitBreakerMaintenance {
    pub fn new(breakers: Vec<Arc<CircuitBreakerProxy>>) -> Self {
        Self { breakers }
    }

    /// Forces every breaker into `state`.
    pub fn set_state(&self, state: CircuitState) {
        tracing::warn!(breakers = self.breakers.len(), state = %state, "Maintenance: forcing circuit breaker state");
        for breaker in &self.breakers {
            breaker.set_state(state);
        }
    }

    /// Opens every breaker for a fresh break duration.
    pub fn open(&self) {
        self.set_state(CircuitState::Open);
    }

    pub fn close(&self) {
        self.set_state(CircuitState::Closed);
    }

    /// Forgets every recorded failure without changing any state.
    pub fn reset_error_count(&self) {
        tracing::warn!(breakers = self.breakers.len(), "Maintenance: resetting circuit breaker error counts");
        for breaker in &self.breakers {
            breaker.reset_error_count();
        }
    }

    /// Current state of each breaker, in pipeline position order.
    pub fn states(&self) -> Vec<CircuitState> {
        self.breakers.iter().map(|breaker| breaker.state()).collect()
    }

    pub fn breakers(&self) -> &[Arc<CircuitBreakerProxy>] {
        &self.breakers
    }

    pub fn len(&self) -> usize {
        self.breakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breakers.is_empty()
    }
}

/// Clears the client's cache, if it has one.
#[derive(Clone, Default)]
pub struct CacheMaintenance {
    clear: Option<ClearFn>,
}

impl CacheMaintenance {
    pub(crate) fn new(clear: Option<ClearFn>) -> Self {
        Self { clear }
    }

    /// Drops every cached value. Does nothing without a cache.
    pub fn clear(&self) {
        match &self.clear {
            Some(clear) => clear(),
            None => tracing::debug!("Maintenance: no cache to clear"),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.clear.is_some()
    }
}
