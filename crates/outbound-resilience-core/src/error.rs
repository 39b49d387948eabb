//! Error taxonomy shared by every proxy.
//!
//! Each proxy surfaces terminal failures wrapped in its own variant so callers
//! can tell where a failure originated. The wrapped cause is reachable through
//! [`ResilienceError::cause`] and through [`std::error::Error::source`].

use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;

/// Boxed error accepted from transports.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors produced by proxies, caches and pipelines.
#[derive(Debug, Clone, Error)]
pub enum ResilienceError {
    /// The circuit is open, or the guarded operation failed inside the breaker.
    #[error("{message}")]
    CircuitBreaker {
        message: String,
        #[source]
        cause: Option<Box<ResilienceError>>,
    },

    /// All attempts were exhausted.
    #[error("Retries exceeded after {attempts} times")]
    Retry {
        attempts: usize,
        #[source]
        cause: Option<Box<ResilienceError>>,
    },

    /// The deadline elapsed, or the operation failed before it.
    #[error("{message}")]
    Timeout {
        message: String,
        #[source]
        cause: Option<Box<ResilienceError>>,
    },

    /// Missing cache key, or the operation failed on a cache miss.
    #[error("{message}")]
    Cache {
        message: String,
        #[source]
        cause: Option<Box<ResilienceError>>,
    },

    /// Failure reported by the wrapped transport.
    #[error("operation failed: {0}")]
    Operation(#[source] Arc<dyn StdError + Send + Sync + 'static>),
}

impl ResilienceError {
    /// Wraps a transport failure.
    pub fn operation<E>(error: E) -> Self
    where
        E: Into<BoxError>,
    {
        ResilienceError::Operation(Arc::from(error.into()))
    }

    pub fn circuit_breaker(message: impl Into<String>, cause: Option<ResilienceError>) -> Self {
        ResilienceError::CircuitBreaker {
            message: message.into(),
            cause: cause.map(Box::new),
        }
    }

    pub fn retry(attempts: usize, cause: Option<ResilienceError>) -> Self {
        ResilienceError::Retry {
            attempts,
            cause: cause.map(Box::new),
        }
    }

    pub fn timeout(message: impl Into<String>, cause: Option<ResilienceError>) -> Self {
        ResilienceError::Timeout {
            message: message.into(),
            cause: cause.map(Box::new),
        }
    }

    pub fn cache(message: impl Into<String>, cause: Option<ResilienceError>) -> Self {
        ResilienceError::Cache {
            message: message.into(),
            cause: cause.map(Box::new),
        }
    }

    /// Returns true if the error came from a circuit breaker.
    pub fn is_circuit_breaker(&self) -> bool {
        matches!(self, ResilienceError::CircuitBreaker { .. })
    }

    /// Returns true if the error came from a retry proxy.
    pub fn is_retry(&self) -> bool {
        matches!(self, ResilienceError::Retry { .. })
    }

    /// Returns true if the error came from a timeout proxy.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ResilienceError::Timeout { .. })
    }

    /// Returns true if the error came from a cache.
    pub fn is_cache(&self) -> bool {
        matches!(self, ResilienceError::Cache { .. })
    }

    /// Returns true if this is an unwrapped transport failure.
    pub fn is_operation(&self) -> bool {
        matches!(self, ResilienceError::Operation(_))
    }

    /// Returns the directly wrapped error, if any.
    pub fn cause(&self) -> Option<&ResilienceError> {
        match self {
            ResilienceError::CircuitBreaker { cause, .. }
            | ResilienceError::Retry { cause, .. }
            | ResilienceError::Timeout { cause, .. }
            | ResilienceError::Cache { cause, .. } => cause.as_deref(),
            ResilienceError::Operation(_) => None,
        }
    }

    /// Follows the cause chain to its innermost error.
    pub fn root_cause(&self) -> &ResilienceError {
        let mut current = self;
        while let Some(inner) = current.cause() {
            current = inner;
        }
        current
    }

    /// Downcasts the transport failure at the root of the chain.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: StdError + 'static,
    {
        match self.root_cause() {
            ResilienceError::Operation(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }
}
