//! Retry proxy.
//!
//! Re-invokes a failing operation up to a fixed number of attempts. The
//! configured `retries` value counts *total* attempts: `retries(1)` runs the
//! operation exactly once. When every attempt fails the caller receives
//! [`ResilienceError::Retry`] wrapping the last failure.
//!
//! ```rust
//! use outbound_resilience_core::{CorrelationId, Operation, ResilienceProxy};
//! use outbound_resilience_retry::{RetryConfig, RetryProxy};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let retry = RetryProxy::new(RetryConfig::builder().retries(3).build()?);
//! let op = Operation::from_transport(|| async { Ok::<_, std::io::Error>(1) });
//! assert_eq!(retry.execute(op, CorrelationId::new()).await?, 1);
//! # Ok(())
//! # }
//! ```

use futures::future::BoxFuture;
#[cfg(feature = "metrics")]
use metrics::counter;
use outbound_resilience_core::{CorrelationId, Operation, ResilienceError, ResilienceProxy};
use tokio::time::Instant;

pub use config::{RetryConfig, RetryConfigBuilder};
pub use events::RetryEvent;

mod config;
mod events;

/// A proxy that retries failed operations.
pub struct RetryProxy {
    config: RetryConfig,
}

impl RetryProxy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    async fn call<T: Send + 'static>(
        &self,
        operation: Operation<T>,
        correlation_id: CorrelationId,
    ) -> Result<T, ResilienceError> {
        let retries = self.config.retries;
        let name = &self.config.name;
        let mut last_error = None;

        for attempt in 1..=retries {
            tracing::trace!(retry = %name, correlation_id = %correlation_id, attempt, retries, "Starting attempt");

            match operation.call().await {
                Ok(value) => {
                    tracing::trace!(retry = %name, correlation_id = %correlation_id, attempt, retries, "Attempt succeeded");
                    self.config.event_listeners.emit_with(|| RetryEvent::Success {
                        pattern_name: name.clone(),
                        timestamp: Instant::now(),
                        attempts: attempt,
                    });
                    #[cfg(feature = "metrics")]
                    counter!("retry_calls_total", "retry" => name.clone(), "outcome" => "success")
                        .increment(1);
                    return Ok(value);
                }
                Err(error) => {
                    tracing::warn!(retry = %name, correlation_id = %correlation_id, attempt, retries, error = %error, "Attempt failed");
                    last_error = Some(error);

                    if attempt < retries {
                        self.config.event_listeners.emit_with(|| RetryEvent::Retry {
                            pattern_name: name.clone(),
                            timestamp: Instant::now(),
                            attempt,
                        });
                        if !self.config.backoff.is_zero() {
                            tokio::time::sleep(self.config.backoff).await;
                        }
                    }
                }
            }
        }

        let error = ResilienceError::retry(retries, last_error);
        tracing::error!(retry = %name, correlation_id = %correlation_id, error = %error, "Retries exhausted");
        self.config.event_listeners.emit_with(|| RetryEvent::Exhausted {
            pattern_name: name.clone(),
            timestamp: Instant::now(),
            attempts: retries,
        });
        #[cfg(feature = "metrics")]
        counter!("retry_calls_total", "retry" => name.clone(), "outcome" => "exhausted").increment(1);

        Err(error)
    }
}

impl<T: Send + 'static> ResilienceProxy<T> for RetryProxy {
    fn execute(
        &self,
        operation: Operation<T>,
        correlation_id: CorrelationId,
    ) -> BoxFuture<'_, Result<T, ResilienceError>> {
        Box::pin(self.call(operation, correlation_id))
    }
}
