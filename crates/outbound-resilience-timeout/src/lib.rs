//! Timeout proxy.
//!
//! Races the operation against a deadline. Whichever settles first wins:
//!
//! - the operation succeeds first: its value is returned
//! - the operation fails first: the failure is wrapped in a timeout error
//! - the deadline fires first: a timeout error without cause is returned
//!
//! Every failure surfaced by this proxy is a [`ResilienceError::Timeout`].
//!
//! By default the timeout is best-effort: the operation runs as its own task
//! and is left to finish in the background once the deadline fires. Set
//! [`TimeoutConfigBuilder::cancel_running_future`] to drop it instead.

use futures::future::BoxFuture;
#[cfg(feature = "metrics")]
use metrics::counter;
use outbound_resilience_core::{CorrelationId, Operation, ResilienceError, ResilienceProxy};
use tokio::time::error::Elapsed;
use tokio::time::Instant;

pub use config::{TimeoutConfig, TimeoutConfigBuilder};
pub use events::TimeoutEvent;

mod config;
mod events;

/// A proxy that enforces a deadline on the operations it executes.
pub struct TimeoutProxy {
    config: TimeoutConfig,
}

impl TimeoutProxy {
    pub fn new(config: TimeoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TimeoutConfig {
        &self.config
    }

    async fn race<T: Send + 'static>(
        &self,
        operation: Operation<T>,
    ) -> Result<Result<T, ResilienceError>, Elapsed> {
        let deadline = self.config.timeout;
        if self.config.cancel_running_future {
            return tokio::time::timeout(deadline, operation.call()).await;
        }

        // Dropping the handle on timeout detaches the task; it keeps running.
        let handle = tokio::spawn(operation.call());
        match tokio::time::timeout(deadline, handle).await? {
            Ok(result) => Ok(result),
            Err(join_error) if join_error.is_panic() => {
                std::panic::resume_unwind(join_error.into_panic())
            }
            Err(join_error) => Ok(Err(ResilienceError::operation(join_error))),
        }
    }

    async fn call<T: Send + 'static>(
        &self,
        operation: Operation<T>,
        correlation_id: CorrelationId,
    ) -> Result<T, ResilienceError> {
        let name = &self.config.name;
        let start = Instant::now();
        tracing::trace!(timeout = %name, correlation_id = %correlation_id, "Starting timeout");

        match self.race(operation).await {
            Ok(Ok(value)) => {
                let duration = start.elapsed();
                tracing::trace!(timeout = %name, correlation_id = %correlation_id, ?duration, "Timeout successful");
                self.config.event_listeners.emit_with(|| TimeoutEvent::Success {
                    pattern_name: name.clone(),
                    timestamp: Instant::now(),
                    duration,
                });
                #[cfg(feature = "metrics")]
                counter!("timeout_calls_total", "timeout" => name.clone(), "outcome" => "success")
                    .increment(1);
                Ok(value)
            }
            Ok(Err(error)) => {
                let duration = start.elapsed();
                tracing::error!(timeout = %name, correlation_id = %correlation_id, ?duration, error = %error, "Timeout failed");
                self.config.event_listeners.emit_with(|| TimeoutEvent::Error {
                    pattern_name: name.clone(),
                    timestamp: Instant::now(),
                    duration,
                });
                #[cfg(feature = "metrics")]
                counter!("timeout_calls_total", "timeout" => name.clone(), "outcome" => "error")
                    .increment(1);
                Err(ResilienceError::timeout("Timeout failed", Some(error)))
            }
            Err(_) => {
                let error = ResilienceError::timeout(
                    format!("Timeout occurred after {}ms", self.config.timeout.as_millis()),
                    None,
                );
                tracing::error!(timeout = %name, correlation_id = %correlation_id, error = %error, "Deadline elapsed");
                self.config.event_listeners.emit_with(|| TimeoutEvent::Timeout {
                    pattern_name: name.clone(),
                    timestamp: Instant::now(),
                    timeout: self.config.timeout,
                });
                #[cfg(feature = "metrics")]
                counter!("timeout_calls_total", "timeout" => name.clone(), "outcome" => "timeout")
                    .increment(1);
                Err(error)
            }
        }
    }
}

impl<T: Send + 'static> ResilienceProxy<T> for TimeoutProxy {
    fn execute(
        &self,
        operation: Operation<T>,
        correlation_id: CorrelationId,
    ) -> BoxFuture<'_, Result<T, ResilienceError>> {
        Box::pin(self.call(operation, correlation_id))
    }
}
