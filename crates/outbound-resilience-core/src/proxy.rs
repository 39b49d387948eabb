//! The proxy contract.

use crate::correlation::CorrelationId;
use crate::error::ResilienceError;
use crate::operation::Operation;
use futures::future::BoxFuture;
use std::sync::Arc;

/// Executes a deferred operation with added fault-tolerance behavior.
///
/// A proxy propagates the operation's failure unless its own policy says
/// otherwise: a retry proxy absorbs failures until it runs out of attempts,
/// and a circuit breaker substitutes its own error while open.
///
/// The trait is object safe so custom proxies can be registered in a pipeline
/// as `Arc<dyn ResilienceProxy<T>>`.
pub trait ResilienceProxy<T>: Send + Sync {
    fn execute(
        &self,
        operation: Operation<T>,
        correlation_id: CorrelationId,
    ) -> BoxFuture<'_, Result<T, ResilienceError>>;
}

impl<T, P> ResilienceProxy<T> for Arc<P>
where
    P: ResilienceProxy<T> + ?Sized,
{
    fn execute(
        &self,
        operation: Operation<T>,
        correlation_id: CorrelationId,
    ) -> BoxFuture<'_, Result<T, ResilienceError>> {
        (**self).execute(operation, correlation_id)
    }
}

/// Invokes the operation once and returns its outcome unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughProxy;

impl<T: Send + 'static> ResilienceProxy<T> for PassThroughProxy {
    fn execute(
        &self,
        operation: Operation<T>,
        _correlation_id: CorrelationId,
    ) -> BoxFuture<'_, Result<T, ResilienceError>> {
        operation.call()
    }
}

/// Test double that fails every call without invoking the operation.
#[derive(Debug, Clone)]
pub struct ErrorProxy {
    message: String,
}

impl ErrorProxy {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl<T: Send + 'static> ResilienceProxy<T> for ErrorProxy {
    fn execute(
        &self,
        _operation: Operation<T>,
        _correlation_id: CorrelationId,
    ) -> BoxFuture<'_, Result<T, ResilienceError>> {
        let message = self.message.clone();
        Box::pin(async move { Err(ResilienceError::operation(message)) })
    }
}
