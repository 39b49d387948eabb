use futures::future::BoxFuture;
use outbound_resilience_core::{CorrelationId, Operation, ResilienceError};
use std::sync::Arc;

/// A string-keyed cache placed in front of an operation.
///
/// On a hit the stored value is returned and `operation` is never invoked. On
/// a miss the cache runs `operation` and decides whether to keep its result.
pub trait Cache<V>: Send + Sync {
    fn execute<'a>(
        &'a self,
        operation: Operation<V>,
        key: &'a str,
        correlation_id: CorrelationId,
    ) -> BoxFuture<'a, Result<V, ResilienceError>>;

    /// Drops every stored value.
    fn clear(&self);
}

impl<V, C> Cache<V> for Arc<C>
where
    C: Cache<V> + ?Sized,
{
    fn execute<'a>(
        &'a self,
        operation: Operation<V>,
        key: &'a str,
        correlation_id: CorrelationId,
    ) -> BoxFuture<'a, Result<V, ResilienceError>> {
        (**self).execute(operation, key, correlation_id)
    }

    fn clear(&self) {
        (**self).clear()
    }
}
