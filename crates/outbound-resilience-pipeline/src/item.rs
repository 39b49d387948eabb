use futures::future::BoxFuture;
use outbound_resilience_core::{CorrelationId, Operation, ResilienceError, ResilienceProxy};
use std::sync::Arc;

/// One link of a pipeline chain.
///
/// Holds a proxy and the item that runs *inside* it. Executing an item runs its
/// proxy with an operation that, when invoked, executes `previous`; the last
/// item of the chain hands the caller's operation straight to its proxy.
///
/// Items are immutable once built and the chain is acyclic: each item only
/// refers to items created before it.
pub struct PipelineItem<T> {
    proxy: Arc<dyn ResilienceProxy<T>>,
    previous: Option<Arc<PipelineItem<T>>>,
}

impl<T: Send + 'static> PipelineItem<T> {
    pub fn new(proxy: Arc<dyn ResilienceProxy<T>>, previous: Option<Arc<PipelineItem<T>>>) -> Self {
        Self { proxy, previous }
    }

    pub fn proxy(&self) -> &Arc<dyn ResilienceProxy<T>> {
        &self.proxy
    }

    pub fn previous(&self) -> Option<&Arc<PipelineItem<T>>> {
        self.previous.as_ref()
    }

    /// Number of items from this one to the end of the chain.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self.previous.as_deref();
        while let Some(item) = current {
            depth += 1;
            current = item.previous.as_deref();
        }
        depth
    }
}

impl<T: Send + 'static> ResilienceProxy<T> for PipelineItem<T> {
    fn execute(
        &self,
        operation: Operation<T>,
        correlation_id: CorrelationId,
    ) -> BoxFuture<'_, Result<T, ResilienceError>> {
        match &self.previous {
            None => self.proxy.execute(operation, correlation_id),
            Some(previous) => {
                let previous = Arc::clone(previous);
                let nested = Operation::new(move || {
                    let previous = Arc::clone(&previous);
                    let operation = operation.clone();
                    async move { previous.execute(operation, correlation_id).await }
                });
                self.proxy.execute(nested, correlation_id)
            }
        }
    }
}
