use crate::item::PipelineItem;
use futures::future::BoxFuture;
use outbound_resilience_circuitbreaker::CircuitBreakerProxy;
use outbound_resilience_core::{
    ConfigError, CorrelationId, Operation, ResilienceError, ResilienceProxy,
};
use std::sync::Arc;

/// A chain of proxies executed as one.
///
/// The first proxy of the list passed to [`PipelineProxy::new`] is the
/// outermost: it receives the call first and wraps every later proxy. The last
/// proxy is the one that finally invokes the caller's operation.
pub struct PipelineProxy<T> {
    head: Arc<PipelineItem<T>>,
    len: usize,
    circuit_breakers: Vec<Arc<CircuitBreakerProxy>>,
}

impl<T: Send + 'static> PipelineProxy<T> {
    /// Links `proxies` into a chain, outermost first.
    pub fn new(proxies: Vec<Arc<dyn ResilienceProxy<T>>>) -> Result<Self, ConfigError> {
        let len = proxies.len();
        let mut head: Option<Arc<PipelineItem<T>>> = None;
        for proxy in proxies.into_iter().rev() {
            head = Some(Arc::new(PipelineItem::new(proxy, head)));
        }

        let head = head.ok_or(ConfigError::argument_null("proxies"))?;
        Ok(Self {
            head,
            len,
            circuit_breakers: Vec::new(),
        })
    }

    pub(crate) fn with_circuit_breakers(mut self, breakers: Vec<Arc<CircuitBreakerProxy>>) -> Self {
        self.circuit_breakers = breakers;
        self
    }

    /// Number of proxies in the chain.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The outermost item.
    pub fn head(&self) -> &Arc<PipelineItem<T>> {
        &self.head
    }

    /// Circuit breakers registered through the pipeline builder, in position order.
    pub fn circuit_breakers(&self) -> &[Arc<CircuitBreakerProxy>] {
        &self.circuit_breakers
    }
}

impl<T: Send + 'static> ResilienceProxy<T> for PipelineProxy<T> {
    fn execute(
        &self,
        operation: Operation<T>,
        correlation_id: CorrelationId,
    ) -> BoxFuture<'_, Result<T, ResilienceError>> {
        tracing::trace!(correlation_id = %correlation_id, proxies = self.len, "Executing pipeline");
        self.head.execute(operation, correlation_id)
    }
}
