//! Tower integration.
//!
//! [`PipelineLayer`] runs every request to a `tower::Service` through a built
//! pipeline. Each pipeline attempt drives its own clone of the inner service,
//! which is why the request must be `Clone`.

use crate::proxy::PipelineProxy;
use futures::future::BoxFuture;
use outbound_resilience_core::{BoxError, CorrelationId, Operation, ResilienceError, ResilienceProxy};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service, ServiceExt};

/// A Tower layer that wraps services in a resilience pipeline.
pub struct PipelineLayer<T> {
    pipeline: Arc<PipelineProxy<T>>,
}

impl<T> PipelineLayer<T> {
    pub fn new(pipeline: impl Into<Arc<PipelineProxy<T>>>) -> Self {
        Self {
            pipeline: pipeline.into(),
        }
    }
}

impl<T> Clone for PipelineLayer<T> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
        }
    }
}

impl<S, T> Layer<S> for PipelineLayer<T> {
    type Service = PipelineService<S, T>;

    fn layer(&self, inner: S) -> Self::Service {
        PipelineService {
            inner,
            pipeline: Arc::clone(&self.pipeline),
        }
    }
}

/// A service whose calls run through a resilience pipeline.
pub struct PipelineService<S, T> {
    inner: S,
    pipeline: Arc<PipelineProxy<T>>,
}

impl<S: Clone, T> Clone for PipelineService<S, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            pipeline: Arc::clone(&self.pipeline),
        }
    }
}

impl<S, Req, T> Service<Req> for PipelineService<S, T>
where
    S: Service<Req, Response = T> + Clone + Send + Sync + 'static,
    S::Error: Into<BoxError>,
    S::Future: Send,
    Req: Clone + Send + Sync + 'static,
    T: Send + 'static,
{
    type Response = T;
    type Error = ResilienceError;
    type Future = BoxFuture<'static, Result<T, ResilienceError>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        // Readiness is awaited per attempt on the clone that serves it.
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Req) -> Self::Future {
        let inner = self.inner.clone();
        let operation = Operation::new(move || {
            let svc = inner.clone();
            let req = req.clone();
            async move {
                let response = svc.oneshot(req).await.map_err(ResilienceError::operation)?;
                Ok(response)
            }
        });

        let pipeline = Arc::clone(&self.pipeline);
        Box::pin(async move { pipeline.execute(operation, CorrelationId::new()).await })
    }
}
