use crate::maintenance::{CacheMaintenance, CircuitBreakerMaintenance, Maintenance};
use outbound_resilience_baseline::BaselineConfig;
use outbound_resilience_cache::{Cache, MemoryCache, MemoryCacheConfig};
use outbound_resilience_circuitbreaker::CircuitBreakerConfig;
use outbound_resilience_core::{ConfigError, CorrelationId, Operation, ResilienceError, ResilienceProxy};
use outbound_resilience_pipeline::{PipelineProxy, ResilientPipelineBuilder};
use outbound_resilience_retry::RetryConfig;
use outbound_resilience_timeout::TimeoutConfig;
use std::sync::Arc;

/// Runs outbound operations through an optional cache and pipeline.
///
/// A call first consults the cache. On a miss the cache invokes the pipeline,
/// which finally invokes the transport. Cache hits therefore bypass every
/// resilience proxy.
pub struct ResilientClient<T> {
    cache: Option<Arc<dyn Cache<T>>>,
    pipeline: Option<Arc<PipelineProxy<T>>>,
    maintenance: Maintenance,
}

impl<T> ResilientClient<T>
where
    T: Send + 'static,
{
    pub fn builder() -> ResilientClientBuilder<T> {
        ResilientClientBuilder::new()
    }

    /// Executes `operation`.
    ///
    /// `key` selects the cache entry; `None` skips the cache for this call.
    pub async fn execute(
        &self,
        key: Option<&str>,
        operation: Operation<T>,
        correlation_id: CorrelationId,
    ) -> Result<T, ResilienceError> {
        let guarded = match &self.pipeline {
            Some(pipeline) => {
                let pipeline = Arc::clone(pipeline);
                Operation::new(move || {
                    let pipeline = Arc::clone(&pipeline);
                    let operation = operation.clone();
                    async move { pipeline.execute(operation, correlation_id).await }
                })
            }
            None => operation,
        };

        match (&self.cache, key) {
            (Some(cache), Some(key)) => cache.execute(guarded, key, correlation_id).await,
            _ => {
                tracing::trace!(correlation_id = %correlation_id, "Bypassing cache");
                guarded.call().await
            }
        }
    }

    pub fn maintenance(&self) -> &Maintenance {
        &self.maintenance
    }

    pub fn pipeline(&self) -> Option<&Arc<PipelineProxy<T>>> {
        self.pipeline.as_ref()
    }

    pub fn has_cache(&self) -> bool {
        self.cache.is_some()
    }
}

/// Builder for [`ResilientClient`].
///
/// Pipeline methods mirror [`ResilientPipelineBuilder`]; a client without any
/// pipeline step calls the transport directly.
pub struct ResilientClientBuilder<T> {
    pipeline: ResilientPipelineBuilder<T>,
    cache: Option<(Arc<dyn Cache<T>>, Arc<dyn Fn() + Send + Sync>)>,
}

impl<T> ResilientClientBuilder<T>
where
    T: Send + 'static,
{
    pub fn new() -> Self {
        Self {
            pipeline: ResilientPipelineBuilder::new(),
            cache: None,
        }
    }

    /// Places a [`MemoryCache`] in front of the pipeline.
    pub fn use_memory_cache(self, config: MemoryCacheConfig) -> Self
    where
        T: Clone + Sync,
    {
        self.use_cache(Arc::new(MemoryCache::new(config)))
    }

    /// Places a custom cache in front of the pipeline. Replaces any cache set
    /// before.
    pub fn use_cache<C>(mut self, cache: Arc<C>) -> Self
    where
        C: Cache<T> + 'static,
    {
        let clear_target = Arc::clone(&cache);
        let clear: Arc<dyn Fn() + Send + Sync> = Arc::new(move || <C as Cache<T>>::clear(&clear_target));
        self.cache = Some((cache, clear));
        self
    }

    pub fn add_proxy<P>(mut self, position: i32, proxy: P) -> Result<Self, ConfigError>
    where
        P: ResilienceProxy<T> + 'static,
    {
        self.pipeline = self.pipeline.add_proxy(position, proxy)?;
        Ok(self)
    }

    pub fn use_circuit_breaker(
        mut self,
        position: i32,
        config: CircuitBreakerConfig,
    ) -> Result<Self, ConfigError> {
        self.pipeline = self.pipeline.use_circuit_breaker(position, config)?;
        Ok(self)
    }

    pub fn use_retry(mut self, position: i32, config: RetryConfig) -> Result<Self, ConfigError> {
        self.pipeline = self.pipeline.use_retry(position, config)?;
        Ok(self)
    }

    pub fn use_timeout(mut self, position: i32, config: TimeoutConfig) -> Result<Self, ConfigError> {
        self.pipeline = self.pipeline.use_timeout(position, config)?;
        Ok(self)
    }

    pub fn use_baseline(mut self, config: BaselineConfig) -> Self {
        self.pipeline = self.pipeline.use_baseline(config);
        self
    }

    pub fn build(self) -> Result<ResilientClient<T>, ConfigError> {
        let pipeline = if self.pipeline.is_empty() {
            None
        } else {
            Some(Arc::new(self.pipeline.build()?))
        };

        let breakers = pipeline
            .as_ref()
            .map(|pipeline| pipeline.circuit_breakers().to_vec())
            .unwrap_or_default();

        let (cache, clear) = match self.cache {
            Some((cache, clear)) => (Some(cache), Some(clear)),
            None => (None, None),
        };

        tracing::debug!(
            cache = cache.is_some(),
            pipeline = pipeline.as_ref().map_or(0, |p| p.len()),
            "Building resilient client"
        );

        Ok(ResilientClient {
            cache,
            pipeline,
            maintenance: Maintenance::new(
                CircuitBreakerMaintenance::new(breakers),
                CacheMaintenance::new(clear),
            ),
        })
    }
}

impl<T> Default for ResilientClientBuilder<T>
where
    T: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
