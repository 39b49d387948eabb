use crate::proxy::PipelineProxy;
use outbound_resilience_baseline::{BaselineConfig, BaselineProxy};
use outbound_resilience_circuitbreaker::{CircuitBreakerConfig, CircuitBreakerProxy};
use outbound_resilience_core::{ConfigError, ResilienceProxy};
use outbound_resilience_retry::{RetryConfig, RetryProxy};
use outbound_resilience_timeout::{TimeoutConfig, TimeoutProxy};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Assembles proxies into a [`PipelineProxy`] by numeric position.
///
/// Lower positions run first and wrap higher ones, so a retry at position 1
/// around a timeout at position 2 retries each timed-out attempt. A position
/// can only be taken once.
///
/// ```rust
/// use outbound_resilience_pipeline::ResilientPipelineBuilder;
/// use outbound_resilience_retry::RetryConfig;
/// use outbound_resilience_timeout::TimeoutConfig;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), outbound_resilience_core::ConfigError> {
/// let pipeline = ResilientPipelineBuilder::<String>::new()
///     .use_retry(1, RetryConfig::builder().retries(2).build()?)?
///     .use_timeout(2, TimeoutConfig::builder().timeout(Duration::from_millis(100)).build()?)?
///     .build()?;
/// assert_eq!(pipeline.len(), 2);
/// # Ok(())
/// # }
/// ```
pub struct ResilientPipelineBuilder<T> {
    proxies: BTreeMap<i32, Arc<dyn ResilienceProxy<T>>>,
    circuit_breakers: BTreeMap<i32, Arc<CircuitBreakerProxy>>,
    baseline: Option<Arc<BaselineProxy>>,
}

impl<T: Send + 'static> ResilientPipelineBuilder<T> {
    pub fn new() -> Self {
        Self {
            proxies: BTreeMap::new(),
            circuit_breakers: BTreeMap::new(),
            baseline: None,
        }
    }

    /// Registers a custom proxy at `position`.
    pub fn add_proxy<P>(self, position: i32, proxy: P) -> Result<Self, ConfigError>
    where
        P: ResilienceProxy<T> + 'static,
    {
        self.insert(position, Arc::new(proxy))
    }

    /// Registers a circuit breaker at `position`.
    pub fn use_circuit_breaker(
        mut self,
        position: i32,
        config: CircuitBreakerConfig,
    ) -> Result<Self, ConfigError> {
        self.ensure_free(position)?;
        let breaker = Arc::new(CircuitBreakerProxy::new(config));
        self.circuit_breakers.insert(position, Arc::clone(&breaker));
        self.insert(position, breaker)
    }

    /// Registers a retry proxy at `position`.
    pub fn use_retry(self, position: i32, config: RetryConfig) -> Result<Self, ConfigError> {
        self.insert(position, Arc::new(RetryProxy::new(config)))
    }

    /// Registers a timeout proxy at `position`.
    pub fn use_timeout(self, position: i32, config: TimeoutConfig) -> Result<Self, ConfigError> {
        self.insert(position, Arc::new(TimeoutProxy::new(config)))
    }

    /// Wraps the whole pipeline in a baseline proxy.
    ///
    /// The baseline takes no position: it is always outermost so that it
    /// measures the full latency the caller observes. Calling this again
    /// replaces the previous baseline.
    pub fn use_baseline(mut self, config: BaselineConfig) -> Self {
        self.baseline = Some(Arc::new(BaselineProxy::new(config)));
        self
    }

    /// Returns true if `position` is already taken.
    pub fn is_position_in_use(&self, position: i32) -> bool {
        self.proxies.contains_key(&position)
    }

    /// Returns true if nothing has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty() && self.baseline.is_none()
    }

    /// Links the registered proxies in ascending position order.
    pub fn build(self) -> Result<PipelineProxy<T>, ConfigError> {
        let mut ordered: Vec<Arc<dyn ResilienceProxy<T>>> = Vec::with_capacity(self.proxies.len() + 1);
        if let Some(baseline) = self.baseline {
            ordered.push(baseline);
        }
        ordered.extend(self.proxies.into_values());

        tracing::debug!(proxies = ordered.len(), "Building resilient pipeline");

        let breakers = self.circuit_breakers.into_values().collect();
        Ok(PipelineProxy::new(ordered)?.with_circuit_breakers(breakers))
    }

    fn ensure_free(&self, position: i32) -> Result<(), ConfigError> {
        if self.is_position_in_use(position) {
            return Err(ConfigError::PositionInUse { position });
        }
        Ok(())
    }

    fn insert(
        mut self,
        position: i32,
        proxy: Arc<dyn ResilienceProxy<T>>,
    ) -> Result<Self, ConfigError> {
        self.ensure_free(position)?;
        self.proxies.insert(position, proxy);
        Ok(self)
    }
}

impl<T: Send + 'static> Default for ResilientPipelineBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
