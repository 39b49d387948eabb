//! Resilience proxies for outbound calls.
//!
//! This crate bundles the individual pattern crates and adds
//! [`ResilientClient`], which places an optional cache in front of an
//! optional pipeline of proxies, plus the [`Maintenance`] handle operators use
//! to force breaker states or clear the cache.
//!
//! ```text
//! caller -> cache -> baseline -> proxy @ position 1 -> proxy @ position 2 -> transport
//! ```
//!
//! # Example
//!
//! ```rust
//! use outbound_resilience::cache::MemoryCacheConfig;
//! use outbound_resilience::circuitbreaker::CircuitBreakerConfig;
//! use outbound_resilience::retry::RetryConfig;
//! use outbound_resilience::timeout::TimeoutConfig;
//! use outbound_resilience::{CorrelationId, Operation, ResilientClient};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ResilientClient::<String>::builder()
//!     .use_memory_cache(MemoryCacheConfig::builder().expiration(Duration::from_secs(30)).build()?)
//!     .use_retry(1, RetryConfig::builder().retries(3).build()?)?
//!     .use_circuit_breaker(2, CircuitBreakerConfig::builder().max_failed_calls(5).build()?)?
//!     .use_timeout(3, TimeoutConfig::builder().timeout(Duration::from_secs(2)).build()?)?
//!     .build()?;
//!
//! let fetch = Operation::from_transport(|| async { Ok::<_, std::io::Error>("payload".to_string()) });
//! let body = client.execute(Some("/users/42"), fetch, CorrelationId::new()).await?;
//! assert_eq!(body, "payload");
//!
//! client.maintenance().circuit_breaker().reset_error_count();
//! # Ok(())
//! # }
//! ```

pub use outbound_resilience_baseline as baseline;
pub use outbound_resilience_cache as cache;
pub use outbound_resilience_circuitbreaker as circuitbreaker;
pub use outbound_resilience_core as core;
pub use outbound_resilience_pipeline as pipeline;
pub use outbound_resilience_retry as retry;
pub use outbound_resilience_timeout as timeout;

pub use client::{ResilientClient, ResilientClientBuilder};
pub use maintenance::{CacheMaintenance, CircuitBreakerMaintenance, Maintenance};
pub use outbound_resilience_core::{
    CorrelationId, Operation, ResilienceError, ResilienceProxy,
};

mod client;
mod maintenance;
