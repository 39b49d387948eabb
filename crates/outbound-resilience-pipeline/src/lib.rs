//! Pipeline composition for resilience proxies.
//!
//! A pipeline nests several proxies around one operation. The
//! [`ResilientPipelineBuilder`] assigns every proxy an integer position; the
//! lowest position is the outermost proxy and the highest one finally invokes
//! the operation:
//!
//! ```text
//! baseline -> position 1 -> position 2 -> ... -> operation
//! ```
//!
//! Internally the pipeline is a chain of [`PipelineItem`]s built once and never
//! mutated. Each item executes its proxy with an operation that calls the next
//! item, so no proxy needs to know about the others.
//!
//! # Example
//!
//! ```rust
//! use outbound_resilience_circuitbreaker::CircuitBreakerConfig;
//! use outbound_resilience_core::{CorrelationId, Operation, ResilienceProxy};
//! use outbound_resilience_pipeline::ResilientPipelineBuilder;
//! use outbound_resilience_retry::RetryConfig;
//! use outbound_resilience_timeout::TimeoutConfig;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = ResilientPipelineBuilder::new()
//!     .use_timeout(1, TimeoutConfig::builder().timeout(Duration::from_secs(2)).build()?)?
//!     .use_retry(2, RetryConfig::builder().retries(3).build()?)?
//!     .use_circuit_breaker(3, CircuitBreakerConfig::builder().max_failed_calls(5).build()?)?
//!     .build()?;
//!
//! let op = Operation::from_transport(|| async { Ok::<_, std::io::Error>("pong") });
//! assert_eq!(pipeline.execute(op, CorrelationId::new()).await?, "pong");
//! # Ok(())
//! # }
//! ```

pub use builder::ResilientPipelineBuilder;
pub use item::PipelineItem;
pub use proxy::PipelineProxy;
pub use service::{PipelineLayer, PipelineService};

mod builder;
mod item;
mod proxy;
pub mod service;
