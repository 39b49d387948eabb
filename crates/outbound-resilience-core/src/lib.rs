//! Core infrastructure for outbound-resilience.
//!
//! This crate provides the pieces every resilience proxy shares:
//! - The [`ResilienceProxy`] contract and the deferred [`Operation`] it wraps
//! - [`CorrelationId`] threaded through every log record of a call
//! - The [`ResilienceError`] taxonomy and [`ConfigError`] parameter guards
//! - Event system for observability
//!
//! # Example
//!
//! ```rust
//! use outbound_resilience_core::{CorrelationId, Operation, PassThroughProxy, ResilienceProxy};
//!
//! # async fn example() {
//! let operation = Operation::from_transport(|| async { Ok::<_, std::io::Error>(42) });
//! let result = PassThroughProxy
//!     .execute(operation, CorrelationId::new())
//!     .await;
//! assert_eq!(result.unwrap(), 42);
//! # }
//! ```

pub mod config;
pub mod correlation;
pub mod error;
pub mod events;
pub mod operation;
pub mod proxy;

pub use config::{ensure_non_zero, ensure_positive, ConfigError};
pub use correlation::CorrelationId;
pub use error::{BoxError, ResilienceError};
pub use events::{EventListener, EventListeners, FnListener, ResilienceEvent};
pub use operation::Operation;
pub use proxy::{ErrorProxy, PassThroughProxy, ResilienceProxy};
