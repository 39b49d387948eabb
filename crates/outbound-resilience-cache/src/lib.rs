//! In-memory response caching.
//!
//! [`MemoryCache`] sits in front of an operation and serves stored values by
//! string key. Each entry expires a fixed time after it was inserted; a read
//! at or after that instant invokes the operation again. Expired entries are
//! swept periodically, and a bounded [`MemoryQueue`] of keys decides which
//! entry to evict once `max_entry_count` is reached.
//!
//! ```rust
//! use outbound_resilience_cache::{Cache, MemoryCache, MemoryCacheConfig};
//! use outbound_resilience_core::{CorrelationId, Operation};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let cache = MemoryCache::new(
//!     MemoryCacheConfig::builder()
//!         .expiration(Duration::from_secs(30))
//!         .max_entry_count(500)
//!         .build()?,
//! );
//!
//! let op = Operation::from_transport(|| async { Ok::<_, std::io::Error>("fresh".to_string()) });
//! let value = cache.execute(op, "users/42", CorrelationId::new()).await?;
//! assert_eq!(value, "fresh");
//! # Ok(())
//! # }
//! ```

pub use config::{MemoryCacheConfig, MemoryCacheConfigBuilder};
pub use contract::Cache;
pub use entry::CacheEntry;
pub use events::CacheEvent;
pub use memory::MemoryCache;
pub use queue::{MemoryQueue, QueuePushResult};

mod config;
mod contract;
mod entry;
mod events;
mod memory;
mod queue;
