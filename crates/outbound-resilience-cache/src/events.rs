use outbound_resilience_core::events::ResilienceEvent;
use tokio::time::Instant;

/// Events emitted by the memory cache.
#[derive(Debug, Clone)]
pub enum CacheEvent {
    /// A live entry was returned without invoking the operation.
    Hit {
        pattern_name: String,
        timestamp: Instant,
        key: String,
    },
    /// The key was absent or expired and the operation was invoked.
    Miss {
        pattern_name: String,
        timestamp: Instant,
        key: String,
    },
    /// An entry was dropped to respect the entry limit.
    Eviction {
        pattern_name: String,
        timestamp: Instant,
        key: String,
    },
    /// A garbage collection pass completed.
    GarbageCollected {
        pattern_name: String,
        timestamp: Instant,
        removed: usize,
    },
    /// The cache was cleared through maintenance.
    Cleared {
        pattern_name: String,
        timestamp: Instant,
    },
}

impl ResilienceEvent for CacheEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CacheEvent::Hit { .. } => "cache_hit",
            CacheEvent::Miss { .. } => "cache_miss",
            CacheEvent::Eviction { .. } => "cache_eviction",
            CacheEvent::GarbageCollected { .. } => "garbage_collected",
            CacheEvent::Cleared { .. } => "cleared",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            CacheEvent::Hit { timestamp, .. }
            | CacheEvent::Miss { timestamp, .. }
            | CacheEvent::Eviction { timestamp, .. }
            | CacheEvent::GarbageCollected { timestamp, .. }
            | CacheEvent::Cleared { timestamp, .. } => *timestamp,
        }
    }

    fn pattern_name(&self) -> &str {
        match self {
            CacheEvent::Hit { pattern_name, .. }
            | CacheEvent::Miss { pattern_name, .. }
            | CacheEvent::Eviction { pattern_name, .. }
            | CacheEvent::GarbageCollected { pattern_name, .. }
            | CacheEvent::Cleared { pattern_name, .. } => pattern_name,
        }
    }
}
