use outbound_resilience_core::events::ResilienceEvent;
use std::time::Duration;
use tokio::time::Instant;

/// Events emitted by the timeout proxy.
#[derive(Debug, Clone)]
pub enum TimeoutEvent {
    /// The operation succeeded before the deadline.
    Success {
        pattern_name: String,
        timestamp: Instant,
        duration: Duration,
    },
    /// The operation failed before the deadline.
    Error {
        pattern_name: String,
        timestamp: Instant,
        duration: Duration,
    },
    /// The deadline fired first.
    Timeout {
        pattern_name: String,
        timestamp: Instant,
        timeout: Duration,
    },
}

impl ResilienceEvent for TimeoutEvent {
    fn event_type(&self) -> &'static str {
        match self {
            TimeoutEvent::Success { .. } => "success",
            TimeoutEvent::Error { .. } => "error",
            TimeoutEvent::Timeout { .. } => "timeout",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            TimeoutEvent::Success { timestamp, .. }
            | TimeoutEvent::Error { timestamp, .. }
            | TimeoutEvent::Timeout { timestamp, .. } => *timestamp,
        }
    }

    fn pattern_name(&self) -> &str {
        match self {
            TimeoutEvent::Success { pattern_name, .. }
            | TimeoutEvent::Error { pattern_name, .. }
            | TimeoutEvent::Timeout { pattern_name, .. } => pattern_name,
        }
    }
}
