use outbound_resilience_core::events::ResilienceEvent;
use std::time::Duration;
use tokio::time::Instant;

/// Events emitted by the baseline proxy.
#[derive(Debug, Clone)]
pub enum BaselineEvent {
    /// Sampling ended and the alarm level was computed.
    SamplingFinished {
        pattern_name: String,
        timestamp: Instant,
        alarm_level_ms: u64,
        samples: usize,
    },
    /// A call took at least as long as the alarm level.
    AlarmExceeded {
        pattern_name: String,
        timestamp: Instant,
        duration: Duration,
        alarm_level_ms: u64,
    },
}

impl ResilienceEvent for BaselineEvent {
    fn event_type(&self) -> &'static str {
        match self {
            BaselineEvent::SamplingFinished { .. } => "sampling_finished",
            BaselineEvent::AlarmExceeded { .. } => "alarm_exceeded",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            BaselineEvent::SamplingFinished { timestamp, .. }
            | BaselineEvent::AlarmExceeded { timestamp, .. } => *timestamp,
        }
    }

    fn pattern_name(&self) -> &str {
        match self {
            BaselineEvent::SamplingFinished { pattern_name, .. }
            | BaselineEvent::AlarmExceeded { pattern_name, .. } => pattern_name,
        }
    }
}
