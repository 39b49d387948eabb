use crate::events::BaselineEvent;
use outbound_resilience_core::{ensure_non_zero, ensure_positive, ConfigError, EventListeners};
use std::time::Duration;

const TEN_MINUTES: Duration = Duration::from_secs(10 * 60);

/// Configuration for the baseline proxy.
pub struct BaselineConfig {
    pub(crate) start_sampling_after: Duration,
    pub(crate) max_sample_duration: Duration,
    pub(crate) max_samples_count: usize,
    pub(crate) event_listeners: EventListeners<BaselineEvent>,
    pub(crate) name: String,
}

impl BaselineConfig {
    pub fn builder() -> BaselineConfigBuilder {
        BaselineConfigBuilder::new()
    }

    pub fn start_sampling_after(&self) -> Duration {
        self.start_sampling_after
    }

    pub fn max_sample_duration(&self) -> Duration {
        self.max_sample_duration
    }

    pub fn max_samples_count(&self) -> usize {
        self.max_samples_count
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Builder for [`BaselineConfig`].
pub struct BaselineConfigBuilder {
    start_sampling_after: Duration,
    max_sample_duration: Duration,
    max_samples_count: usize,
    event_listeners: EventListeners<BaselineEvent>,
    name: String,
}

impl BaselineConfigBuilder {
    pub fn new() -> Self {
        Self {
            start_sampling_after: TEN_MINUTES,
            max_sample_duration: TEN_MINUTES,
            max_samples_count: 100,
            event_listeners: EventListeners::new(),
            name: String::from("<unnamed>"),
        }
    }

    /// Warm-up period after construction during which durations are ignored.
    ///
    /// Default: 10 minutes
    pub fn start_sampling_after(mut self, delay: Duration) -> Self {
        self.start_sampling_after = delay;
        self
    }

    /// Length of the sampling window that follows the warm-up.
    ///
    /// Default: 10 minutes
    pub fn max_sample_duration(mut self, duration: Duration) -> Self {
        self.max_sample_duration = duration;
        self
    }

    /// Sampling also ends once this many durations have been collected.
    ///
    /// Default: 100
    pub fn max_samples_count(mut self, count: usize) -> Self {
        self.max_samples_count = count;
        self
    }

    /// Default: `<unnamed>`
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Registers a callback invoked with the alarm level (ms) and the number of
    /// samples once sampling has finished.
    pub fn on_sampling_finished<F>(mut self, f: F) -> Self
    where
        F: Fn(u64, usize) + Send + Sync + 'static,
    {
        self.event_listeners.on(move |event| {
            if let BaselineEvent::SamplingFinished {
                alarm_level_ms,
                samples,
                ..
            } = event
            {
                f(*alarm_level_ms, *samples);
            }
        });
        self
    }

    /// Registers a callback invoked with the call duration whenever it reaches
    /// the alarm level.
    pub fn on_alarm<F>(mut self, f: F) -> Self
    where
        F: Fn(Duration) + Send + Sync + 'static,
    {
        self.event_listeners.on(move |event| {
            if let BaselineEvent::AlarmExceeded { duration, .. } = event {
                f(*duration);
            }
        });
        self
    }

    pub fn build(self) -> Result<BaselineConfig, ConfigError> {
        ensure_non_zero("start_sampling_after", self.start_sampling_after)?;
        ensure_non_zero("max_sample_duration", self.max_sample_duration)?;
        ensure_positive("max_samples_count", self.max_samples_count)?;

        Ok(BaselineConfig {
            start_sampling_after: self.start_sampling_after,
            max_sample_duration: self.max_sample_duration,
            max_samples_count: self.max_samples_count,
            event_listeners: self.event_listeners,
            name: self.name,
        })
    }
}

impl Default for BaselineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
