//! Baseline proxy: a passive latency sampler.
//!
//! The proxy never blocks or fails a call. It learns what a normal call
//! duration looks like and logs a warning when a call is anomalously slow.
//!
//! 1. **Warm-up**: for `start_sampling_after` after construction, durations
//!    are ignored.
//! 2. **Sampling**: durations are collected until `max_sample_duration` has
//!    elapsed past the warm-up or `max_samples_count` durations are held. The
//!    next call then computes the alarm level
//!    `floor(1.2 * mean + 3 * stddev)`.
//! 3. **Steady state**: every call is folded into a running average, min and
//!    max. A call at or above a non-zero alarm level is logged at `WARN`,
//!    everything else at `INFO`.
//!
//! Failed calls are propagated unchanged and are not sampled.

use crate::sampler::{SampleOutcome, Sampler};
use futures::future::BoxFuture;
#[cfg(feature = "metrics")]
use metrics::{counter, gauge};
use outbound_resilience_core::{CorrelationId, Operation, ResilienceError, ResilienceProxy};
use parking_lot::Mutex;
use tokio::time::Instant;

pub use config::{BaselineConfig, BaselineConfigBuilder};
pub use events::BaselineEvent;
pub use sampler::BaselineStatistics;

mod config;
mod events;
mod sampler;

/// A proxy that learns a latency baseline and warns about slow calls.
pub struct BaselineProxy {
    sampler: Mutex<Sampler>,
    config: BaselineConfig,
}

impl BaselineProxy {
    /// Creates the proxy; the warm-up period starts now.
    pub fn new(config: BaselineConfig) -> Self {
        Self {
            sampler: Mutex::new(Sampler::new(&config)),
            config,
        }
    }

    pub fn statistics(&self) -> BaselineStatistics {
        self.sampler.lock().statistics()
    }

    pub fn config(&self) -> &BaselineConfig {
        &self.config
    }

    async fn call<T: Send + 'static>(
        &self,
        operation: Operation<T>,
        correlation_id: CorrelationId,
    ) -> Result<T, ResilienceError> {
        let start = Instant::now();
        let value = operation.call().await?;
        let duration = start.elapsed();
        let ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);

        let (outcome, stats) = {
            let mut sampler = self.sampler.lock();
            let outcome = sampler.sample(ms);
            (outcome, sampler.statistics())
        };
        let name = &self.config.name;

        if let SampleOutcome::Finished {
            alarm_level_ms,
            samples,
        } = outcome
        {
            tracing::info!(baseline = %name, alarm_level_ms, samples, "Sampling finished");
            self.config
                .event_listeners
                .emit_with(|| BaselineEvent::SamplingFinished {
                    pattern_name: name.clone(),
                    timestamp: Instant::now(),
                    alarm_level_ms,
                    samples,
                });
            #[cfg(feature = "metrics")]
            gauge!("baseline_alarm_level_ms", "baseline" => name.clone()).set(alarm_level_ms as f64);
        }

        if !stats.sampling_finished {
            tracing::info!(
                baseline = %name,
                correlation_id = %correlation_id,
                duration_ms = ms,
                "returned in {ms}ms. Sampling ongoing."
            );
            return Ok(value);
        }

        let alarm = stats.alarm_level_ms;
        let min = stats.min_ms.unwrap_or_default();
        let max = stats.max_ms.unwrap_or_default();
        if alarm > 0 && ms >= alarm {
            tracing::warn!(
                baseline = %name,
                correlation_id = %correlation_id,
                duration_ms = ms,
                alarm_level_ms = alarm,
                "returned above alarm level in {ms}/{alarm}ms AVG = {} MIN = {min} MAX = {max}",
                stats.average_ms
            );
            self.config
                .event_listeners
                .emit_with(|| BaselineEvent::AlarmExceeded {
                    pattern_name: name.clone(),
                    timestamp: Instant::now(),
                    duration,
                    alarm_level_ms: alarm,
                });
            #[cfg(feature = "metrics")]
            counter!("baseline_alarms_total", "baseline" => name.clone()).increment(1);
        } else {
            tracing::info!(
                baseline = %name,
                correlation_id = %correlation_id,
                duration_ms = ms,
                alarm_level_ms = alarm,
                "returned in {ms}/{alarm}ms AVG = {} MIN = {min} MAX = {max}",
                stats.average_ms
            );
        }

        Ok(value)
    }
}

impl<T: Send + 'static> ResilienceProxy<T> for BaselineProxy {
    fn execute(
        &self,
        operation: Operation<T>,
        correlation_id: CorrelationId,
    ) -> BoxFuture<'_, Result<T, ResilienceError>> {
        Box::pin(self.call(operation, correlation_id))
    }
}
