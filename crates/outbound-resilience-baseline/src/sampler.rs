use crate::BaselineConfig;
use tokio::time::Instant;

/// Point-in-time view of a baseline proxy's learned statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaselineStatistics {
    /// Computed alarm level in milliseconds; zero means "never alarm".
    pub alarm_level_ms: u64,
    /// Running average of steady-state durations in milliseconds.
    pub average_ms: u64,
    /// Shortest steady-state duration, if any call has completed since sampling ended.
    pub min_ms: Option<u64>,
    /// Longest steady-state duration, if any call has completed since sampling ended.
    pub max_ms: Option<u64>,
    /// Number of durations collected during sampling.
    pub samples: usize,
    pub sampling_finished: bool,
}

/// Outcome of feeding one duration into the sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SampleOutcome {
    /// Warm-up, or the duration was added to the sample list.
    Sampling,
    /// This duration ended sampling; the alarm level is now known.
    Finished { alarm_level_ms: u64, samples: usize },
    /// Steady state; the duration was folded into the running statistics.
    Steady,
}

pub(crate) struct Sampler {
    sampling_starts: Instant,
    sampling_ends: Instant,
    max_samples: usize,
    samples: Vec<u64>,
    finished: bool,
    alarm_level_ms: u64,
    average_ms: u64,
    min_ms: Option<u64>,
    max_ms: Option<u64>,
}

impl Sampler {
    pub(crate) fn new(config: &BaselineConfig) -> Self {
        let now = Instant::now();
        let sampling_starts = now + config.start_sampling_after;
        Self {
            sampling_starts,
            sampling_ends: sampling_starts + config.max_sample_duration,
            max_samples: config.max_samples_count,
            samples: Vec::with_capacity(config.max_samples_count),
            finished: false,
            alarm_level_ms: 0,
            average_ms: 0,
            min_ms: None,
            max_ms: None,
        }
    }

    pub(crate) fn sample(&mut self, value_ms: u64) -> SampleOutcome {
        if self.finished {
            self.average_ms = if self.average_ms == 0 {
                value_ms
            } else {
                (self.average_ms + value_ms).div_ceil(2)
            };
            self.min_ms = Some(self.min_ms.map_or(value_ms, |min| min.min(value_ms)));
            self.max_ms = Some(self.max_ms.map_or(value_ms, |max| max.max(value_ms)));
            return SampleOutcome::Steady;
        }

        let now = Instant::now();
        if now < self.sampling_starts {
            return SampleOutcome::Sampling;
        }

        if now > self.sampling_ends || self.samples.len() >= self.max_samples {
            self.alarm_level_ms = alarm_level(&self.samples);
            self.finished = true;
            return SampleOutcome::Finished {
                alarm_level_ms: self.alarm_level_ms,
                samples: self.samples.len(),
            };
        }

        self.samples.push(value_ms);
        SampleOutcome::Sampling
    }

    pub(crate) fn statistics(&self) -> BaselineStatistics {
        BaselineStatistics {
            alarm_level_ms: self.alarm_level_ms,
            average_ms: self.average_ms,
            min_ms: self.min_ms,
            max_ms: self.max_ms,
            samples: self.samples.len(),
            sampling_finished: self.finished,
        }
    }
}

/// `floor(1.2 * mean + 3 * stddev)` with the sample variance (`n - 1` divisor).
///
/// Fewer than two samples leave the variance undefined, which yields zero.
pub(crate) fn alarm_level(samples: &[u64]) -> u64 {
    if samples.len() < 2 {
        return 0;
    }

    let n = samples.len() as f64;
    let mean = samples.iter().map(|&s| s as f64).sum::<f64>() / n;
    let variance = samples
        .iter()
        .map(|&s| (s as f64 - mean).powi(2))
        .sum::<f64>()
        / (n - 1.0);
    let level = 1.2 * mean + 3.0 * variance.sqrt();

    if level.is_finite() && level > 0.0 {
        level.floor() as u64
    } else {
        0
    }
}
