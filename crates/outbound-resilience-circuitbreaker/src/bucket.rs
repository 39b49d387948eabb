use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

/// Time-windowed failure counter.
///
/// Holds the timestamps of recent failures. Entries older than `window`
/// "leak" out, so only a burst of failures inside one window fills the bucket;
/// sporadic failures spread over a long time never do.
#[derive(Debug, Clone)]
pub struct LeakingBucket {
    window: Duration,
    capacity: usize,
    entries: VecDeque<Instant>,
}

impl LeakingBucket {
    /// Default window: 10 minutes.
    pub const DEFAULT_WINDOW: Duration = Duration::from_secs(10 * 60);
    /// Default capacity: 50 entries.
    pub const DEFAULT_CAPACITY: usize = 50;

    pub fn new(window: Duration, capacity: usize) -> Self {
        Self {
            window,
            capacity,
            entries: VecDeque::new(),
        }
    }

    /// Leaks expired entries, then records `timestamp` unless it is already
    /// outside the window.
    ///
    /// Returns whether the bucket is full afterwards.
    pub fn insert(&mut self, timestamp: Instant) -> bool {
        self.leak();
        if self.epoch().map_or(true, |epoch| timestamp > epoch) {
            self.entries.push_back(timestamp);
        }
        self.is_full()
    }

    /// Returns true once the retained count reaches capacity.
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Removes every entry at or before `now - window`.
    pub fn leak(&mut self) {
        if let Some(epoch) = self.epoch() {
            self.entries.retain(|ts| *ts > epoch);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    // None while the process has been alive for less than one window.
    fn epoch(&self) -> Option<Instant> {
        Instant::now().checked_sub(self.window)
    }
}

impl Default for LeakingBucket {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WINDOW, Self::DEFAULT_CAPACITY)
    }
}
