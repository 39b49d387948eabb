//! Bounded FIFO index of cached keys.

use std::collections::VecDeque;
use std::fmt::Debug;

/// Outcome of [`MemoryQueue::push`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuePushResult<K> {
    /// The oldest item, if it had to make room for the pushed one.
    pub popped: Option<K>,
}

impl<K> QueuePushResult<K> {
    pub fn has_popped(&self) -> bool {
        self.popped.is_some()
    }
}

/// A FIFO of keys bounded by `max_length`.
///
/// The queue only mirrors insertion order; it stores no values. Pushing into a
/// full queue pops the oldest key first, which tells the owner what to evict.
#[derive(Debug, Clone)]
pub struct MemoryQueue<K> {
    max_length: usize,
    items: VecDeque<K>,
}

impl<K: PartialEq + Debug> MemoryQueue<K> {
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length,
            items: VecDeque::new(),
        }
    }

    /// Appends `value`, first popping the oldest item if the queue is full.
    pub fn push(&mut self, value: K) -> QueuePushResult<K> {
        let popped = if self.items.len() >= self.max_length {
            let popped = self.pop();
            tracing::info!(
                max_length = self.max_length,
                popped = ?popped,
                pushed = ?value,
                "MemoryQueue reached its size limit"
            );
            popped
        } else {
            None
        };

        self.items.push_back(value);
        tracing::trace!(len = self.items.len(), max_length = self.max_length, "Pushed to MemoryQueue");
        QueuePushResult { popped }
    }

    /// Removes and returns the oldest item.
    pub fn pop(&mut self) -> Option<K> {
        self.items.pop_front()
    }

    /// Removes the first occurrence of `value`, wherever it is.
    pub fn remove(&mut self, value: &K) -> Option<K> {
        let index = self.items.iter().position(|item| item == value)?;
        self.items.remove(index)
    }

    pub fn contains(&self, value: &K) -> bool {
        self.items.contains(value)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }
}
