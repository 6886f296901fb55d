//! Sliding-window detector
//!
//! Holds the last K outcomes in strict FIFO order together with a running
//! count of the timeouts among them.

use std::collections::VecDeque;

use crate::classify::{Outcome, TimeoutCause};

/// What one insert into the window produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowVerdict {
    /// The window holds K outcomes
    pub window_full: bool,
    /// `floor(100 * timeouts / K)`
    pub timeout_percent: u32,
    /// Set when escalation is due; carries the inserted outcome's cause
    pub trigger: Option<TimeoutCause>,
}

/// Point-in-time view of the window for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSnapshot {
    pub len: usize,
    pub capacity: usize,
    pub timeout_count: usize,
    pub threshold_percent: u8,
}

/// Bounded FIFO of recent outcomes with a rolling timeout percentage.
#[derive(Debug, Clone)]
pub struct SlidingWindowDetector {
    entries: VecDeque<Outcome>,
    capacity: usize,
    timeout_count: usize,
    threshold_percent: u8,
}

impl SlidingWindowDetector {
    /// `capacity` below 1 is raised to 1 and `threshold_percent` above 100
    /// lowered to 100; validated configuration never hits either.
    #[must_use]
    pub fn new(capacity: usize, threshold_percent: u8) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            timeout_count: 0,
            threshold_percent: threshold_percent.min(100),
        }
    }

    /// Insert an outcome, evicting the oldest first if the window is full.
    ///
    /// Escalation is only signalled on a full window, when the inserted
    /// outcome is itself a timeout and the percentage is strictly above the
    /// threshold. A success never re-triggers on an already-hot window.
    pub fn record(&mut self, outcome: Outcome) -> WindowVerdict {
        if self.entries.len() == self.capacity {
            self.evict_oldest();
        }

        let cause = outcome.classification.cause();
        if outcome.is_timeout() {
            self.timeout_count += 1;
        }
        self.entries.push_back(outcome);

        let window_full = self.is_full();
        let timeout_percent = self.timeout_percent();
        let trigger = (window_full
            && !cause.is_empty()
            && timeout_percent > u32::from(self.threshold_percent))
        .then_some(cause);

        WindowVerdict {
            window_full,
            timeout_percent,
            trigger,
        }
    }

    fn evict_oldest(&mut self) {
        if let Some(evicted) = self.entries.pop_front()
            && evicted.is_timeout()
        {
            self.timeout_count -= 1;
        }
    }

    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.entries.len() == self.capacity
    }

    /// Timeout share of the window's capacity, rounded down.
    #[must_use]
    pub fn timeout_percent(&self) -> u32 {
        let percent = self.timeout_count * 100 / self.capacity;
        u32::try_from(percent).unwrap_or(100)
    }

    #[inline]
    #[must_use]
    pub fn timeout_count(&self) -> usize {
        self.timeout_count
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Outcomes still needed before the window can escalate.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.capacity - self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Outcome> {
        self.entries.iter()
    }

    /// Change K. Oldest entries are evicted until the window fits.
    pub fn resize(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.entries.len() > self.capacity {
            self.evict_oldest();
        }
    }

    pub fn set_threshold_percent(&mut self, threshold_percent: u8) {
        self.threshold_percent = threshold_percent.min(100);
    }

    #[must_use]
    pub fn snapshot(&self) -> WindowSnapshot {
        WindowSnapshot {
            len: self.entries.len(),
            capacity: self.capacity,
            timeout_count: self.timeout_count,
            threshold_percent: self.threshold_percent,
        }
    }
}
