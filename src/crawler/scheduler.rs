//! Start-time staggering for dispatched requests
//!
//! A positive interval spaces the *start* of successive requests; once started
//! each request runs independently. This is a politeness delay, not a rate
//! limiter: nothing is shared between tasks and no tokens are refilled.

use std::time::Duration;

/// Per-index start offsets for a batch of requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartSchedule {
    interval: Duration,
}

impl StartSchedule {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Delay from dispatch until request `index` may start
    pub fn offset(&self, index: usize) -> Duration {
        let steps = u32::try_from(index).unwrap_or(u32::MAX);
        self.interval.saturating_mul(steps)
    }
}
