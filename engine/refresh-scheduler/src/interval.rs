//! Refresh interval policies
//!
//! Pure functions of the current time so the cadence can be tested without a
//! real clock.

use chrono::{DateTime, FixedOffset, NaiveTime, Utc};
use std::time::Duration;

/// Daily local-time window `[start, end)`; wraps midnight when `end <= start`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub offset: FixedOffset,
}

impl PrimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime, offset: FixedOffset) -> Self {
        Self { start, end, offset }
    }

    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        let local = now.with_timezone(&self.offset).time();
        if self.start < self.end {
            local >= self.start && local < self.end
        } else {
            local >= self.start || local < self.end
        }
    }
}

/// How long a job waits between ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalPolicy {
    Fixed(Duration),
    /// Faster cadence inside the prime window
    TimeOfDay { window: PrimeWindow, prime: Duration, off_peak: Duration },
}

impl IntervalPolicy {
    pub fn interval_at(&self, now: DateTime<Utc>) -> Duration {
        match self {
            IntervalPolicy::Fixed(every) => *every,
            IntervalPolicy::TimeOfDay { window, prime, off_peak } => {
                if window.contains(now) {
                    *prime
                } else {
                    *off_peak
                }
            }
        }
    }

    /// Longest interval the policy can produce; used as the cache TTL
    pub fn nominal_ttl(&self) -> Duration {
        match self {
            IntervalPolicy::Fixed(every) => *every,
            IntervalPolicy::TimeOfDay { prime, off_peak, .. } => (*prime).max(*off_peak),
        }
    }
}
