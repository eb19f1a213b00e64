//! Cache entry and update types

use chrono::{DateTime, Utc};
use feed_core::NormalizedRecord;
use std::sync::Arc;
use std::time::Duration;

use crate::key::CacheKey;
use crate::STALE_TTL_MULTIPLIER;

/// Outcome of one completed fetch attempt
#[derive(Debug, Clone, PartialEq)]
pub enum CacheUpdate {
    /// Replace the payload and stamp a success
    Success(Vec<NormalizedRecord>),
    /// Record the failure; the payload is left alone
    Failure(String),
}

/// Cached payload plus refresh bookkeeping for one key
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub key: CacheKey,
    /// Shared so readers can clone entries without copying records
    pub payload: Arc<Vec<NormalizedRecord>>,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_attempt_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    /// Expected refresh period of the owning job
    pub ttl: Duration,
}

impl CacheEntry {
    /// Entry for a key that has never been fetched
    pub fn empty(key: CacheKey, ttl: Duration) -> Self {
        Self {
            key,
            payload: Arc::new(Vec::new()),
            last_success_at: None,
            last_attempt_at: None,
            last_error: None,
            ttl,
        }
    }

    pub fn records(&self) -> &[NormalizedRecord] {
        &self.payload
    }

    pub fn has_succeeded(&self) -> bool {
        self.last_success_at.is_some()
    }

    /// Time since the last successful write, if there was one
    pub fn age(&self, now: DateTime<Utc>) -> Option<Duration> {
        // A success stamped after `now` (clock skew) counts as age zero
        self.last_success_at.map(|at| (now - at).to_std().unwrap_or(Duration::ZERO))
    }

    /// Stale when older than `ttl × 2`, or when nothing has ever succeeded
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        match self.age(now) {
            Some(age) => age > self.ttl.saturating_mul(STALE_TTL_MULTIPLIER),
            None => true,
        }
    }

    /// Apply one completed attempt stamped at `at`
    pub(crate) fn apply(&mut self, update: CacheUpdate, at: DateTime<Utc>) {
        self.last_attempt_at = Some(at);
        match update {
            CacheUpdate::Success(records) => {
                self.payload = Arc::new(records);
                self.last_success_at = Some(at);
                self.last_error = None;
            }
            CacheUpdate::Failure(message) => {
                self.last_error = Some(message);
            }
        }
    }
}
