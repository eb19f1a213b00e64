use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entry::CacheEntry;
use crate::key::CacheKey;

/// Freshness of one cache key, as exposed to health queries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthEntry {
    #[serde(flatten)]
    pub key: CacheKey,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_attempt_at: Option<DateTime<Utc>>,
    pub age_secs: Option<u64>,
    pub stale: bool,
    pub last_error: Option<String>,
    pub record_count: usize,
}

impl HealthEntry {
    pub fn from_entry(entry: &CacheEntry, now: DateTime<Utc>) -> Self {
        Self {
            key: entry.key,
            last_success_at: entry.last_success_at,
            last_attempt_at: entry.last_attempt_at,
            age_secs: entry.age(now).map(|age| age.as_secs()),
            stale: entry.is_stale(now),
            last_error: entry.last_error.clone(),
            record_count: entry.payload.len(),
        }
    }
}
