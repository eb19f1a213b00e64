//! Sharded cache store
//!
//! Backed by a `DashMap`, so writers to different keys land on independent
//! shard locks and never wait on each other, while writes to one key are
//! serialized by its shard. Reads clone the entry out (the payload is an
//! `Arc`) and never wait on a fetch.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use feed_core::{DataType, SourceId};
use std::time::Duration;
use tracing::{debug, warn};

use crate::entry::{CacheEntry, CacheUpdate};
use crate::health::HealthEntry;
use crate::key::CacheKey;
use crate::DEFAULT_TTL_SECS;

/// The only shared mutable state of the engine.
///
/// Created once at startup and handed to the scheduler (writer) and the query
/// layer (reader) as an `Arc<CacheStore>`.
pub struct CacheStore {
    entries: DashMap<CacheKey, CacheEntry>,
    default_ttl: Duration,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::with_default_ttl(Duration::from_secs(DEFAULT_TTL_SECS))
    }

    pub fn with_default_ttl(default_ttl: Duration) -> Self {
        Self { entries: DashMap::new(), default_ttl }
    }

    /// Declare a key so it shows up in health before its first fetch.
    ///
    /// Re-registering keeps the cached payload and only updates the TTL.
    pub fn register(&self, key: CacheKey, ttl: Duration) {
        self.entries
            .entry(key)
            .and_modify(|entry| entry.ttl = ttl)
            .or_insert_with(|| CacheEntry::empty(key, ttl));
    }

    /// Latest successful entry for `key`, stale or not.
    ///
    /// Returns `None` until a fetch for the key has succeeded at least once.
    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        let entry = self.entries.get(key)?;
        if entry.has_succeeded() {
            debug!("Cache hit for key: {}", key);
            Some(entry.value().clone())
        } else {
            debug!("Cache miss for key: {}", key);
            None
        }
    }

    /// Record one completed fetch attempt for `key`
    pub fn put(&self, key: CacheKey, update: CacheUpdate, at: DateTime<Utc>) {
        let mut entry = self.entries.entry(key).or_insert_with(|| {
            warn!("Writing unregistered cache key {}, using default TTL", key);
            CacheEntry::empty(key, self.default_ttl)
        });

        match &update {
            CacheUpdate::Success(records) => {
                debug!("Cached {} records for key: {}", records.len(), key)
            }
            CacheUpdate::Failure(message) => {
                debug!("Recorded failure for key {}: {}", key, message)
            }
        }
        entry.apply(update, at);
    }

    /// Every successful entry for one source and data type, ordered by league
    pub fn entries_for(&self, source: SourceId, data_type: DataType) -> Vec<CacheEntry> {
        let mut entries: Vec<CacheEntry> = self
            .entries
            .iter()
            .filter(|entry| {
                entry.key.source == source
                    && entry.key.data_type == data_type
                    && entry.has_succeeded()
            })
            .map(|entry| entry.value().clone())
            .collect();
        entries.sort_by_key(|entry| entry.key);
        entries
    }

    /// Freshness of every known key, ordered by key
    pub fn health(&self, now: DateTime<Utc>) -> Vec<HealthEntry> {
        let mut report: Vec<HealthEntry> =
            self.entries.iter().map(|entry| HealthEntry::from_entry(entry.value(), now)).collect();
        report.sort_by_key(|entry| entry.key);
        report
    }

    /// Number of known keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}
