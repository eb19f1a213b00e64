use chrono::{DateTime, Utc};
use feed_cache::CacheKey;

/// What happened to one key during a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    /// Payload replaced with this many records
    Updated { records: usize },
    /// Attempt failed; previous payload kept
    Failed { error: String },
    /// Another fetch for the key was still running
    SkippedInFlight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyOutcome {
    pub key: CacheKey,
    pub status: FetchStatus,
}

/// Summary of one job tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub job: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// The whole tick was skipped because the previous one was still running
    pub skipped: bool,
    pub outcomes: Vec<KeyOutcome>,
}

impl TickReport {
    pub(crate) fn skipped(job: &str, at: DateTime<Utc>) -> Self {
        Self {
            job: job.to_string(),
            started_at: at,
            finished_at: at,
            skipped: true,
            outcomes: Vec::new(),
        }
    }

    pub fn updated(&self) -> usize {
        self.count(|status| matches!(status, FetchStatus::Updated { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|status| matches!(status, FetchStatus::Failed { .. }))
    }

    pub fn skipped_in_flight(&self) -> usize {
        self.count(|status| matches!(status, FetchStatus::SkippedInFlight))
    }

    pub fn status_of(&self, key: &CacheKey) -> Option<&FetchStatus> {
        self.outcomes.iter().find(|outcome| &outcome.key == key).map(|outcome| &outcome.status)
    }

    fn count(&self, predicate: impl Fn(&FetchStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|outcome| predicate(&outcome.status)).count()
    }
}
