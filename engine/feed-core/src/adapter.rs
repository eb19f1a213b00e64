//! Source adapter contract
//!
//! An adapter turns one upstream provider into normalized records. The
//! scheduler owns timeouts, retries-by-next-tick and cache writes; adapters
//! only fetch.

use async_trait::async_trait;

use crate::error::AdapterError;
use crate::league::LeagueScope;
use crate::records::NormalizedRecord;
use crate::source::{DataType, SourceId};

/// Result of a successful fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Records for the requested (data type, scope), in provider order
    Records(Vec<NormalizedRecord>),
    /// The provider explicitly has nothing this cycle (e.g. off-season)
    NoData,
}

impl FetchOutcome {
    pub fn len(&self) -> usize {
        match self {
            FetchOutcome::Records(records) => records.len(),
            FetchOutcome::NoData => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fetches normalized data for one provider
///
/// Implementations must be idempotent and side-effect free from the caller's
/// point of view; the scheduler may call `fetch` for the same key again on
/// every tick.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Provider this adapter speaks for. Every returned record must carry it.
    fn source(&self) -> SourceId;

    async fn fetch(
        &self,
        data_type: DataType,
        scope: LeagueScope,
    ) -> Result<FetchOutcome, AdapterError>;
}

/// Check that every record carries `expected` as its source tag
pub fn verify_provenance(
    expected: SourceId,
    records: &[NormalizedRecord],
) -> Result<(), AdapterError> {
    match records.iter().find(|record| record.source() != expected) {
        Some(record) => Err(AdapterError::SourceMismatch { expected, found: record.source() }),
        None => Ok(()),
    }
}

/// Check that every record belongs to the requested league scope
pub fn verify_scope(
    expected: LeagueScope,
    records: &[NormalizedRecord],
) -> Result<(), AdapterError> {
    match records.iter().find(|record| record.league() != expected) {
        Some(record) => Err(AdapterError::ScopeMismatch { expected, found: record.league() }),
        None => Ok(()),
    }
}
