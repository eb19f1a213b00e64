//! Error types shared by adapters and league parsing

use std::time::Duration;
use thiserror::Error;

use crate::league::LeagueScope;
use crate::source::{DataType, SourceId};

/// Errors an adapter can report for a single fetch attempt
///
/// These never reach an API consumer. The scheduler records them as the
/// cache entry's `last_error` and keeps serving the previous payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Upstream returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Record from {found} returned by {expected} adapter")]
    SourceMismatch { expected: SourceId, found: SourceId },

    #[error("Record for {found} returned for {expected}")]
    ScopeMismatch { expected: LeagueScope, found: LeagueScope },

    #[error("Fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("Empty {data_type} payload from {source_id}")]
    UnexpectedEmpty { source_id: SourceId, data_type: DataType },

    #[error("{source_id} does not serve {data_type}")]
    Unsupported { source_id: SourceId, data_type: DataType },
}

/// A league slug outside the fixed catalog
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("League '{0}' not found")]
pub struct UnknownLeagueError(pub String);
