//! Error types for the refresh scheduler

use feed_core::SourceId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Job '{0}' is not registered")]
    UnknownJob(String),

    #[error("Job '{job}' needs a {source_id} adapter but none is registered")]
    MissingAdapter { job: String, source_id: SourceId },

    #[error("Scheduler is already running")]
    AlreadyRunning,
}

/// Result type for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;
