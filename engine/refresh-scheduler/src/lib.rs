//! Refresh Scheduler
//!
//! Runs one background task per refresh job. Each task fetches every
//! (data type, league) key the job owns through the source adapter and
//! writes the outcome to the feed cache, then sleeps for the job's interval.
//! The live-score job speeds up during the evening prime window.

pub mod config;
pub mod error;
pub mod inflight;
pub mod interval;
pub mod job;
pub mod report;
pub mod scheduler;

pub use config::{JobToggles, PrimeWindowConfig, SchedulerConfig};
pub use error::{SchedulerError, SchedulerResult};
pub use interval::{IntervalPolicy, PrimeWindow};
pub use job::{
    default_jobs, RefreshJob, FIXTUREDOWNLOAD_JOB, FOOTBALL_DATA_JOB, LIVE_SCORES_JOB,
    SOFASCORE_LEAGUES_JOB,
};
pub use report::{FetchStatus, KeyOutcome, TickReport};
pub use scheduler::RefreshScheduler;

#[cfg(test)]
mod tests;
