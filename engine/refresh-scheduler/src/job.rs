//! Refresh job definitions

use feed_cache::CacheKey;
use feed_core::{DataType, LeagueScope, SourceId};
use std::time::Duration;

use crate::config::SchedulerConfig;
use crate::error::SchedulerResult;
use crate::interval::IntervalPolicy;

pub const LIVE_SCORES_JOB: &str = "live-scores";
pub const FOOTBALL_DATA_JOB: &str = "football-data";
pub const SOFASCORE_LEAGUES_JOB: &str = "sofascore-leagues";
pub const FIXTUREDOWNLOAD_JOB: &str = "fixturedownload";

/// One periodic refresh: a source, the data it covers and its cadence.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshJob {
    pub name: String,
    pub source: SourceId,
    pub policy: IntervalPolicy,
    pub data_types: Vec<DataType>,
    pub scopes: Vec<LeagueScope>,
    pub fetch_timeout: Duration,
    pub max_concurrent_fetches: usize,
}

impl RefreshJob {
    /// Every cache key this job writes, in fetch order
    pub fn keys(&self) -> Vec<CacheKey> {
        self.data_types
            .iter()
            .flat_map(|data_type| {
                self.scopes.iter().map(move |scope| CacheKey::new(self.source, *data_type, *scope))
            })
            .collect()
    }

    /// TTL registered for this job's keys
    pub fn ttl(&self) -> Duration {
        self.policy.nominal_ttl()
    }
}

/// The standard job set, one per upstream cadence
pub fn default_jobs(config: &SchedulerConfig) -> SchedulerResult<Vec<RefreshJob>> {
    config.validate()?;
    let mut jobs = Vec::new();

    if config.jobs.live_scores {
        jobs.push(RefreshJob {
            name: LIVE_SCORES_JOB.to_string(),
            source: SourceId::Sofascore,
            policy: IntervalPolicy::TimeOfDay {
                window: config.prime_window.to_window()?,
                prime: Duration::from_secs(config.live_prime_interval_secs),
                off_peak: Duration::from_secs(config.live_off_peak_interval_secs),
            },
            data_types: vec![DataType::Live],
            scopes: LeagueScope::with_live_from(SourceId::Sofascore),
            fetch_timeout: config.fetch_timeout(),
            max_concurrent_fetches: config.max_concurrent_fetches,
        });
    }

    if config.jobs.football_data {
        jobs.push(RefreshJob {
            name: FOOTBALL_DATA_JOB.to_string(),
            source: SourceId::FootballData,
            policy: IntervalPolicy::Fixed(Duration::from_secs(config.football_data_interval_secs)),
            data_types: vec![DataType::Fixtures, DataType::Standings, DataType::Scorers],
            scopes: LeagueScope::with_fixtures_from(SourceId::FootballData),
            fetch_timeout: Duration::from_secs(config.football_data_fetch_timeout_secs),
            // Free tier allows 10 requests a minute
            max_concurrent_fetches: 1,
        });
    }

    if config.jobs.sofascore_leagues {
        jobs.push(RefreshJob {
            name: SOFASCORE_LEAGUES_JOB.to_string(),
            source: SourceId::Sofascore,
            policy: IntervalPolicy::Fixed(Duration::from_secs(
                config.sofascore_leagues_interval_secs,
            )),
            data_types: vec![DataType::Fixtures, DataType::Standings],
            scopes: LeagueScope::with_fixtures_from(SourceId::Sofascore),
            fetch_timeout: config.fetch_timeout(),
            max_concurrent_fetches: config.max_concurrent_fetches,
        });
    }

    if config.jobs.fixturedownload {
        jobs.push(RefreshJob {
            name: FIXTUREDOWNLOAD_JOB.to_string(),
            source: SourceId::Fixturedownload,
            policy: IntervalPolicy::Fixed(Duration::from_secs(
                config.fixturedownload_interval_secs,
            )),
            // Standings for these leagues are derived from results at query time
            data_types: vec![DataType::Fixtures],
            scopes: LeagueScope::with_fixtures_from(SourceId::Fixturedownload),
            fetch_timeout: config.fetch_timeout(),
            max_concurrent_fetches: config.max_concurrent_fetches,
        });
    }

    Ok(jobs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_job_set() {
        let jobs = default_jobs(&SchedulerConfig::default()).unwrap();
        let names: Vec<&str> = jobs.iter().map(|job| job.name.as_str()).collect();
        assert_eq!(
            names,
            vec![LIVE_SCORES_JOB, FOOTBALL_DATA_JOB, SOFASCORE_LEAGUES_JOB, FIXTUREDOWNLOAD_JOB]
        );

        let fd = &jobs[1];
        assert_eq!(fd.keys().len(), 8 * 3);
        assert_eq!(fd.max_concurrent_fetches, 1);
        assert_eq!(fd.ttl(), Duration::from_secs(1800));

        let live = &jobs[0];
        assert_eq!(live.keys().len(), 10);
        assert_eq!(live.ttl(), Duration::from_secs(420));
    }

    #[test]
    fn test_jobs_never_share_keys() {
        let jobs = default_jobs(&SchedulerConfig::default()).unwrap();
        let mut seen = HashSet::new();
        for job in &jobs {
            for key in job.keys() {
                assert!(seen.insert(key), "key {key} written by more than one job");
            }
        }
    }

    #[test]
    fn test_disabled_jobs_are_skipped() {
        let mut config = SchedulerConfig::default();
        config.jobs.live_scores = false;
        config.jobs.sofascore_leagues = false;
        let jobs = default_jobs(&config).unwrap();
        assert_eq!(jobs.len(), 2);
        assert!(jobs.iter().all(|job| job.source != SourceId::Sofascore));
    }
}
