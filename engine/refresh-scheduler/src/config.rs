use chrono::{FixedOffset, NaiveTime};
use feed_core::DEFAULT_UTC_OFFSET_SECS;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::SchedulerError;
use crate::interval::PrimeWindow;

/// Longest accepted cadence or timeout: one week
pub const MAX_INTERVAL_SECS: u64 = 7 * 24 * 60 * 60;

/// Configuration for the refresh scheduler
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Local window with the heaviest live football
    pub prime_window: PrimeWindowConfig,

    /// Live-score cadence inside the prime window, in seconds
    pub live_prime_interval_secs: u64,

    /// Live-score cadence outside the prime window, in seconds
    pub live_off_peak_interval_secs: u64,

    /// football-data.org cadence (rate limited upstream), in seconds
    pub football_data_interval_secs: u64,

    /// SofaScore league fixtures/standings cadence, in seconds
    pub sofascore_leagues_interval_secs: u64,

    /// fixturedownload.com cadence, in seconds
    pub fixturedownload_interval_secs: u64,

    /// Per-fetch timeout, in seconds
    pub fetch_timeout_secs: u64,

    /// Per-fetch timeout for football-data.org, which throttles requests
    pub football_data_fetch_timeout_secs: u64,

    /// Concurrent fetches allowed within one tick of a job
    pub max_concurrent_fetches: usize,

    /// How long in-flight ticks may run after shutdown is requested
    pub shutdown_grace_secs: u64,

    /// Job toggles
    pub jobs: JobToggles,
}

/// Prime window as configured (local wall-clock times)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimeWindowConfig {
    /// Start time (HH:MM, inclusive)
    pub start: String,

    /// End time (HH:MM, exclusive); earlier than `start` means it wraps midnight
    pub end: String,

    /// Offset of the local timezone from UTC, in seconds
    pub utc_offset_secs: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JobToggles {
    pub live_scores: bool,
    pub football_data: bool,
    pub sofascore_leagues: bool,
    pub fixturedownload: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            prime_window: PrimeWindowConfig::default(),
            live_prime_interval_secs: 3 * 60,
            live_off_peak_interval_secs: 7 * 60,
            football_data_interval_secs: 30 * 60,
            sofascore_leagues_interval_secs: 30 * 60,
            fixturedownload_interval_secs: 60 * 60,
            fetch_timeout_secs: 10,
            football_data_fetch_timeout_secs: 30,
            max_concurrent_fetches: 4,
            shutdown_grace_secs: 10,
            jobs: JobToggles::default(),
        }
    }
}

impl Default for PrimeWindowConfig {
    fn default() -> Self {
        Self {
            start: "17:00".to_string(),
            end: "06:00".to_string(),
            utc_offset_secs: DEFAULT_UTC_OFFSET_SECS,
        }
    }
}

impl Default for JobToggles {
    fn default() -> Self {
        Self {
            live_scores: true,
            football_data: true,
            sofascore_leagues: true,
            fixturedownload: true,
        }
    }
}

impl PrimeWindowConfig {
    /// Parse into a window usable by the interval policy
    pub fn to_window(&self) -> Result<PrimeWindow, SchedulerError> {
        let parse = |raw: &str| {
            NaiveTime::parse_from_str(raw, "%H:%M").map_err(|e| {
                SchedulerError::Config(format!("invalid prime window time '{raw}': {e}"))
            })
        };
        let offset = FixedOffset::east_opt(self.utc_offset_secs).ok_or_else(|| {
            SchedulerError::Config(format!("invalid UTC offset {}s", self.utc_offset_secs))
        })?;
        Ok(PrimeWindow::new(parse(&self.start)?, parse(&self.end)?, offset))
    }
}

impl SchedulerConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }

    /// Reject settings the scheduler cannot run with
    pub fn validate(&self) -> Result<(), SchedulerError> {
        let intervals = [
            ("live_prime_interval_secs", self.live_prime_interval_secs),
            ("live_off_peak_interval_secs", self.live_off_peak_interval_secs),
            ("football_data_interval_secs", self.football_data_interval_secs),
            ("sofascore_leagues_interval_secs", self.sofascore_leagues_interval_secs),
            ("fixturedownload_interval_secs", self.fixturedownload_interval_secs),
            ("fetch_timeout_secs", self.fetch_timeout_secs),
            ("football_data_fetch_timeout_secs", self.football_data_fetch_timeout_secs),
        ];
        if let Some((name, _)) = intervals.iter().find(|(_, secs)| *secs == 0) {
            return Err(SchedulerError::Config(format!("{name} must be greater than zero")));
        }
        if let Some((name, secs)) = intervals.iter().find(|(_, secs)| *secs > MAX_INTERVAL_SECS) {
            return Err(SchedulerError::Config(format!(
                "{name} must be at most {MAX_INTERVAL_SECS} seconds, got {secs}"
            )));
        }
        if self.max_concurrent_fetches == 0 {
            return Err(SchedulerError::Config(
                "max_concurrent_fetches must be greater than zero".to_string(),
            ));
        }
        self.prime_window.to_window()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SchedulerConfig::default();
        assert_eq!(config.live_prime_interval_secs, 180);
        assert_eq!(config.live_off_peak_interval_secs, 420);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = SchedulerConfig { fixturedownload_interval_secs: 0, ..Default::default() };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("fixturedownload_interval_secs"));
    }

    #[test]
    fn test_oversized_interval_rejected() {
        let config =
            SchedulerConfig { live_off_peak_interval_secs: u64::MAX, ..Default::default() };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("live_off_peak_interval_secs"));

        let config =
            SchedulerConfig { fetch_timeout_secs: MAX_INTERVAL_SECS, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_window_rejected() {
        let config = SchedulerConfig {
            prime_window: PrimeWindowConfig { start: "25:00".to_string(), ..Default::default() },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SchedulerError::Config(_))));
    }

    #[test]
    fn test_partial_toml_style_input_uses_defaults() {
        let raw = r#"{"live_prime_interval_secs": 120, "jobs": {"fixturedownload": false}}"#;
        let config: SchedulerConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.live_prime_interval_secs, 120);
        assert_eq!(config.live_off_peak_interval_secs, 420);
        assert!(!config.jobs.fixturedownload);
        assert!(config.jobs.live_scores);
    }
}
