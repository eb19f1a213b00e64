//! Service configuration management

use anyhow::{anyhow, Context, Result};
use feed_adapters::FeedsConfig;
use feed_core::SourceId;
use refresh_scheduler::SchedulerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Environment variable naming the config file when `--config` is absent
pub const CONFIG_PATH_ENV: &str = "GOAL2GOL_CONFIG";

/// Header football-data.org expects its API token in
const FOOTBALL_DATA_AUTH_HEADER: &str = "X-Auth-Token";

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Service-level configuration
    pub service: ServiceSettings,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Refresh cadences, prime window and job toggles
    pub scheduler: SchedulerConfig,

    /// Per-source feed endpoints
    pub feeds: FeedsConfig,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// How often the freshness report is logged, in seconds
    pub health_report_interval_secs: u64,

    /// How long service tasks other than the scheduler get to stop, in seconds
    pub shutdown_timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` wins when set
    pub level: String,

    /// Log format (json, pretty, compact)
    pub format: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self { health_report_interval_secs: 5 * 60, shutdown_timeout_secs: 5 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string() }
    }
}

impl ServiceSettings {
    pub fn health_report_interval(&self) -> Duration {
        Duration::from_secs(self.health_report_interval_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

/// Load configuration from an optional TOML file, then environment overrides.
///
/// `path` falls back to `GOAL2GOL_CONFIG`; with neither set, defaults are
/// used. `.env` is loaded first so it can supply any of the variables.
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig> {
    dotenv::dotenv().ok();

    let path: Option<PathBuf> = path
        .map(Path::to_path_buf)
        .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from));

    let mut config = match path {
        Some(path) => {
            tracing::debug!("Loading configuration from file: {:?}", path);
            load_from_file(&path)?
        }
        None => ServiceConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    validate_config(&config)?;
    Ok(config)
}

/// Load configuration from a TOML file; missing sections keep their defaults
pub fn load_from_file(path: &Path) -> Result<ServiceConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {:?}", path))?;
    parse_toml(&raw).with_context(|| format!("Failed to parse configuration file: {:?}", path))
}

pub fn parse_toml(raw: &str) -> Result<ServiceConfig> {
    Ok(toml::from_str(raw)?)
}

/// Apply `GOAL2GOL_*` overrides read through `lookup`
pub fn apply_env_overrides(
    config: &mut ServiceConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(level) = lookup("GOAL2GOL_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(format) = lookup("GOAL2GOL_LOG_FORMAT") {
        config.logging.format = format;
    }
    if let Some(secs) = parse_var(&lookup, "GOAL2GOL_HEALTH_REPORT_INTERVAL_SECS")? {
        config.service.health_report_interval_secs = secs;
    }

    let scheduler = &mut config.scheduler;
    if let Some(secs) = parse_var(&lookup, "GOAL2GOL_LIVE_PRIME_INTERVAL_SECS")? {
        scheduler.live_prime_interval_secs = secs;
    }
    if let Some(secs) = parse_var(&lookup, "GOAL2GOL_LIVE_OFF_PEAK_INTERVAL_SECS")? {
        scheduler.live_off_peak_interval_secs = secs;
    }
    if let Some(secs) = parse_var(&lookup, "GOAL2GOL_FETCH_TIMEOUT_SECS")? {
        scheduler.fetch_timeout_secs = secs;
    }
    if let Some(max) = parse_var(&lookup, "GOAL2GOL_MAX_CONCURRENT_FETCHES")? {
        scheduler.max_concurrent_fetches = max;
    }

    let feeds = &mut config.feeds;
    if let Some(secs) = parse_var(&lookup, "GOAL2GOL_HTTP_TIMEOUT_SECS")? {
        feeds.http_timeout_secs = secs;
    }
    for (source, var) in [
        (SourceId::FootballData, "GOAL2GOL_FOOTBALL_DATA_URL"),
        (SourceId::Sofascore, "GOAL2GOL_SOFASCORE_URL"),
        (SourceId::Fixturedownload, "GOAL2GOL_FIXTUREDOWNLOAD_URL"),
    ] {
        if let Some(url) = lookup(var) {
            feeds.endpoint_mut(source).base_url = url;
        }
    }
    if let Some(token) = lookup("GOAL2GOL_FOOTBALL_DATA_TOKEN") {
        let endpoint = feeds.endpoint_mut(SourceId::FootballData);
        endpoint.auth_header = Some(FOOTBALL_DATA_AUTH_HEADER.to_string());
        endpoint.auth_value = Some(token);
    }

    Ok(())
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(name)
        .map(|raw| {
            raw.trim().parse::<T>().with_context(|| format!("Invalid value for {name}: '{raw}'"))
        })
        .transpose()
}

/// Validate configuration
pub fn validate_config(config: &ServiceConfig) -> Result<()> {
    match config.logging.level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.logging.level)),
    }

    match config.logging.format.as_str() {
        "json" | "pretty" | "compact" => {}
        _ => return Err(anyhow!("Invalid log format: {}", config.logging.format)),
    }

    if config.service.health_report_interval_secs == 0 {
        return Err(anyhow!("health_report_interval_secs must be greater than zero"));
    }

    config.scheduler.validate().context("Invalid scheduler configuration")?;
    config.feeds.validate().context("Invalid feeds configuration")?;
    Ok(())
}
