use feed_core::SourceId;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Feed endpoint configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedConfigError {
    #[error("Empty base URL for {0}")]
    EmptyBaseUrl(SourceId),

    #[error("Auth header for {0} has a name but no value")]
    IncompleteAuth(SourceId),

    #[error("HTTP timeout must be greater than zero")]
    ZeroTimeout,

    #[error("Invalid auth header for {source_id}: {message}")]
    InvalidHeader { source_id: SourceId, message: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Where each provider's normalized feed lives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedsConfig {
    /// HTTP client timeout, in seconds
    pub http_timeout_secs: u64,

    /// User-Agent sent with every request
    pub user_agent: String,

    pub football_data: FeedEndpoint,
    pub sofascore: FeedEndpoint,
    pub fixturedownload: FeedEndpoint,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedEndpoint {
    /// Requests go to `{base_url}/{data_type}/{league}`
    pub base_url: String,

    /// Optional auth header, e.g. `X-Auth-Token`
    #[serde(default)]
    pub auth_header: Option<String>,

    #[serde(default)]
    pub auth_value: Option<String>,
}

impl FeedEndpoint {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), auth_header: None, auth_value: None }
    }

    pub fn with_auth(mut self, header: impl Into<String>, value: impl Into<String>) -> Self {
        self.auth_header = Some(header.into());
        self.auth_value = Some(value.into());
        self
    }
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: 10,
            user_agent: format!("goal2gol/{}", env!("CARGO_PKG_VERSION")),
            football_data: FeedEndpoint::new("http://127.0.0.1:8700/football-data"),
            sofascore: FeedEndpoint::new("http://127.0.0.1:8700/sofascore"),
            fixturedownload: FeedEndpoint::new("http://127.0.0.1:8700/fixturedownload"),
        }
    }
}

impl FeedsConfig {
    pub fn endpoint(&self, source: SourceId) -> &FeedEndpoint {
        match source {
            SourceId::FootballData => &self.football_data,
            SourceId::Sofascore => &self.sofascore,
            SourceId::Fixturedownload => &self.fixturedownload,
        }
    }

    pub fn endpoint_mut(&mut self, source: SourceId) -> &mut FeedEndpoint {
        match source {
            SourceId::FootballData => &mut self.football_data,
            SourceId::Sofascore => &mut self.sofascore,
            SourceId::Fixturedownload => &mut self.fixturedownload,
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), FeedConfigError> {
        if self.http_timeout_secs == 0 {
            return Err(FeedConfigError::ZeroTimeout);
        }
        for source in SourceId::ALL {
            let endpoint = self.endpoint(source);
            if endpoint.base_url.trim().is_empty() {
                return Err(FeedConfigError::EmptyBaseUrl(source));
            }
            if endpoint.auth_header.is_some() && endpoint.auth_value.is_none() {
                return Err(FeedConfigError::IncompleteAuth(source));
            }
        }
        Ok(())
    }
}
