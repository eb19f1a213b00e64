//! Response shapes returned by the query layer

use chrono::{DateTime, Utc};
use feed_cache::HealthEntry;
use feed_core::{LeagueScope, Match, ScorerRow, SourceId, StandingsRow, Streaming};
use serde::Serialize;

/// Catalog entry for one league
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeagueSummary {
    pub slug: LeagueScope,
    pub name: &'static str,
    pub short: &'static str,
    pub country: &'static str,
    pub logo_url: &'static str,
    pub streaming: Streaming,
}

impl From<LeagueScope> for LeagueSummary {
    fn from(scope: LeagueScope) -> Self {
        let info = scope.info();
        Self {
            slug: scope,
            name: info.name,
            short: info.short,
            country: info.country,
            logo_url: info.logo_url,
            streaming: info.streaming,
        }
    }
}

/// Everything a league page shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeagueOverview {
    #[serde(flatten)]
    pub league: LeagueSummary,
    pub live: Vec<Match>,
    pub upcoming: Vec<Match>,
    pub recent: Vec<Match>,
    pub standings: Vec<StandingsRow>,
    pub scorers: Vec<ScorerRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeagueFixtures {
    pub live: Vec<Match>,
    pub upcoming: Vec<Match>,
}

/// A team found by search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamHit {
    pub source: SourceId,
    pub team_id: Option<i64>,
    pub name: String,
    pub short_name: String,
    pub crest_url: String,
    pub league: LeagueScope,
    /// Table position and points when the team was found in a table
    pub position: Option<u32>,
    pub points: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub leagues: Vec<LeagueSummary>,
    pub teams: Vec<TeamHit>,
    pub players: Vec<ScorerRow>,
    pub matches: Vec<Match>,
    /// Hits before per-section truncation
    pub total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// At least one key has been refreshed successfully
    Healthy,
    /// Nothing fetched yet
    WarmingUp,
}

/// Freshness snapshot of the whole cache
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub generated_at: DateTime<Utc>,
    /// Some in-play feed has succeeded
    pub live_ready: bool,
    /// Some European fixtures feed has succeeded
    pub fixtures_ready: bool,
    /// Some Indian-league fixtures feed has succeeded
    pub indian_ready: bool,
    pub keys: Vec<HealthEntry>,
}
