//! Score Query
//!
//! Read-only access to the feed cache for API front ends: live scores,
//! upcoming fixtures, recent results, tables, scorers, team form, search and
//! the freshness report. League slugs and provider-scoped identifiers are
//! validated here; everything else is a cache read plus filtering.

pub mod error;
pub mod filters;
pub mod ids;
pub mod query;
pub mod responses;
pub mod search;
pub mod standings;

pub use error::{QueryError, QueryResult};
pub use ids::{parse_match_ref, parse_source, parse_team_ref};
pub use query::{
    ScoreQuery, DEFAULT_H2H_LIMIT, DEFAULT_LEAGUE_LIST_LIMIT, DEFAULT_NEXT_LIMIT,
    DEFAULT_RECENT_LIMIT, DEFAULT_UPCOMING_LIMIT, MAX_LIMIT, MAX_NEXT_LIMIT,
};
pub use responses::{
    HealthReport, HealthStatus, LeagueFixtures, LeagueOverview, LeagueSummary, SearchResults,
    TeamHit,
};
