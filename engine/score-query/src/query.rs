use feed_cache::{CacheEntry, CacheKey, CacheStore, HealthEntry};
use feed_core::{
    Clock, DataType, LeagueScope, Match, MatchRef, ScorerRow, SourceId, StandingsRow, TeamRef,
};
use std::sync::Arc;
use tracing::debug;

use crate::error::{QueryError, QueryResult};
use crate::filters;
use crate::responses::{
    HealthReport, HealthStatus, LeagueFixtures, LeagueOverview, LeagueSummary, SearchResults,
};
use crate::search::{self, MIN_QUERY_LEN};
use crate::standings::derive_table;

pub const DEFAULT_UPCOMING_LIMIT: usize = 50;
pub const DEFAULT_RECENT_LIMIT: usize = 40;
pub const DEFAULT_LEAGUE_LIST_LIMIT: usize = 20;
pub const MAX_LIMIT: usize = 200;
pub const OVERVIEW_LIST_LIMIT: usize = 20;
pub const DEFAULT_NEXT_LIMIT: usize = 5;
pub const MAX_NEXT_LIMIT: usize = 10;
pub const DEFAULT_H2H_LIMIT: usize = 5;

/// Read-only view over the feed cache.
///
/// Every method reads whatever is cached right now, stale or not. Nothing
/// here ever triggers a fetch; a key that was never refreshed reads as empty.
#[derive(Clone)]
pub struct ScoreQuery {
    cache: Arc<CacheStore>,
    clock: Arc<dyn Clock>,
}

impl ScoreQuery {
    pub fn new(cache: Arc<CacheStore>, clock: Arc<dyn Clock>) -> Self {
        Self { cache, clock }
    }

    /// Raw entry for one key
    pub fn entry(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.cache.get(key)
    }

    /// In-play matches, optionally for one league
    pub fn live(&self, league: Option<&str>) -> QueryResult<Vec<Match>> {
        let scopes = scopes_for(league)?;
        let matches = self.live_matches(&scopes);
        Ok(filters::in_play(&matches).into_iter().cloned().collect())
    }

    pub fn upcoming(&self, league: Option<&str>, limit: Option<usize>) -> QueryResult<Vec<Match>> {
        let limit = check_limit(limit, DEFAULT_UPCOMING_LIMIT, MAX_LIMIT)?;
        let matches = self.fixture_matches(&scopes_for(league)?);
        Ok(take(filters::upcoming(&matches, self.clock.now()), limit))
    }

    pub fn recent(&self, league: Option<&str>, limit: Option<usize>) -> QueryResult<Vec<Match>> {
        let limit = check_limit(limit, DEFAULT_RECENT_LIMIT, MAX_LIMIT)?;
        let matches = self.fixture_matches(&scopes_for(league)?);
        Ok(take(filters::recent(&matches, self.clock.now()), limit))
    }

    pub fn leagues(&self) -> Vec<LeagueSummary> {
        LeagueScope::ALL.iter().copied().map(LeagueSummary::from).collect()
    }

    pub fn league_overview(&self, slug: &str) -> QueryResult<LeagueOverview> {
        let scope: LeagueScope = slug.parse()?;
        let now = self.clock.now();
        let matches = self.fixture_matches(&[scope]);

        Ok(LeagueOverview {
            league: LeagueSummary::from(scope),
            live: self.live(Some(slug))?,
            upcoming: take(
                filters::dedup_fixtures(filters::upcoming(&matches, now)),
                OVERVIEW_LIST_LIMIT,
            ),
            recent: take(
                filters::dedup_fixtures(filters::recent(&matches, now)),
                OVERVIEW_LIST_LIMIT,
            ),
            standings: self.table_for(scope),
            scorers: self.scorers_for(scope),
        })
    }

    /// League table; derived from results when the provider has none
    pub fn standings(&self, slug: &str) -> QueryResult<Vec<StandingsRow>> {
        Ok(self.table_for(slug.parse()?))
    }

    pub fn scorers(&self, slug: &str) -> QueryResult<Vec<ScorerRow>> {
        Ok(self.scorers_for(slug.parse()?))
    }

    /// Live and upcoming matches for one league
    pub fn fixtures(&self, slug: &str, limit: Option<usize>) -> QueryResult<LeagueFixtures> {
        let scope: LeagueScope = slug.parse()?;
        let limit = check_limit(limit, DEFAULT_LEAGUE_LIST_LIMIT, MAX_LIMIT)?;
        let matches = self.fixture_matches(&[scope]);
        let upcoming = filters::dedup_fixtures(filters::upcoming(&matches, self.clock.now()));

        Ok(LeagueFixtures { live: self.live(Some(slug))?, upcoming: take(upcoming, limit) })
    }

    /// Recent results for one league
    pub fn results(&self, slug: &str, limit: Option<usize>) -> QueryResult<Vec<Match>> {
        let scope: LeagueScope = slug.parse()?;
        let limit = check_limit(limit, DEFAULT_LEAGUE_LIST_LIMIT, MAX_LIMIT)?;
        let matches = self.fixture_matches(&[scope]);
        Ok(take(filters::dedup_fixtures(filters::recent(&matches, self.clock.now())), limit))
    }

    /// One match, looked up in its provider's live feed first, then fixtures
    pub fn match_by_id(&self, match_ref: MatchRef) -> QueryResult<Match> {
        [DataType::Live, DataType::Fixtures]
            .into_iter()
            .flat_map(|data_type| self.cache.entries_for(match_ref.source, data_type))
            .find_map(|entry| {
                entry
                    .records()
                    .iter()
                    .filter_map(|record| record.as_match())
                    .find(|m| m.match_id == match_ref.id)
                    .cloned()
            })
            .ok_or(QueryError::MatchNotFound(match_ref))
    }

    /// Earlier meetings of the two teams in `match_ref`, from the same provider
    pub fn head_to_head(
        &self,
        match_ref: MatchRef,
        limit: Option<usize>,
    ) -> QueryResult<Vec<Match>> {
        let limit = check_limit(limit, DEFAULT_H2H_LIMIT, MAX_LIMIT)?;
        let fixture = self.match_by_id(match_ref)?;
        let history = self.provider_matches(match_ref.source, DataType::Fixtures);
        Ok(take(filters::head_to_head(&history, &fixture, limit), limit))
    }

    /// Last five finished matches of a team in one league.
    ///
    /// The team id is read in the ID-space of the league's fixtures provider;
    /// naming a different provider is rejected.
    pub fn team_form(
        &self,
        team_id: i64,
        league: &str,
        source: Option<SourceId>,
    ) -> QueryResult<Vec<Match>> {
        let scope: LeagueScope = league.parse()?;
        let provider = scope.fixtures_source();
        if let Some(source) = source {
            if source != provider {
                return Err(QueryError::UnknownIdentifierScope(format!(
                    "{scope} fixtures come from {provider}, not {source}"
                )));
            }
        }

        let team = TeamRef { source: provider, id: team_id };
        let matches = self.fixture_matches(&[scope]);
        Ok(filters::team_form(&matches, &team, scope).into_iter().cloned().collect())
    }

    /// Next matches of a team across every league its provider covers
    pub fn team_next(
        &self,
        team: TeamRef,
        league: Option<&str>,
        limit: Option<usize>,
    ) -> QueryResult<Vec<Match>> {
        let limit = check_limit(limit, DEFAULT_NEXT_LIMIT, MAX_NEXT_LIMIT)?;
        let matches = match league {
            Some(slug) => {
                let scope: LeagueScope = slug.parse()?;
                if scope.fixtures_source() != team.source {
                    return Err(QueryError::UnknownIdentifierScope(format!(
                        "{} does not serve {scope}",
                        team.source
                    )));
                }
                self.fixture_matches(&[scope])
            }
            None => self.provider_matches(team.source, DataType::Fixtures),
        };
        let next = filters::team_next(&matches, &team, self.clock.now(), limit);
        Ok(next.into_iter().cloned().collect())
    }

    pub fn search(&self, query: &str) -> QueryResult<SearchResults> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            return Err(QueryError::InvalidQuery(format!(
                "query must be at least {MIN_QUERY_LEN} characters"
            )));
        }

        let standings: Vec<StandingsRow> =
            LeagueScope::ALL.iter().flat_map(|scope| self.table_for(*scope)).collect();
        let scorers: Vec<ScorerRow> =
            LeagueScope::ALL.iter().flat_map(|scope| self.scorers_for(*scope)).collect();
        let mut matches = self.live_matches(&LeagueScope::ALL);
        matches.extend(self.fixture_matches(&LeagueScope::ALL));

        Ok(search::search(query, &standings, &scorers, &matches))
    }

    pub fn health(&self) -> HealthReport {
        let now = self.clock.now();
        let keys = self.cache.health(now);

        let live_ready = any_succeeded(&keys, |key| key.data_type == DataType::Live);
        let fixtures_ready = any_succeeded(&keys, |key| {
            key.data_type == DataType::Fixtures && key.source == SourceId::FootballData
        });
        let indian_ready = any_succeeded(&keys, |key| {
            key.data_type == DataType::Fixtures
                && matches!(key.league, LeagueScope::Isl | LeagueScope::Ifl)
        });
        let status = if any_succeeded(&keys, |_| true) {
            HealthStatus::Healthy
        } else {
            HealthStatus::WarmingUp
        };

        HealthReport { status, generated_at: now, live_ready, fixtures_ready, indian_ready, keys }
    }

    fn matches_at(&self, key: CacheKey) -> Vec<Match> {
        match self.cache.get(&key) {
            Some(entry) => entry.records().iter().filter_map(|r| r.as_match()).cloned().collect(),
            None => {
                debug!("No cached data for {}", key);
                Vec::new()
            }
        }
    }

    fn fixture_matches(&self, scopes: &[LeagueScope]) -> Vec<Match> {
        scopes
            .iter()
            .flat_map(|scope| {
                self.matches_at(CacheKey::new(scope.fixtures_source(), DataType::Fixtures, *scope))
            })
            .collect()
    }

    fn live_matches(&self, scopes: &[LeagueScope]) -> Vec<Match> {
        scopes
            .iter()
            .filter_map(|scope| scope.live_source().map(|source| (source, *scope)))
            .flat_map(|(source, scope)| {
                self.matches_at(CacheKey::new(source, DataType::Live, scope))
            })
            .collect()
    }

    fn provider_matches(&self, source: SourceId, data_type: DataType) -> Vec<Match> {
        self.cache
            .entries_for(source, data_type)
            .iter()
            .flat_map(|entry| entry.records().iter().filter_map(|r| r.as_match()).cloned())
            .collect()
    }

    fn table_for(&self, scope: LeagueScope) -> Vec<StandingsRow> {
        let source = scope.fixtures_source();
        if !source.serves(DataType::Standings) {
            return derive_table(source, scope, &self.fixture_matches(&[scope]));
        }
        let mut rows: Vec<StandingsRow> = self
            .cache
            .get(&CacheKey::new(source, DataType::Standings, scope))
            .map(|entry| {
                entry.records().iter().filter_map(|r| r.as_standings_row()).cloned().collect()
            })
            .unwrap_or_default();
        rows.sort_by_key(|row| row.position);
        rows
    }

    fn scorers_for(&self, scope: LeagueScope) -> Vec<ScorerRow> {
        let source = scope.fixtures_source();
        if !source.serves(DataType::Scorers) {
            return Vec::new();
        }
        self.cache
            .get(&CacheKey::new(source, DataType::Scorers, scope))
            .map(|entry| {
                entry.records().iter().filter_map(|r| r.as_scorer_row()).cloned().collect()
            })
            .unwrap_or_default()
    }
}

fn scopes_for(league: Option<&str>) -> QueryResult<Vec<LeagueScope>> {
    match league {
        Some(slug) => Ok(vec![slug.parse()?]),
        None => Ok(LeagueScope::ALL.to_vec()),
    }
}

fn check_limit(limit: Option<usize>, default: usize, max: usize) -> QueryResult<usize> {
    match limit {
        None => Ok(default),
        Some(n) if (1..=max).contains(&n) => Ok(n),
        Some(n) => {
            Err(QueryError::InvalidQuery(format!("limit must be between 1 and {max}, got {n}")))
        }
    }
}

fn any_succeeded(keys: &[HealthEntry], predicate: impl Fn(&CacheKey) -> bool) -> bool {
    keys.iter().any(|entry| entry.last_success_at.is_some() && predicate(&entry.key))
}

fn take(matches: Vec<&Match>, limit: usize) -> Vec<Match> {
    matches.into_iter().take(limit).cloned().collect()
}
