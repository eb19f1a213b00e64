//! Normalized records
//!
//! Provider-agnostic shapes every adapter maps its upstream into. Each record
//! carries the `source` it came from, and match/team identifiers are only
//! meaningful together with that source.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::league::LeagueScope;
use crate::source::SourceId;

/// Match lifecycle as reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Scheduled,
    Live,
    Halftime,
    Finished,
    Postponed,
    Cancelled,
}

impl MatchStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, MatchStatus::Finished)
    }

    pub fn is_in_play(&self) -> bool {
        matches!(self, MatchStatus::Live | MatchStatus::Halftime)
    }
}

/// One side of a fixture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSide {
    /// Provider-scoped team id; `None` when the provider publishes names only
    pub team_id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub crest_url: String,
}

/// Full-time and half-time goals, `None` until known
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreLine {
    pub home: Option<u32>,
    pub away: Option<u32>,
    #[serde(default)]
    pub home_ht: Option<u32>,
    #[serde(default)]
    pub away_ht: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub source: SourceId,
    pub match_id: i64,
    pub league: LeagueScope,
    pub home: TeamSide,
    pub away: TeamSide,
    #[serde(default)]
    pub score: ScoreLine,
    pub status: MatchStatus,
    #[serde(default)]
    pub minute: Option<u32>,
    pub kickoff: DateTime<Utc>,
    #[serde(default)]
    pub venue: String,
    #[serde(default)]
    pub round: String,
    #[serde(default)]
    pub referee: String,
}

impl Match {
    pub fn match_ref(&self) -> MatchRef {
        MatchRef { source: self.source, id: self.match_id }
    }

    /// Whether `team` (in this match's ID-space) played in this match
    pub fn involves(&self, team: &TeamRef) -> bool {
        team.source == self.source
            && (self.home.team_id == Some(team.id) || self.away.team_id == Some(team.id))
    }

    /// Whether both sides are the same two teams as `other`, in either order
    pub fn same_pairing(&self, other: &Match) -> bool {
        let ids = |m: &Match| (m.home.team_id, m.away.team_id);
        let (h, a) = ids(self);
        let (oh, oa) = ids(other);
        h.is_some() && a.is_some() && ((h == oh && a == oa) || (h == oa && a == oh))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub source: SourceId,
    pub league: LeagueScope,
    pub position: u32,
    pub team: TeamSide,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    pub points: u32,
    /// Last five results, oldest first, as "W" / "D" / "L"
    #[serde(default)]
    pub form: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorerRow {
    pub source: SourceId,
    pub league: LeagueScope,
    pub player_id: i64,
    pub name: String,
    #[serde(default)]
    pub nationality: String,
    #[serde(default)]
    pub position: String,
    pub team: TeamSide,
    pub goals: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub penalties: u32,
    #[serde(default)]
    pub played: u32,
}

/// Any record an adapter can return
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NormalizedRecord {
    Match(Match),
    StandingsRow(StandingsRow),
    ScorerRow(ScorerRow),
}

impl NormalizedRecord {
    pub fn source(&self) -> SourceId {
        match self {
            NormalizedRecord::Match(m) => m.source,
            NormalizedRecord::StandingsRow(row) => row.source,
            NormalizedRecord::ScorerRow(row) => row.source,
        }
    }

    pub fn league(&self) -> LeagueScope {
        match self {
            NormalizedRecord::Match(m) => m.league,
            NormalizedRecord::StandingsRow(row) => row.league,
            NormalizedRecord::ScorerRow(row) => row.league,
        }
    }

    pub fn as_match(&self) -> Option<&Match> {
        match self {
            NormalizedRecord::Match(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_standings_row(&self) -> Option<&StandingsRow> {
        match self {
            NormalizedRecord::StandingsRow(row) => Some(row),
            _ => None,
        }
    }

    pub fn as_scorer_row(&self) -> Option<&ScorerRow> {
        match self {
            NormalizedRecord::ScorerRow(row) => Some(row),
            _ => None,
        }
    }
}

/// A match id together with the provider that issued it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchRef {
    pub source: SourceId,
    pub id: i64,
}

/// A team id together with the provider that issued it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamRef {
    pub source: SourceId,
    pub id: i64,
}
