//! Match filters
//!
//! Pure functions over borrowed matches. Each takes `now` explicitly so the
//! windows can be tested against fixed timestamps.

use chrono::{DateTime, Duration, Utc};
use feed_core::{LeagueScope, Match, MatchStatus, TeamRef};
use std::collections::HashSet;

/// How far back "recent" results reach
pub const RECENT_WINDOW_DAYS: i64 = 14;

/// Matches shown in a team's form guide
pub const FORM_LENGTH: usize = 5;

/// Not finished and kicking off at or after `now`, earliest first
pub fn upcoming<'a>(
    matches: impl IntoIterator<Item = &'a Match>,
    now: DateTime<Utc>,
) -> Vec<&'a Match> {
    let mut out: Vec<&Match> = matches
        .into_iter()
        .filter(|m| !m.status.is_finished() && m.kickoff >= now)
        .collect();
    sort_ascending(&mut out);
    out
}

/// Finished within the last [`RECENT_WINDOW_DAYS`], latest first
pub fn recent<'a>(
    matches: impl IntoIterator<Item = &'a Match>,
    now: DateTime<Utc>,
) -> Vec<&'a Match> {
    let since = now - Duration::days(RECENT_WINDOW_DAYS);
    let mut out: Vec<&Match> = matches
        .into_iter()
        .filter(|m| m.status.is_finished() && m.kickoff >= since && m.kickoff <= now)
        .collect();
    sort_descending(&mut out);
    out
}

/// In-play matches, earliest kickoff first
pub fn in_play<'a>(matches: impl IntoIterator<Item = &'a Match>) -> Vec<&'a Match> {
    let mut out: Vec<&Match> = matches.into_iter().filter(|m| m.status.is_in_play()).collect();
    sort_ascending(&mut out);
    out
}

/// Last [`FORM_LENGTH`] finished matches of `team` in `league`, latest first
pub fn team_form<'a>(
    matches: impl IntoIterator<Item = &'a Match>,
    team: &TeamRef,
    league: LeagueScope,
) -> Vec<&'a Match> {
    let mut out: Vec<&Match> = matches
        .into_iter()
        .filter(|m| m.league == league && m.status.is_finished() && m.involves(team))
        .collect();
    sort_descending(&mut out);
    out.truncate(FORM_LENGTH);
    out
}

/// Next `limit` not-yet-started matches of `team`, earliest first
pub fn team_next<'a>(
    matches: impl IntoIterator<Item = &'a Match>,
    team: &TeamRef,
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<&'a Match> {
    let mut out: Vec<&Match> = matches
        .into_iter()
        .filter(|m| m.status == MatchStatus::Scheduled && m.kickoff >= now && m.involves(team))
        .collect();
    sort_ascending(&mut out);
    out.truncate(limit);
    out
}

/// Earlier finished meetings between the two teams of `fixture`, latest first
pub fn head_to_head<'a>(
    matches: impl IntoIterator<Item = &'a Match>,
    fixture: &Match,
    limit: usize,
) -> Vec<&'a Match> {
    let mut out: Vec<&Match> = matches
        .into_iter()
        .filter(|m| {
            m.source == fixture.source
                && m.match_id != fixture.match_id
                && m.status.is_finished()
                && m.kickoff < fixture.kickoff
                && m.same_pairing(fixture)
        })
        .collect();
    sort_descending(&mut out);
    out.truncate(limit);
    out
}

/// Drop repeats of the same fixture, keeping the first occurrence.
///
/// Two records are the same fixture when kickoff and both team names match.
pub fn dedup_fixtures<'a>(matches: impl IntoIterator<Item = &'a Match>) -> Vec<&'a Match> {
    let mut seen = HashSet::new();
    matches
        .into_iter()
        .filter(|m| seen.insert((m.kickoff, m.home.name.as_str(), m.away.name.as_str())))
        .collect()
}

fn sort_ascending(matches: &mut [&Match]) {
    matches.sort_by(|a, b| a.kickoff.cmp(&b.kickoff).then(a.match_id.cmp(&b.match_id)));
}

fn sort_descending(matches: &mut [&Match]) {
    matches.sort_by(|a, b| b.kickoff.cmp(&a.kickoff).then(b.match_id.cmp(&a.match_id)));
}
