//! Case-insensitive substring search over the catalog and cached data

use feed_core::{LeagueScope, Match, ScorerRow, StandingsRow, TeamSide};
use std::collections::HashSet;

use crate::responses::{LeagueSummary, SearchResults, TeamHit};

pub const MIN_QUERY_LEN: usize = 2;

const MAX_LEAGUES: usize = 5;
const MAX_TEAMS: usize = 10;
const MAX_PLAYERS: usize = 10;
const MAX_MATCHES: usize = 15;

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn side_matches(side: &TeamSide, needle: &str) -> bool {
    contains(&side.name, needle) || contains(&side.short_name, needle)
}

/// Search `query` (already trimmed and validated) across everything passed in.
///
/// Teams found in tables come before teams found only in fixtures. Matches
/// list in-play games first, then by kickoff.
pub fn search(
    query: &str,
    standings: &[StandingsRow],
    scorers: &[ScorerRow],
    matches: &[Match],
) -> SearchResults {
    let needle = query.to_lowercase();

    let leagues: Vec<LeagueSummary> = LeagueScope::ALL
        .iter()
        .copied()
        .filter(|scope| {
            let info = scope.info();
            contains(info.name, &needle)
                || contains(info.slug, &needle)
                || contains(info.short, &needle)
                || contains(info.country, &needle)
        })
        .map(LeagueSummary::from)
        .collect();

    let mut seen_teams = HashSet::new();
    let mut teams = Vec::new();
    for row in standings.iter().filter(|row| side_matches(&row.team, &needle)) {
        if seen_teams.insert(row.team.name.to_lowercase()) {
            teams.push(TeamHit {
                source: row.source,
                team_id: row.team.team_id,
                name: row.team.name.clone(),
                short_name: row.team.short_name.clone(),
                crest_url: row.team.crest_url.clone(),
                league: row.league,
                position: Some(row.position),
                points: Some(row.points),
            });
        }
    }
    for m in matches {
        for side in [&m.home, &m.away] {
            if side_matches(side, &needle) && seen_teams.insert(side.name.to_lowercase()) {
                teams.push(TeamHit {
                    source: m.source,
                    team_id: side.team_id,
                    name: side.name.clone(),
                    short_name: side.short_name.clone(),
                    crest_url: side.crest_url.clone(),
                    league: m.league,
                    position: None,
                    points: None,
                });
            }
        }
    }

    let mut seen_players = HashSet::new();
    let players: Vec<ScorerRow> = scorers
        .iter()
        .filter(|row| contains(&row.name, &needle))
        .filter(|row| seen_players.insert((row.source, row.player_id, row.league)))
        .cloned()
        .collect();

    let mut seen_matches = HashSet::new();
    let mut found: Vec<&Match> = matches
        .iter()
        .filter(|m| side_matches(&m.home, &needle) || side_matches(&m.away, &needle))
        .filter(|m| seen_matches.insert(m.match_ref()))
        .collect();
    found.sort_by(|a, b| {
        b.status
            .is_in_play()
            .cmp(&a.status.is_in_play())
            .then(a.kickoff.cmp(&b.kickoff))
    });

    let total = leagues.len() + teams.len() + players.len() + found.len();
    SearchResults {
        query: query.to_string(),
        leagues: leagues.into_iter().take(MAX_LEAGUES).collect(),
        teams: teams.into_iter().take(MAX_TEAMS).collect(),
        players: players.into_iter().take(MAX_PLAYERS).collect(),
        matches: found.into_iter().take(MAX_MATCHES).cloned().collect(),
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{at, fixture, live, result, scorer, standings_row};
    use feed_core::{MatchStatus, SourceId};

    #[test]
    fn test_league_search_by_country_and_short_name() {
        let results = search("india", &[], &[], &[]);
        let slugs: Vec<LeagueScope> = results.leagues.iter().map(|l| l.slug).collect();
        assert!(slugs.contains(&LeagueScope::Isl));
        assert!(slugs.contains(&LeagueScope::Ifl));

        let results = search("epl", &[], &[], &[]);
        assert_eq!(results.leagues[0].slug, LeagueScope::PremierLeague);
    }

    #[test]
    fn test_team_hits_prefer_table_rows_and_dedupe() {
        let table = vec![standings_row(LeagueScope::PremierLeague, 3, 57, "Team 57", 40)];
        let matches = vec![
            fixture(1, LeagueScope::PremierLeague, at(2), (57, 58)),
            fixture(2, LeagueScope::PremierLeague, at(3), (59, 57)),
        ];

        let results = search("team 5", &table, &[], &matches);
        let names: Vec<&str> = results.teams.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Team 57", "Team 58", "Team 59"]);
        assert_eq!(results.teams[0].points, Some(40));
        assert_eq!(results.teams[1].position, None);
    }

    #[test]
    fn test_match_hits_list_live_first() {
        let matches = vec![
            fixture(1, LeagueScope::LaLiga, at(1), (81, 86)),
            result(2, LeagueScope::LaLiga, at(-3), (86, 90), (2, 1)),
            live(3, LeagueScope::LaLiga, at(0), (92, 86), MatchStatus::Halftime),
            // Same match seen again through another cache
            fixture(1, LeagueScope::LaLiga, at(1), (81, 86)),
        ];

        let results = search("team 86", &[], &[], &matches);
        let ids: Vec<i64> = results.matches.iter().map(|m| m.match_id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_player_search() {
        let scorers = vec![
            scorer(LeagueScope::PremierLeague, 1, "Erling Haaland", 20),
            scorer(LeagueScope::ChampionsLeague, 1, "Erling Haaland", 8),
            scorer(LeagueScope::PremierLeague, 2, "Mohamed Salah", 18),
        ];
        let results = search("haaland", &[], &scorers, &[]);
        assert_eq!(results.players.len(), 2);
        assert!(results.players.iter().all(|p| p.source == SourceId::FootballData));
        assert_eq!(results.total, 2);
    }
}
