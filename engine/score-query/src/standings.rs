//! League tables derived from results, for providers that publish fixtures only

use feed_core::{LeagueScope, Match, SourceId, StandingsRow, TeamSide};
use std::collections::HashMap;

const POINTS_FOR_WIN: u32 = 3;
const POINTS_FOR_DRAW: u32 = 1;
const FORM_RESULTS: usize = 5;

/// Build a table from every finished match with a full-time score.
///
/// Sorted by points, goal difference, then goals scored; remaining ties fall
/// back to team name so the order is stable. Form lists the last five
/// results, oldest first.
pub fn derive_table<'a>(
    source: SourceId,
    league: LeagueScope,
    matches: impl IntoIterator<Item = &'a Match>,
) -> Vec<StandingsRow> {
    let mut played: Vec<&Match> = matches
        .into_iter()
        .filter(|m| m.league == league && m.status.is_finished())
        .filter(|m| m.score.home.is_some() && m.score.away.is_some())
        .collect();
    played.sort_by(|a, b| a.kickoff.cmp(&b.kickoff).then(a.match_id.cmp(&b.match_id)));

    let mut table: HashMap<String, StandingsRow> = HashMap::new();
    for m in played {
        let (Some(home_goals), Some(away_goals)) = (m.score.home, m.score.away) else {
            continue;
        };
        record(&mut table, source, league, &m.home, home_goals, away_goals);
        record(&mut table, source, league, &m.away, away_goals, home_goals);
    }

    let mut rows: Vec<StandingsRow> = table.into_values().collect();
    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.goal_difference.cmp(&a.goal_difference))
            .then(b.goals_for.cmp(&a.goals_for))
            .then(a.team.name.cmp(&b.team.name))
    });
    for (index, row) in rows.iter_mut().enumerate() {
        row.position = index as u32 + 1;
        let skip = row.form.len().saturating_sub(FORM_RESULTS);
        row.form.drain(..skip);
    }
    rows
}

fn record(
    table: &mut HashMap<String, StandingsRow>,
    source: SourceId,
    league: LeagueScope,
    team: &TeamSide,
    scored: u32,
    conceded: u32,
) {
    let row = table.entry(team_key(team)).or_insert_with(|| StandingsRow {
        source,
        league,
        position: 0,
        team: team.clone(),
        played: 0,
        won: 0,
        drawn: 0,
        lost: 0,
        goals_for: 0,
        goals_against: 0,
        goal_difference: 0,
        points: 0,
        form: Vec::new(),
    });

    row.played += 1;
    row.goals_for += scored;
    row.goals_against += conceded;
    row.goal_difference = row.goals_for as i32 - row.goals_against as i32;
    let outcome = if scored > conceded {
        row.won += 1;
        row.points += POINTS_FOR_WIN;
        "W"
    } else if scored < conceded {
        row.lost += 1;
        "L"
    } else {
        row.drawn += 1;
        row.points += POINTS_FOR_DRAW;
        "D"
    };
    row.form.push(outcome.to_string());
}

/// Providers that publish names only are keyed by name
fn team_key(team: &TeamSide) -> String {
    match team.team_id {
        Some(id) => format!("id:{id}"),
        None => format!("name:{}", team.name.to_lowercase()),
    }
}
