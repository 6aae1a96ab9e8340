//! Team ranking table.
//!
//! The table is derived on every call by scanning completed matches;
//! stored team counters are never consulted here, so a corrupted counter
//! cannot corrupt the ranking. Sort order is points, then goal difference,
//! then goals for, all descending. The sort is stable, so teams level on
//! all three keys keep snapshot registration order.

use std::cmp::Ordering;

use fxhash::FxHashMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::TournamentSnapshot;
use crate::rules::Ruleset;

/// Which completed matches feed the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StandingsScope {
    /// Every completed match, the final included.
    All,
    /// Completed round-robin matches only. Finalist selection uses this
    /// scope so the final cannot feed back into seeding.
    RoundRobin,
}

/// One ranked row. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StandingRow {
    pub team_id: String,
    pub team_name: String,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i64,
    pub points: u32,
}

/// Rank all registered teams from the snapshot's completed matches.
///
/// Teams without a completed match rank with all-zero rows. Matches
/// referencing unregistered teams contribute nothing; the audit reports
/// them separately.
pub fn compute_standings(
    snapshot: &TournamentSnapshot,
    scope: StandingsScope,
    rules: &Ruleset,
) -> Vec<StandingRow> {
    let mut rows: Vec<StandingRow> = snapshot
        .teams
        .iter()
        .map(|team| StandingRow {
            team_id: team.id.clone(),
            team_name: team.name.clone(),
            played: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
            points: 0,
        })
        .collect();

    let index: FxHashMap<&str, usize> =
        snapshot.teams.iter().enumerate().map(|(i, team)| (team.id.as_str(), i)).collect();

    for fixture in &snapshot.matches {
        if !fixture.completed {
            continue;
        }
        if scope == StandingsScope::RoundRobin && fixture.is_final {
            continue;
        }
        credit(&mut rows, &index, &fixture.home, fixture.home_goals, fixture.away_goals);
        credit(&mut rows, &index, &fixture.away, fixture.away_goals, fixture.home_goals);
    }

    for row in &mut rows {
        row.goal_difference = i64::from(row.goals_for) - i64::from(row.goals_against);
        row.points = rules.points(row.wins, row.draws);
    }

    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| b.goal_difference.cmp(&a.goal_difference))
            .then_with(|| b.goals_for.cmp(&a.goals_for))
    });
    rows
}

/// Credit one completed match to one side, seen from that side.
fn credit(
    rows: &mut [StandingRow],
    index: &FxHashMap<&str, usize>,
    team_id: &str,
    scored: u32,
    conceded: u32,
) {
    let Some(&i) = index.get(team_id) else {
        return;
    };
    let row = &mut rows[i];
    row.played += 1;
    row.goals_for += scored;
    row.goals_against += conceded;
    match scored.cmp(&conceded) {
        Ordering::Greater => row.wins += 1,
        Ordering::Equal => row.draws += 1,
        Ordering::Less => row.losses += 1,
    }
}
