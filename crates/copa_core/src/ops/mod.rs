//! Write-side operations.
//!
//! Every mutation is split in two: a pure planner that validates the
//! request against the current snapshot and returns an explicit record of
//! the change, and an `apply_*` companion that folds that record into a
//! snapshot. Planners run every precondition before building anything, so
//! a rejected request leaves no partial writes behind. Nothing here does
//! IO; callers persist the snapshot however they like.

use std::cmp::Ordering;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{NotFoundError, Result, StateError, ValidationError};
use crate::models::{Match, Player, PlayerMatchStat, Team, TournamentSnapshot};
use crate::rules::Ruleset;
use crate::schedule::SchedulePlan;

/// New team plus its full roster, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamRegistration {
    pub team: Team,
    pub players: Vec<Player>,
}

/// Validate and build a team registration.
///
/// Checks, in order: non-blank team name, name unused (trimmed,
/// case-insensitive), exact roster size, no blank player names.
pub fn register_team(
    snapshot: &TournamentSnapshot,
    name: &str,
    squad: &[String],
    rules: &Ruleset,
) -> Result<TeamRegistration> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::BlankTeamName.into());
    }
    if snapshot.team_by_name(name).is_some() {
        return Err(ValidationError::DuplicateTeamName { name: name.to_string() }.into());
    }
    if squad.len() != rules.squad_size {
        return Err(ValidationError::RosterSize {
            expected: rules.squad_size,
            actual: squad.len(),
        }
        .into());
    }
    if squad.iter().any(|player| player.trim().is_empty()) {
        return Err(ValidationError::BlankPlayerName.into());
    }

    let team = Team::new(name);
    let players = squad.iter().map(|player| Player::new(player.trim(), &team.id)).collect();
    log::debug!("registration built for team '{name}'");
    Ok(TeamRegistration { team, players })
}

pub fn apply_registration(snapshot: &mut TournamentSnapshot, registration: &TeamRegistration) {
    snapshot.teams.push(registration.team.clone());
    snapshot.players.extend(registration.players.iter().cloned());
}

/// One player's line in a submitted result sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerContribution {
    pub player_id: String,
    #[serde(default)]
    pub goals: u32,
    #[serde(default)]
    pub assists: u32,
}

/// A completed scoreline plus per-player contributions for one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultSheet {
    pub match_id: String,
    pub home_goals: u32,
    pub away_goals: u32,
    #[serde(default)]
    pub contributions: Vec<PlayerContribution>,
}

/// Counter increments for one team from one result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamDelta {
    pub team_id: String,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

/// Everything one recorded result changes: the match scoreline, one
/// counter delta per side, and the sparse stat rows to insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultDelta {
    pub match_id: String,
    pub home_goals: u32,
    pub away_goals: u32,
    pub home: TeamDelta,
    pub away: TeamDelta,
    pub stats: Vec<PlayerMatchStat>,
}

/// Validate a result sheet against the snapshot and compute its delta.
///
/// Checks, in order: the match exists, it has no result yet, then per
/// contribution line: the player exists, plays for one of the two sides,
/// and appears only once. Zero-contribution lines are legal and produce
/// no stat row.
pub fn record_result(snapshot: &TournamentSnapshot, sheet: &ResultSheet) -> Result<ResultDelta> {
    let fixture = snapshot
        .match_by_id(&sheet.match_id)
        .ok_or_else(|| NotFoundError::Match(sheet.match_id.clone()))?;
    if fixture.completed {
        return Err(StateError::MatchAlreadyCompleted { match_id: fixture.id.clone() }.into());
    }

    let mut seen: Vec<&str> = Vec::with_capacity(sheet.contributions.len());
    for line in &sheet.contributions {
        let player = snapshot
            .player(&line.player_id)
            .ok_or_else(|| NotFoundError::Player(line.player_id.clone()))?;
        if !fixture.involves(&player.team_id) {
            return Err(ValidationError::PlayerNotInMatch {
                player_id: player.id.clone(),
                match_id: fixture.id.clone(),
            }
            .into());
        }
        if seen.contains(&line.player_id.as_str()) {
            return Err(ValidationError::DuplicateContribution {
                player_id: line.player_id.clone(),
            }
            .into());
        }
        seen.push(&line.player_id);
    }

    let home = side_delta(&fixture.home, sheet.home_goals, sheet.away_goals);
    let away = side_delta(&fixture.away, sheet.away_goals, sheet.home_goals);
    let stats: Vec<PlayerMatchStat> = sheet
        .contributions
        .iter()
        .filter(|line| line.goals > 0 || line.assists > 0)
        .map(|line| PlayerMatchStat::new(&fixture.id, &line.player_id, line.goals, line.assists))
        .collect();

    log::debug!(
        "result delta for match {}: {}-{}, {} stat rows",
        fixture.id,
        sheet.home_goals,
        sheet.away_goals,
        stats.len()
    );
    Ok(ResultDelta {
        match_id: fixture.id.clone(),
        home_goals: sheet.home_goals,
        away_goals: sheet.away_goals,
        home,
        away,
        stats,
    })
}

/// W/D/L and goal increments for one side, seen from that side.
fn side_delta(team_id: &str, scored: u32, conceded: u32) -> TeamDelta {
    let mut delta = TeamDelta {
        team_id: team_id.to_string(),
        goals_for: scored,
        goals_against: conceded,
        ..TeamDelta::default()
    };
    match scored.cmp(&conceded) {
        Ordering::Greater => delta.wins = 1,
        Ordering::Equal => delta.draws = 1,
        Ordering::Less => delta.losses = 1,
    }
    delta
}

/// Fold a result delta into the snapshot it was computed from.
///
/// Every id is resolved and the pending check re-run before the first
/// write, so a delta that no longer fits the snapshot changes nothing.
pub fn apply_result(snapshot: &mut TournamentSnapshot, delta: &ResultDelta) -> Result<()> {
    let match_idx = snapshot
        .matches
        .iter()
        .position(|m| m.id == delta.match_id)
        .ok_or_else(|| NotFoundError::Match(delta.match_id.clone()))?;
    let home_idx = snapshot
        .teams
        .iter()
        .position(|t| t.id == delta.home.team_id)
        .ok_or_else(|| NotFoundError::Team(delta.home.team_id.clone()))?;
    let away_idx = snapshot
        .teams
        .iter()
        .position(|t| t.id == delta.away.team_id)
        .ok_or_else(|| NotFoundError::Team(delta.away.team_id.clone()))?;
    if snapshot.matches[match_idx].completed {
        return Err(StateError::MatchAlreadyCompleted { match_id: delta.match_id.clone() }.into());
    }

    let fixture = &mut snapshot.matches[match_idx];
    fixture.home_goals = delta.home_goals;
    fixture.away_goals = delta.away_goals;
    fixture.completed = true;
    apply_team_delta(&mut snapshot.teams[home_idx], &delta.home);
    apply_team_delta(&mut snapshot.teams[away_idx], &delta.away);
    snapshot.stats.extend(delta.stats.iter().cloned());
    Ok(())
}

fn apply_team_delta(team: &mut Team, delta: &TeamDelta) {
    team.wins += delta.wins;
    team.draws += delta.draws;
    team.losses += delta.losses;
    team.goals_for += delta.goals_for;
    team.goals_against += delta.goals_against;
}

/// Install a schedule plan: superseded matches and stranded stats go,
/// fresh fixtures come in.
pub fn apply_schedule(snapshot: &mut TournamentSnapshot, plan: &SchedulePlan) {
    snapshot.matches.retain(|m| !plan.discard_matches.contains(&m.id));
    snapshot.stats.retain(|s| !plan.discard_stats.contains(&s.id));
    snapshot.matches.extend(plan.fixtures.iter().cloned());
}

/// Add a planned final to the fixture list.
pub fn apply_final(snapshot: &mut TournamentSnapshot, final_match: &Match) {
    snapshot.matches.push(final_match.clone());
}

/// What a tournament reset removes and rewinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPlan {
    pub delete_matches: Vec<String>,
    pub delete_stats: Vec<String>,
    /// Teams whose cumulative counters go back to zero.
    pub reset_teams: Vec<String>,
}

/// Plan a reset: all matches and stats deleted, every team counter zeroed,
/// teams and players kept. Resetting an untouched snapshot is a no-op.
pub fn plan_reset(snapshot: &TournamentSnapshot) -> ResetPlan {
    ResetPlan {
        delete_matches: snapshot.matches.iter().map(|m| m.id.clone()).collect(),
        delete_stats: snapshot.stats.iter().map(|s| s.id.clone()).collect(),
        reset_teams: snapshot.teams.iter().map(|t| t.id.clone()).collect(),
    }
}

pub fn apply_reset(snapshot: &mut TournamentSnapshot, plan: &ResetPlan) {
    snapshot.matches.retain(|m| !plan.delete_matches.contains(&m.id));
    snapshot.stats.retain(|s| !plan.delete_stats.contains(&s.id));
    for team in &mut snapshot.teams {
        if plan.reset_teams.contains(&team.id) {
            team.reset_counters();
        }
    }
}
