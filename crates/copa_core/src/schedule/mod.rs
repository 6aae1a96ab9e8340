//! Fixture planning: round-robin generation, the finalist gate, and the
//! one-off final.
//!
//! Planning never mutates a snapshot. Each planner returns the records to
//! create (and for regeneration, the ids to discard) and the caller applies
//! them through [`crate::ops`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StateError, ValidationError};
use crate::models::{Match, TournamentSnapshot};
use crate::rules::Ruleset;
use crate::standings::{compute_standings, StandingsScope};

/// Unordered team pairs in nested `i < j` order, the earlier team at home.
pub fn round_robin_pairs(team_ids: &[String]) -> Vec<(String, String)> {
    let n = team_ids.len();
    let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            pairs.push((team_ids[i].clone(), team_ids[j].clone()));
        }
    }
    pairs
}

/// Replacement fixture list plus everything the caller must discard first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePlan {
    /// Ids of matches superseded by the new fixtures.
    pub discard_matches: Vec<String>,
    /// Ids of stat rows stranded by the discarded matches.
    pub discard_stats: Vec<String>,
    pub fixtures: Vec<Match>,
}

/// Plan a fresh single round robin over the registered teams.
///
/// Regeneration replaces the whole fixture list, so every existing match
/// and every stat row goes on the discard list; results do not survive a
/// reschedule.
pub fn plan_round_robin(snapshot: &TournamentSnapshot, rules: &Ruleset) -> Result<SchedulePlan> {
    if snapshot.teams.len() != rules.team_count {
        return Err(ValidationError::TeamCount {
            expected: rules.team_count,
            actual: snapshot.teams.len(),
        }
        .into());
    }

    let ids: Vec<String> = snapshot.teams.iter().map(|t| t.id.clone()).collect();
    let fixtures: Vec<Match> = round_robin_pairs(&ids)
        .into_iter()
        .map(|(home, away)| Match::round_robin(&home, &away))
        .collect();
    let discard_matches: Vec<String> = snapshot.matches.iter().map(|m| m.id.clone()).collect();
    let discard_stats: Vec<String> = snapshot.stats.iter().map(|s| s.id.clone()).collect();

    log::debug!(
        "planned round robin: {} fixtures, discarding {} matches / {} stat rows",
        fixtures.len(),
        discard_matches.len(),
        discard_stats.len()
    );
    Ok(SchedulePlan { discard_matches, discard_stats, fixtures })
}

/// The two teams entitled to contest the final.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinalistPair {
    /// Round-robin winner; takes the home slot of the final.
    pub home: String,
    pub away: String,
}

/// Gate report: how far the round robin has progressed and whether a final
/// may be created right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinalReadiness {
    /// Round-robin matches the format requires.
    pub expected: usize,
    pub scheduled: usize,
    pub completed: usize,
    pub final_exists: bool,
    /// Present exactly when the gate is open.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finalists: Option<FinalistPair>,
}

impl FinalReadiness {
    pub fn is_open(&self) -> bool {
        self.finalists.is_some()
    }
}

/// Evaluate the finalist gate. Open only when the full round robin is
/// scheduled and completed and no final exists yet; finalists are the top
/// two of the round-robin table.
pub fn final_readiness(snapshot: &TournamentSnapshot, rules: &Ruleset) -> FinalReadiness {
    let expected = rules.round_robin_match_count();
    let scheduled = snapshot.round_robin_matches().count();
    let completed = snapshot.completed_round_robin_count();
    let final_exists = snapshot.final_match().is_some();

    let open = scheduled == expected && completed == expected && !final_exists;
    let finalists = if open {
        let table = compute_standings(snapshot, StandingsScope::RoundRobin, rules);
        match (table.first(), table.get(1)) {
            (Some(first), Some(second)) => Some(FinalistPair {
                home: first.team_id.clone(),
                away: second.team_id.clone(),
            }),
            _ => None,
        }
    } else {
        None
    };

    FinalReadiness { expected, scheduled, completed, final_exists, finalists }
}

/// Plan the final between the round-robin top two.
///
/// An existing final is reported before completeness, so retrying the
/// operation on a finished tournament names the real obstacle.
pub fn plan_final(snapshot: &TournamentSnapshot, rules: &Ruleset) -> Result<Match> {
    if snapshot.final_match().is_some() {
        return Err(StateError::FinalAlreadyExists.into());
    }

    let readiness = final_readiness(snapshot, rules);
    match readiness.finalists {
        Some(pair) => {
            log::info!("final planned: {} (home) vs {}", pair.home, pair.away);
            Ok(Match::final_tie(&pair.home, &pair.away))
        }
        None => Err(ValidationError::RoundRobinIncomplete {
            completed: readiness.completed,
            expected: readiness.expected,
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::Team;

    fn team(id: &str, name: &str) -> Team {
        Team { id: id.to_string(), name: name.to_string(), ..Team::new("") }
    }

    fn result(home: &str, away: &str, home_goals: u32, away_goals: u32) -> Match {
        Match { home_goals, away_goals, completed: true, ..Match::round_robin(home, away) }
    }

    fn four_teams() -> Vec<Team> {
        vec![team("a", "Alba"), team("b", "Breda"), team("c", "Corte"), team("d", "Duno")]
    }

    fn finished_round_robin() -> TournamentSnapshot {
        TournamentSnapshot {
            teams: four_teams(),
            matches: vec![
                result("a", "b", 3, 1),
                result("c", "d", 1, 1),
                result("a", "c", 2, 0),
                result("b", "d", 2, 1),
                result("a", "d", 0, 0),
                result("b", "c", 1, 0),
            ],
            ..TournamentSnapshot::default()
        }
    }

    #[test]
    fn pairs_enumerate_each_pairing_once() {
        let ids: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        let pairs = round_robin_pairs(&ids);
        assert_eq!(pairs.len(), 6);
        assert_eq!(pairs[0], ("a".to_string(), "b".to_string()));
        assert_eq!(pairs[5], ("c".to_string(), "d".to_string()));
        // No pairing repeats in either orientation.
        for (i, (h1, a1)) in pairs.iter().enumerate() {
            for (h2, a2) in &pairs[i + 1..] {
                assert!(!(h1 == h2 && a1 == a2));
                assert!(!(h1 == a2 && a1 == h2));
            }
        }
    }

    #[test]
    fn plan_requires_exact_team_count() {
        let snapshot = TournamentSnapshot {
            teams: vec![team("a", "Alba"), team("b", "Breda")],
            ..TournamentSnapshot::default()
        };
        let err = plan_round_robin(&snapshot, &Ruleset::default()).unwrap_err();
        assert_eq!(err.code(), "TEAM_COUNT");
    }

    #[test]
    fn plan_produces_pending_fixtures_and_discards_history() {
        let snapshot = finished_round_robin();
        let plan = plan_round_robin(&snapshot, &Ruleset::default()).unwrap();
        assert_eq!(plan.fixtures.len(), 6);
        assert!(plan.fixtures.iter().all(|m| !m.completed && m.is_round_robin()));
        assert_eq!(plan.discard_matches.len(), 6);
    }

    #[test]
    fn gate_closed_while_matches_remain() {
        let mut snapshot = finished_round_robin();
        snapshot.matches[5].completed = false;
        let readiness = final_readiness(&snapshot, &Ruleset::default());
        assert!(!readiness.is_open());
        assert_eq!(readiness.completed, 5);
        assert_eq!(readiness.expected, 6);
    }

    #[test]
    fn gate_closed_when_schedule_is_short() {
        let mut snapshot = finished_round_robin();
        snapshot.matches.pop();
        let readiness = final_readiness(&snapshot, &Ruleset::default());
        assert!(!readiness.is_open());
        assert_eq!(readiness.scheduled, 5);
    }

    #[test]
    fn gate_closed_once_a_final_exists() {
        let mut snapshot = finished_round_robin();
        snapshot.matches.push(Match::final_tie("a", "b"));
        let readiness = final_readiness(&snapshot, &Ruleset::default());
        assert!(!readiness.is_open());
        assert!(readiness.final_exists);
    }

    #[test]
    fn open_gate_names_the_top_two() {
        let readiness = final_readiness(&finished_round_robin(), &Ruleset::default());
        assert!(readiness.is_open());
        let pair = readiness.finalists.unwrap();
        assert_eq!(pair.home, "a");
        assert_eq!(pair.away, "b");
    }

    #[test]
    fn planned_final_is_pending_with_leader_at_home() {
        let fixture = plan_final(&finished_round_robin(), &Ruleset::default()).unwrap();
        assert!(fixture.is_final);
        assert!(!fixture.completed);
        assert_eq!(fixture.home, "a");
        assert_eq!(fixture.away, "b");
    }

    #[test]
    fn incomplete_round_robin_blocks_the_final() {
        let mut snapshot = finished_round_robin();
        snapshot.matches[0].completed = false;
        let err = plan_final(&snapshot, &Ruleset::default()).unwrap_err();
        assert_eq!(err.code(), "ROUND_ROBIN_INCOMPLETE");
    }

    #[test]
    fn existing_final_wins_over_incompleteness() {
        // Both obstacles present: the state error must surface, not the
        // completeness one.
        let mut snapshot = finished_round_robin();
        snapshot.matches[0].completed = false;
        snapshot.matches.push(Match::final_tie("a", "b"));
        let err = plan_final(&snapshot, &Ruleset::default()).unwrap_err();
        assert!(matches!(err, EngineError::State(StateError::FinalAlreadyExists)));
    }
}
