//! Snapshot invariant audit.
//!
//! Cross-checks the stored collections against the rules the operations
//! maintain: schedule shape, final uniqueness, referential integrity,
//! counter/derivation agreement and stat sparseness. A clean report means
//! the snapshot could have been produced by the engine's own operations.
//! The audit only reports; repairing a snapshot is the caller's business.

use fxhash::{FxHashMap, FxHashSet};
use schemars::JsonSchema;
use serde::Serialize;

use crate::models::TournamentSnapshot;
use crate::rules::Ruleset;
use crate::standings::{compute_standings, StandingsScope};

/// One named invariant check.
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditCheck {
    pub name: String,
    pub passed: bool,
}

/// Outcome of a full snapshot audit.
#[derive(Debug, Clone, Default, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub checks: Vec<AuditCheck>,
    /// One line per failed check, with the offending ids.
    pub violations: Vec<String>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    fn add_check(&mut self, name: &str, passed: bool, detail: impl FnOnce() -> String) {
        if !passed {
            let line = format!("{name}: {}", detail());
            log::warn!("audit violation - {line}");
            self.violations.push(line);
        }
        self.checks.push(AuditCheck { name: name.to_string(), passed });
    }
}

/// Run every invariant check against the snapshot.
pub fn audit_snapshot(snapshot: &TournamentSnapshot, rules: &Ruleset) -> AuditReport {
    let mut report = AuditReport::default();

    check_schedule_shape(snapshot, rules, &mut report);
    check_final_placement(snapshot, &mut report);
    check_match_references(snapshot, &mut report);
    check_pending_scorelines(snapshot, &mut report);
    check_team_counters(snapshot, rules, &mut report);
    check_stat_rows(snapshot, &mut report);
    check_conservation(snapshot, &mut report);

    log::debug!(
        "audit finished: {} checks, {} violations",
        report.checks.len(),
        report.violations.len()
    );
    report
}

/// The round robin is either absent or exactly the expected size, with no
/// pairing repeated and no team playing itself.
fn check_schedule_shape(snapshot: &TournamentSnapshot, rules: &Ruleset, report: &mut AuditReport) {
    let expected = rules.round_robin_match_count();
    let scheduled = snapshot.round_robin_matches().count();
    report.add_check("round_robin_size", scheduled == 0 || scheduled == expected, || {
        format!("{scheduled} round-robin matches scheduled, expected 0 or {expected}")
    });

    let self_matches: Vec<&str> = snapshot
        .matches
        .iter()
        .filter(|m| m.home == m.away)
        .map(|m| m.id.as_str())
        .collect();
    report.add_check("no_self_matches", self_matches.is_empty(), || self_matches.join(", "));

    let mut pairs: FxHashSet<(String, String)> = FxHashSet::default();
    let mut duplicates: Vec<&str> = Vec::new();
    for fixture in snapshot.round_robin_matches() {
        let key = if fixture.home <= fixture.away {
            (fixture.home.clone(), fixture.away.clone())
        } else {
            (fixture.away.clone(), fixture.home.clone())
        };
        if !pairs.insert(key) {
            duplicates.push(fixture.id.as_str());
        }
    }
    report.add_check("unique_pairings", duplicates.is_empty(), || duplicates.join(", "));
}

/// At most one final, and only after a finished round robin.
fn check_final_placement(snapshot: &TournamentSnapshot, report: &mut AuditReport) {
    let finals = snapshot.matches.iter().filter(|m| m.is_final).count();
    report.add_check("single_final", finals <= 1, || format!("{finals} finals present"));

    if finals > 0 {
        let pending: Vec<&str> = snapshot
            .round_robin_matches()
            .filter(|m| !m.completed)
            .map(|m| m.id.as_str())
            .collect();
        report.add_check("final_after_round_robin", pending.is_empty(), || {
            format!("final exists while matches are pending: {}", pending.join(", "))
        });
    }
}

/// Every match references two registered teams.
fn check_match_references(snapshot: &TournamentSnapshot, report: &mut AuditReport) {
    let mut dangling: Vec<String> = Vec::new();
    for fixture in &snapshot.matches {
        for side in [&fixture.home, &fixture.away] {
            if snapshot.team(side).is_none() {
                dangling.push(format!("{} -> {side}", fixture.id));
            }
        }
    }
    report.add_check("match_team_references", dangling.is_empty(), || dangling.join(", "));
}

/// Pending matches keep the 0-0 placeholder.
fn check_pending_scorelines(snapshot: &TournamentSnapshot, report: &mut AuditReport) {
    let dirty: Vec<&str> = snapshot
        .matches
        .iter()
        .filter(|m| !m.completed && (m.home_goals != 0 || m.away_goals != 0))
        .map(|m| m.id.as_str())
        .collect();
    report.add_check("pending_scorelines_blank", dirty.is_empty(), || dirty.join(", "));
}

/// Stored team counters agree with the table derived from completed
/// matches. One failed check per team keeps the violation lines readable.
fn check_team_counters(snapshot: &TournamentSnapshot, rules: &Ruleset, report: &mut AuditReport) {
    let derived = compute_standings(snapshot, StandingsScope::All, rules);
    let by_id: FxHashMap<&str, _> =
        derived.iter().map(|row| (row.team_id.as_str(), row)).collect();

    let mut mismatched: Vec<String> = Vec::new();
    for team in &snapshot.teams {
        let Some(row) = by_id.get(team.id.as_str()) else {
            continue;
        };
        let stored = (team.wins, team.draws, team.losses, team.goals_for, team.goals_against);
        let expected = (row.wins, row.draws, row.losses, row.goals_for, row.goals_against);
        if stored != expected {
            mismatched.push(format!("{}: stored {stored:?}, derived {expected:?}", team.id));
        }
    }
    report.add_check("team_counters_match_results", mismatched.is_empty(), || {
        mismatched.join("; ")
    });
}

/// Stat rows reference a completed match and an eligible player, carry at
/// least one contribution, and never repeat a (match, player) pair.
fn check_stat_rows(snapshot: &TournamentSnapshot, report: &mut AuditReport) {
    let mut orphaned: Vec<&str> = Vec::new();
    let mut premature: Vec<&str> = Vec::new();
    let mut ineligible: Vec<&str> = Vec::new();
    let mut empty: Vec<&str> = Vec::new();
    let mut repeated: Vec<&str> = Vec::new();
    let mut seen: FxHashSet<(&str, &str)> = FxHashSet::default();

    for stat in &snapshot.stats {
        match snapshot.match_by_id(&stat.match_id) {
            None => orphaned.push(stat.id.as_str()),
            Some(fixture) if !fixture.completed => premature.push(stat.id.as_str()),
            Some(fixture) => match snapshot.player(&stat.player_id) {
                None => orphaned.push(stat.id.as_str()),
                Some(player) if !fixture.involves(&player.team_id) => {
                    ineligible.push(stat.id.as_str())
                }
                Some(_) => {}
            },
        }
        if !stat.contributes() {
            empty.push(stat.id.as_str());
        }
        if !seen.insert((stat.match_id.as_str(), stat.player_id.as_str())) {
            repeated.push(stat.id.as_str());
        }
    }

    report.add_check("stat_references_resolve", orphaned.is_empty(), || orphaned.join(", "));
    report.add_check("stats_only_for_completed_matches", premature.is_empty(), || {
        premature.join(", ")
    });
    report.add_check("stat_players_eligible", ineligible.is_empty(), || ineligible.join(", "));
    report.add_check("stats_are_sparse", empty.is_empty(), || empty.join(", "));
    report.add_check("stat_rows_unique_per_player", repeated.is_empty(), || repeated.join(", "));
}

/// Aggregate bookkeeping identities over the stored counters.
fn check_conservation(snapshot: &TournamentSnapshot, report: &mut AuditReport) {
    let wins: u32 = snapshot.teams.iter().map(|t| t.wins).sum();
    let losses: u32 = snapshot.teams.iter().map(|t| t.losses).sum();
    let draws: u32 = snapshot.teams.iter().map(|t| t.draws).sum();
    let scored: u32 = snapshot.teams.iter().map(|t| t.goals_for).sum();
    let conceded: u32 = snapshot.teams.iter().map(|t| t.goals_against).sum();

    report.add_check("wins_balance_losses", wins == losses, || {
        format!("{wins} wins against {losses} losses")
    });
    report.add_check("draws_come_in_pairs", draws % 2 == 0, || format!("{draws} draw entries"));
    report.add_check("goals_balance", scored == conceded, || {
        format!("{scored} scored against {conceded} conceded")
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::demo_snapshot;
    use crate::models::{Match, PlayerMatchStat};

    fn clean_snapshot() -> TournamentSnapshot {
        demo_snapshot(11)
    }

    fn failed_names(report: &AuditReport) -> Vec<&str> {
        report.checks.iter().filter(|c| !c.passed).map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn engine_built_snapshot_audits_clean() {
        let report = audit_snapshot(&clean_snapshot(), &Ruleset::default());
        assert!(report.is_clean(), "unexpected violations: {:?}", report.violations);
        assert!(report.checks.iter().all(|c| c.passed));
    }

    #[test]
    fn tampered_counter_is_caught() {
        let mut snapshot = clean_snapshot();
        snapshot.teams[0].wins += 1;
        let report = audit_snapshot(&snapshot, &Ruleset::default());
        assert!(!report.is_clean());
        let failed = failed_names(&report);
        assert!(failed.contains(&"team_counters_match_results"));
        assert!(failed.contains(&"wins_balance_losses"));
    }

    #[test]
    fn duplicate_final_is_caught() {
        let mut snapshot = clean_snapshot();
        let (a, b) = (snapshot.teams[0].id.clone(), snapshot.teams[1].id.clone());
        snapshot.matches.push(Match::final_tie(&a, &b));
        snapshot.matches.push(Match::final_tie(&a, &b));
        let report = audit_snapshot(&snapshot, &Ruleset::default());
        assert!(failed_names(&report).contains(&"single_final"));
    }

    #[test]
    fn premature_final_is_caught() {
        let mut snapshot = clean_snapshot();
        snapshot.matches[0].completed = false;
        let (a, b) = (snapshot.teams[0].id.clone(), snapshot.teams[1].id.clone());
        snapshot.matches.push(Match::final_tie(&a, &b));
        let report = audit_snapshot(&snapshot, &Ruleset::default());
        assert!(failed_names(&report).contains(&"final_after_round_robin"));
    }

    #[test]
    fn dangling_match_reference_is_caught() {
        let mut snapshot = clean_snapshot();
        snapshot.matches[0].home = "ghost".to_string();
        let report = audit_snapshot(&snapshot, &Ruleset::default());
        assert!(failed_names(&report).contains(&"match_team_references"));
    }

    #[test]
    fn dirty_pending_scoreline_is_caught() {
        let mut snapshot = clean_snapshot();
        let (a, b) = (snapshot.teams[0].id.clone(), snapshot.teams[1].id.clone());
        snapshot.matches.push(Match { home_goals: 2, ..Match::final_tie(&a, &b) });
        let report = audit_snapshot(&snapshot, &Ruleset::default());
        assert!(failed_names(&report).contains(&"pending_scorelines_blank"));
    }

    #[test]
    fn orphaned_and_empty_stats_are_caught() {
        let mut snapshot = clean_snapshot();
        snapshot.stats.push(PlayerMatchStat::new("m-ghost", "p-ghost", 1, 0));
        let match_id = snapshot.matches[0].id.clone();
        let player_id = snapshot.players[0].id.clone();
        snapshot.stats.push(PlayerMatchStat::new(&match_id, &player_id, 0, 0));
        let report = audit_snapshot(&snapshot, &Ruleset::default());
        let failed = failed_names(&report);
        assert!(failed.contains(&"stat_references_resolve"));
        assert!(failed.contains(&"stats_are_sparse"));
    }

    #[test]
    fn duplicate_pairing_is_caught() {
        let mut snapshot = clean_snapshot();
        // Re-add the first pairing with the sides swapped.
        let first = snapshot.matches[0].clone();
        snapshot.matches.push(Match::round_robin(&first.away, &first.home));
        let report = audit_snapshot(&snapshot, &Ruleset::default());
        let failed = failed_names(&report);
        assert!(failed.contains(&"unique_pairings"));
        // The extra fixture also breaks the expected schedule size.
        assert!(failed.contains(&"round_robin_size"));
    }

    #[test]
    fn report_serializes_for_the_json_surface() {
        let report = audit_snapshot(&clean_snapshot(), &Ruleset::default());
        let raw = serde_json::to_string(&report).unwrap();
        assert!(raw.contains("\"checks\""));
        assert!(raw.contains("\"violations\""));
    }
}
