//! Player aggregation, the public leaderboard, and the award podium.
//!
//! All three views share one aggregation pass over the sparse stat rows.
//! Award ties resolve to the earliest-registered player after the named
//! tiebreak, and every award is withheld outright when its headline metric
//! never rose above zero.

use fxhash::FxHashMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::TournamentSnapshot;
use crate::rules::Ruleset;

/// Tournament totals for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerTotals {
    pub player_id: String,
    pub player_name: String,
    pub team_id: String,
    pub goals: u32,
    pub assists: u32,
    pub mvp_points: u32,
}

/// Award podium. Each slot stays empty until somebody actually earns it:
/// no MVP without a positive MVP score, no top scorer without a goal, no
/// top assister without an assist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Awards {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mvp: Option<PlayerTotals>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_scorer: Option<PlayerTotals>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_assister: Option<PlayerTotals>,
}

/// Fold every stat row into per-player totals.
///
/// Every registered player gets a row, zeroed if they never appear in the
/// stats; output keeps registration order. Stat rows for unregistered
/// players are skipped here and flagged by the audit.
pub fn aggregate_players(snapshot: &TournamentSnapshot, rules: &Ruleset) -> Vec<PlayerTotals> {
    let mut totals: Vec<PlayerTotals> = snapshot
        .players
        .iter()
        .map(|player| PlayerTotals {
            player_id: player.id.clone(),
            player_name: player.name.clone(),
            team_id: player.team_id.clone(),
            goals: 0,
            assists: 0,
            mvp_points: 0,
        })
        .collect();

    let index: FxHashMap<&str, usize> =
        snapshot.players.iter().enumerate().map(|(i, p)| (p.id.as_str(), i)).collect();

    for stat in &snapshot.stats {
        let Some(&i) = index.get(stat.player_id.as_str()) else {
            continue;
        };
        totals[i].goals += stat.goals;
        totals[i].assists += stat.assists;
    }

    for line in &mut totals {
        line.mvp_points = rules.mvp_points(line.goals, line.assists);
    }
    totals
}

/// The visible leaderboard: MVP points descending, goals as tiebreak,
/// contributors only, capped at the ruleset's leaderboard size.
pub fn leaderboard(snapshot: &TournamentSnapshot, rules: &Ruleset) -> Vec<PlayerTotals> {
    let mut totals = aggregate_players(snapshot, rules);
    totals.sort_by(|a, b| b.mvp_points.cmp(&a.mvp_points).then_with(|| b.goals.cmp(&a.goals)));
    totals.retain(|line| line.mvp_points > 0);
    totals.truncate(rules.leaderboard_size);
    totals
}

/// Pick the three podium awards from the full aggregation.
pub fn compute_awards(snapshot: &TournamentSnapshot, rules: &Ruleset) -> Awards {
    let totals = aggregate_players(snapshot, rules);
    Awards {
        mvp: top_by(&totals, |line| (line.mvp_points, line.goals)),
        top_scorer: top_by(&totals, |line| (line.goals, line.assists)),
        top_assister: top_by(&totals, |line| (line.assists, line.goals)),
    }
}

/// First player holding the strictly-greatest `(metric, tiebreak)` pair,
/// or `None` when the best metric is zero. Scanning forward and replacing
/// only on strict improvement keeps the earliest entrant on full ties.
fn top_by(
    totals: &[PlayerTotals],
    key: impl Fn(&PlayerTotals) -> (u32, u32),
) -> Option<PlayerTotals> {
    let mut best: Option<&PlayerTotals> = None;
    for line in totals {
        match best {
            Some(current) if key(line) <= key(current) => {}
            _ => best = Some(line),
        }
    }
    best.filter(|line| key(line).0 > 0).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Player, PlayerMatchStat, TournamentSnapshot};

    fn player(id: &str, name: &str) -> Player {
        Player { id: id.to_string(), name: name.to_string(), team_id: "t-1".to_string() }
    }

    fn stat(player_id: &str, goals: u32, assists: u32) -> PlayerMatchStat {
        PlayerMatchStat::new("m-1", player_id, goals, assists)
    }

    fn snapshot(players: Vec<Player>, stats: Vec<PlayerMatchStat>) -> TournamentSnapshot {
        TournamentSnapshot { players, stats, ..TournamentSnapshot::default() }
    }

    #[test]
    fn aggregation_covers_every_player_and_sums_across_matches() {
        let snapshot = snapshot(
            vec![player("p-1", "Ada"), player("p-2", "Bo")],
            vec![
                stat("p-1", 2, 1),
                PlayerMatchStat::new("m-2", "p-1", 1, 0),
            ],
        );
        let totals = aggregate_players(&snapshot, &Ruleset::default());
        assert_eq!(totals.len(), 2);
        assert_eq!((totals[0].goals, totals[0].assists, totals[0].mvp_points), (3, 1, 7));
        assert_eq!((totals[1].goals, totals[1].assists, totals[1].mvp_points), (0, 0, 0));
    }

    #[test]
    fn leaderboard_filters_zero_scores_and_caps_length() {
        let rules = Ruleset { leaderboard_size: 2, ..Ruleset::default() };
        let snapshot = snapshot(
            vec![player("p-1", "Ada"), player("p-2", "Bo"), player("p-3", "Cy"), player("p-4", "Idle")],
            vec![stat("p-1", 1, 0), stat("p-2", 3, 0), stat("p-3", 2, 0)],
        );
        let board = leaderboard(&snapshot, &rules);
        let ids: Vec<&str> = board.iter().map(|l| l.player_id.as_str()).collect();
        assert_eq!(ids, ["p-2", "p-3"]);
    }

    #[test]
    fn leaderboard_breaks_mvp_ties_on_goals() {
        // 5 points each: 2g+1a against 1g+3a. More goals ranks first.
        let snapshot = snapshot(
            vec![player("p-1", "Playmaker"), player("p-2", "Poacher")],
            vec![stat("p-1", 1, 3), stat("p-2", 2, 1)],
        );
        let board = leaderboard(&snapshot, &Ruleset::default());
        assert_eq!(board[0].player_id, "p-2");
        assert_eq!(board[0].mvp_points, board[1].mvp_points);
    }

    #[test]
    fn mvp_prefers_goals_then_registration_order() {
        let snapshot = snapshot(
            vec![player("p-1", "First"), player("p-2", "Second")],
            vec![stat("p-1", 1, 2), stat("p-2", 1, 2)],
        );
        // Dead heat on every key: earliest registration wins.
        let awards = compute_awards(&snapshot, &Ruleset::default());
        assert_eq!(awards.mvp.map(|l| l.player_id), Some("p-1".to_string()));
    }

    #[test]
    fn top_scorer_tie_resolved_by_assists() {
        let snapshot = snapshot(
            vec![player("p-1", "Ada"), player("p-2", "Bo")],
            vec![stat("p-1", 2, 0), stat("p-2", 2, 1)],
        );
        let awards = compute_awards(&snapshot, &Ruleset::default());
        assert_eq!(awards.top_scorer.map(|l| l.player_id), Some("p-2".to_string()));
    }

    #[test]
    fn top_assister_tie_resolved_by_goals() {
        let snapshot = snapshot(
            vec![player("p-1", "Ada"), player("p-2", "Bo")],
            vec![stat("p-1", 0, 2), stat("p-2", 1, 2)],
        );
        let awards = compute_awards(&snapshot, &Ruleset::default());
        assert_eq!(awards.top_assister.map(|l| l.player_id), Some("p-2".to_string()));
    }

    #[test]
    fn awards_withheld_without_positive_metrics() {
        // Assists exist but nobody scored: MVP and top assister stand,
        // top scorer stays empty.
        let snapshot = snapshot(vec![player("p-1", "Ada")], vec![stat("p-1", 0, 1)]);
        let awards = compute_awards(&snapshot, &Ruleset::default());
        assert!(awards.mvp.is_some());
        assert!(awards.top_scorer.is_none());
        assert!(awards.top_assister.is_some());
    }

    #[test]
    fn empty_tournament_has_no_awards() {
        let snapshot = snapshot(vec![player("p-1", "Ada")], vec![]);
        let awards = compute_awards(&snapshot, &Ruleset::default());
        assert_eq!(awards, Awards::default());
        assert!(leaderboard(&snapshot, &Ruleset::default()).is_empty());
    }

    #[test]
    fn custom_weights_shift_the_mvp() {
        // Assist-heavy ruleset flips the MVP from the scorer to the creator.
        let rules = Ruleset { mvp_goal_weight: 1, mvp_assist_weight: 3, ..Ruleset::default() };
        let snapshot = snapshot(
            vec![player("p-1", "Poacher"), player("p-2", "Playmaker")],
            vec![stat("p-1", 3, 0), stat("p-2", 0, 2)],
        );
        let standard = compute_awards(&snapshot, &Ruleset::default());
        assert_eq!(standard.mvp.map(|l| l.player_id), Some("p-1".to_string()));

        let flipped = compute_awards(&snapshot, &rules);
        assert_eq!(flipped.mvp.map(|l| l.player_id), Some("p-2".to_string()));
    }

    #[test]
    fn stats_for_unknown_players_are_ignored() {
        let snapshot = snapshot(vec![player("p-1", "Ada")], vec![stat("ghost", 5, 5)]);
        let totals = aggregate_players(&snapshot, &Ruleset::default());
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].goals, 0);
    }
}
