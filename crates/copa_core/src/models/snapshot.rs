//! Tournament snapshot: the four collections every computation reads.
//!
//! The engine holds no state of its own. Callers own a snapshot, pass it
//! by reference into the read-side views, and apply the deltas returned by
//! the write-side operations. Collections are small (a handful of teams,
//! tens of matches) so lookups are linear scans.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::{Match, Player, PlayerMatchStat, Team};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TournamentSnapshot {
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub matches: Vec<Match>,
    #[serde(default)]
    pub stats: Vec<PlayerMatchStat>,
}

impl TournamentSnapshot {
    pub fn team(&self, id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    /// Name lookup for duplicate detection: trimmed, case-insensitive.
    pub fn team_by_name(&self, name: &str) -> Option<&Team> {
        let wanted = name.trim();
        self.teams.iter().find(|t| t.name.trim().eq_ignore_ascii_case(wanted))
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn match_by_id(&self, id: &str) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn round_robin_matches(&self) -> impl Iterator<Item = &Match> {
        self.matches.iter().filter(|m| m.is_round_robin())
    }

    /// The final, if one has been created. The audit enforces at most one.
    pub fn final_match(&self) -> Option<&Match> {
        self.matches.iter().find(|m| m.is_final)
    }

    pub fn completed_round_robin_count(&self) -> usize {
        self.round_robin_matches().filter(|m| m.completed).count()
    }

    pub fn team_players(&self, team_id: &str) -> impl Iterator<Item = &Player> + '_ {
        let team_id = team_id.to_string();
        self.players.iter().filter(move |p| p.team_id == team_id)
    }

    pub fn stats_for_match(&self, match_id: &str) -> impl Iterator<Item = &PlayerMatchStat> + '_ {
        let match_id = match_id.to_string();
        self.stats.iter().filter(move |s| s.match_id == match_id)
    }
}
