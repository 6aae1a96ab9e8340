//! Team record.
//!
//! The cumulative counters are a write-side ledger: only result application
//! increments them and only a tournament reset zeroes them. Ranking never
//! reads them; the standings table is derived from completed matches, and
//! the audit cross-checks the two.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub draws: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub goals_for: u32,
    #[serde(default)]
    pub goals_against: u32,
}

impl Team {
    /// New team with a generated id and zeroed counters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            wins: 0,
            draws: 0,
            losses: 0,
            goals_for: 0,
            goals_against: 0,
        }
    }

    pub fn matches_played(&self) -> u32 {
        self.wins + self.draws + self.losses
    }

    pub fn goal_difference(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }

    /// Zero every cumulative counter. Used by tournament reset.
    pub fn reset_counters(&mut self) {
        self.wins = 0;
        self.draws = 0;
        self.losses = 0;
        self.goals_for = 0;
        self.goals_against = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_team_starts_blank() {
        let team = Team::new("Harbor Lions");
        assert_eq!(team.name, "Harbor Lions");
        assert!(!team.id.is_empty());
        assert_eq!(team.matches_played(), 0);
        assert_eq!(team.goal_difference(), 0);
    }

    #[test]
    fn goal_difference_can_go_negative() {
        let mut team = Team::new("Outclassed FC");
        team.goals_for = 1;
        team.goals_against = 9;
        assert_eq!(team.goal_difference(), -8);
    }

    #[test]
    fn reset_zeroes_every_counter() {
        let mut team = Team::new("Rovers");
        team.wins = 2;
        team.draws = 1;
        team.losses = 1;
        team.goals_for = 7;
        team.goals_against = 4;
        team.reset_counters();
        assert_eq!(team.matches_played(), 0);
        assert_eq!(team.goals_for, 0);
        assert_eq!(team.goals_against, 0);
    }

    #[test]
    fn counters_default_when_absent_from_json() {
        let team: Team = serde_json::from_str(r#"{"id":"t-1","name":"Lions"}"#).unwrap();
        assert_eq!(team.wins, 0);
        assert_eq!(team.goals_against, 0);
    }
}
