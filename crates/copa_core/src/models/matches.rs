//! Match record and scoreline classification.
//!
//! A match is pending until a result is applied; pending matches carry a
//! 0-0 placeholder scoreline that no computation reads. Win/draw/loss is
//! never stored, always derived from the scoreline via [`Match::outcome`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    /// Team id of the home side.
    pub home: String,
    /// Team id of the away side.
    pub away: String,
    #[serde(default)]
    pub home_goals: u32,
    #[serde(default)]
    pub away_goals: u32,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub is_final: bool,
}

/// Result of a completed match, seen from the home side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
pub enum MatchOutcome {
    HomeWin,
    AwayWin,
    Draw,
}

impl Match {
    /// Pending round-robin fixture.
    pub fn round_robin(home: &str, away: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            home: home.to_string(),
            away: away.to_string(),
            home_goals: 0,
            away_goals: 0,
            completed: false,
            is_final: false,
        }
    }

    /// Pending final; `home` is the round-robin winner.
    pub fn final_tie(home: &str, away: &str) -> Self {
        Self { is_final: true, ..Self::round_robin(home, away) }
    }

    pub fn is_round_robin(&self) -> bool {
        !self.is_final
    }

    pub fn involves(&self, team_id: &str) -> bool {
        self.home == team_id || self.away == team_id
    }

    /// `None` while the match is pending.
    pub fn outcome(&self) -> Option<MatchOutcome> {
        if !self.completed {
            return None;
        }
        Some(match self.home_goals.cmp(&self.away_goals) {
            std::cmp::Ordering::Greater => MatchOutcome::HomeWin,
            std::cmp::Ordering::Less => MatchOutcome::AwayWin,
            std::cmp::Ordering::Equal => MatchOutcome::Draw,
        })
    }

    /// Winning team id, `None` for a pending match or a draw.
    pub fn winner(&self) -> Option<&str> {
        match self.outcome()? {
            MatchOutcome::HomeWin => Some(&self.home),
            MatchOutcome::AwayWin => Some(&self.away),
            MatchOutcome::Draw => None,
        }
    }
}
