//! Per-player, per-match contribution line.
//!
//! Stat rows are sparse: result application only creates a row when the
//! player actually scored or assisted, so a missing row and an all-zero
//! row mean the same thing. The audit rejects stored all-zero rows.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerMatchStat {
    pub id: String,
    pub match_id: String,
    pub player_id: String,
    #[serde(default)]
    pub goals: u32,
    #[serde(default)]
    pub assists: u32,
}

impl PlayerMatchStat {
    pub fn new(match_id: &str, player_id: &str, goals: u32, assists: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            match_id: match_id.to_string(),
            player_id: player_id.to_string(),
            goals,
            assists,
        }
    }

    /// True when the row carries at least one goal or assist.
    pub fn contributes(&self) -> bool {
        self.goals > 0 || self.assists > 0
    }
}
