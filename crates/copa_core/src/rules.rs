//! Tournament ruleset.
//!
//! Scoring weights and format sizes live in data, not code: the standard
//! cup ruleset is embedded at compile time from `data/rules/standard_cup.yaml`
//! and parsed once. Hosts may pass an override ruleset with any request;
//! overrides are validated before use.

use std::sync::OnceLock;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Standard cup ruleset, embedded at compile time.
pub const STANDARD_CUP_YAML: &str = include_str!("../../../data/rules/standard_cup.yaml");

static STANDARD_RULES: OnceLock<Ruleset> = OnceLock::new();

/// Format sizes and scoring weights for one tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Ruleset {
    /// Teams in the round robin.
    pub team_count: usize,
    /// Exact roster size per team.
    pub squad_size: usize,
    pub points_win: u32,
    pub points_draw: u32,
    pub mvp_goal_weight: u32,
    pub mvp_assist_weight: u32,
    /// Maximum rows in the player leaderboard.
    pub leaderboard_size: usize,
}

impl Default for Ruleset {
    fn default() -> Self {
        Self {
            team_count: 4,
            squad_size: 7,
            points_win: 3,
            points_draw: 1,
            mvp_goal_weight: 2,
            mvp_assist_weight: 1,
            leaderboard_size: 10,
        }
    }
}

impl Ruleset {
    /// The embedded standard cup ruleset, parsed once.
    ///
    /// # Panics
    /// Panics if the embedded YAML is malformed, which a unit test guards.
    pub fn standard() -> &'static Ruleset {
        STANDARD_RULES.get_or_init(|| {
            serde_yaml::from_str(STANDARD_CUP_YAML).expect("embedded standard_cup.yaml must parse")
        })
    }

    /// Parse a ruleset override from YAML. Missing keys fall back to the
    /// standard values; the result is not yet validated.
    pub fn from_yaml_str(raw: &str) -> Result<Ruleset, String> {
        serde_yaml::from_str(raw).map_err(|e| format!("invalid ruleset YAML: {e}"))
    }

    /// Matches in a full single round robin: n * (n - 1) / 2.
    pub fn round_robin_match_count(&self) -> usize {
        self.team_count * self.team_count.saturating_sub(1) / 2
    }

    /// League points for a W/D/L line.
    pub fn points(&self, wins: u32, draws: u32) -> u32 {
        wins * self.points_win + draws * self.points_draw
    }

    /// MVP points for a goals/assists line.
    pub fn mvp_points(&self, goals: u32, assists: u32) -> u32 {
        goals * self.mvp_goal_weight + assists * self.mvp_assist_weight
    }

    /// Reject rulesets that would make the tournament degenerate.
    pub fn validate(&self) -> Result<(), String> {
        if self.team_count < 2 {
            return Err(format!("team_count must be at least 2, got {}", self.team_count));
        }
        if self.squad_size == 0 {
            return Err("squad_size must be at least 1".to_string());
        }
        if self.points_win <= self.points_draw {
            return Err(format!(
                "points_win ({}) must exceed points_draw ({})",
                self.points_win, self.points_draw
            ));
        }
        if self.mvp_goal_weight == 0 && self.mvp_assist_weight == 0 {
            return Err("at least one MVP weight must be positive".to_string());
        }
        if self.leaderboard_size == 0 {
            return Err("leaderboard_size must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Convenience accessor for the embedded standard ruleset.
pub fn standard_rules() -> &'static Ruleset {
    Ruleset::standard()
}
