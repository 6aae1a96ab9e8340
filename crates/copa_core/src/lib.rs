//! # copa_core - Deterministic Standings & Awards Engine
//!
//! Pure computation over tournament snapshots for a small cup format:
//! a single round robin between four squads, then a one-off final between
//! the top two.
//!
//! ## Features
//! - Derived standings: points, goal difference and goals for, computed
//!   from completed matches on every call, never read from stored counters
//! - Finalist gate, player leaderboard and the three-award podium
//! - Write-side operations as validate-then-delta pairs; a rejected
//!   request never leaves partial state behind
//! - JSON API for easy integration with UI hosts and scripts
//!
//! The engine does no IO and holds no global state. Callers own a
//! [`TournamentSnapshot`], pass it in by reference, and persist whatever
//! deltas they choose to apply.

pub mod api;
pub mod audit;
pub mod awards;
pub mod demo;
pub mod error;
pub mod models;
pub mod ops;
pub mod rules;
pub mod schedule;
pub mod standings;

// Re-export the JSON boundary
pub use api::{
    audit_json, demo_json, final_readiness_json, leaderboard_json, plan_final_json,
    record_result_json, register_team_json, reset_json, schedule_json, schema_json,
    standings_json,
};

// Re-export the typed surface
pub use audit::{audit_snapshot, AuditReport};
pub use awards::{aggregate_players, compute_awards, leaderboard, Awards, PlayerTotals};
pub use error::{EngineError, NotFoundError, Result, StateError, ValidationError};
pub use models::{Match, MatchOutcome, Player, PlayerMatchStat, Team, TournamentSnapshot};
pub use ops::{
    apply_final, apply_registration, apply_reset, apply_result, apply_schedule, plan_reset,
    record_result, register_team, PlayerContribution, ResetPlan, ResultDelta, ResultSheet,
    TeamDelta, TeamRegistration,
};
pub use rules::{standard_rules, Ruleset};
pub use schedule::{
    final_readiness, plan_final, plan_round_robin, round_robin_pairs, FinalReadiness,
    FinalistPair, SchedulePlan,
};
pub use standings::{compute_standings, StandingRow, StandingsScope};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
