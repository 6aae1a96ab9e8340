//! String-in/string-out JSON wrappers around the engine.
//!
//! Hosts that marshal requests as JSON strings (embedding runtimes, IPC
//! bridges, the CLI's `--json` mode) call these instead of the typed API.
//! Every wrapper follows the same shape: parse, check `schema_version`,
//! resolve the optional ruleset override, run the engine, serialize a
//! response envelope. Errors come back as `"CODE: human message"` strings
//! carrying the engine's stable error codes.

use chrono::Utc;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use validator::Validate;

use crate::audit::{audit_snapshot, AuditReport};
use crate::awards::{compute_awards, leaderboard, Awards, PlayerTotals};
use crate::demo::demo_snapshot;
use crate::error::EngineError;
use crate::models::{Match, TournamentSnapshot};
use crate::ops::{self, ResetPlan, ResultDelta, ResultSheet, TeamRegistration};
use crate::rules::Ruleset;
use crate::schedule::{final_readiness, plan_final, plan_round_robin, FinalReadiness, SchedulePlan};
use crate::standings::{compute_standings, StandingRow, StandingsScope};
use crate::SCHEMA_VERSION;

const INVALID_JSON: &str = "INVALID_JSON";
const UNSUPPORTED_SCHEMA_VERSION: &str = "UNSUPPORTED_SCHEMA_VERSION";
const INVALID_REQUEST: &str = "INVALID_REQUEST";
const INVALID_RULESET: &str = "INVALID_RULESET";
const SERIALIZE_FAILED: &str = "SERIALIZE_FAILED";

fn err_code(code: &str, message: impl std::fmt::Display) -> String {
    format!("{code}: {message}")
}

fn parse_request<T: serde::de::DeserializeOwned>(request_json: &str) -> Result<T, String> {
    serde_json::from_str(request_json).map_err(|e| err_code(INVALID_JSON, e))
}

fn check_schema_version(version: u8) -> Result<(), String> {
    if version == SCHEMA_VERSION {
        Ok(())
    } else {
        Err(err_code(
            UNSUPPORTED_SCHEMA_VERSION,
            format!("unsupported schema version: {version} (expected {SCHEMA_VERSION})"),
        ))
    }
}

/// Missing override means the embedded standard ruleset; a present one is
/// validated before anything runs.
fn resolve_rules(rules: Option<Ruleset>) -> Result<Ruleset, String> {
    let rules = rules.unwrap_or_else(|| Ruleset::standard().clone());
    rules.validate().map_err(|detail| err_code(INVALID_RULESET, detail))?;
    Ok(rules)
}

fn engine_err(e: EngineError) -> String {
    warn!(code = e.code(), "engine rejected request: {e}");
    let code = e.code();
    err_code(code, e)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| err_code(SERIALIZE_FAILED, e))
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

/// Read-side request: a snapshot, an optional ruleset override, and for
/// standings an optional scope restriction.
#[derive(Debug, Deserialize)]
pub struct ViewRequest {
    pub schema_version: u8,
    pub snapshot: TournamentSnapshot,
    #[serde(default)]
    pub rules: Option<Ruleset>,
    /// Standings only: drop the final from the table.
    #[serde(default)]
    pub round_robin_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct SnapshotRequest {
    pub schema_version: u8,
    pub snapshot: TournamentSnapshot,
    #[serde(default)]
    pub rules: Option<Ruleset>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct StandingsReport {
    pub schema_version: u8,
    pub generated_at: String,
    pub scope: StandingsScope,
    pub table: Vec<StandingRow>,
}

pub fn standings_json(request_json: &str) -> Result<String, String> {
    let request: ViewRequest = parse_request(request_json)?;
    check_schema_version(request.schema_version)?;
    let rules = resolve_rules(request.rules)?;
    let scope =
        if request.round_robin_only { StandingsScope::RoundRobin } else { StandingsScope::All };

    debug!(
        teams = request.snapshot.teams.len(),
        matches = request.snapshot.matches.len(),
        ?scope,
        "computing standings"
    );
    let table = compute_standings(&request.snapshot, scope, &rules);
    to_json(&StandingsReport {
        schema_version: SCHEMA_VERSION,
        generated_at: now_rfc3339(),
        scope,
        table,
    })
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct LeaderboardReport {
    pub schema_version: u8,
    pub generated_at: String,
    pub leaderboard: Vec<PlayerTotals>,
    pub awards: Awards,
}

pub fn leaderboard_json(request_json: &str) -> Result<String, String> {
    let request: SnapshotRequest = parse_request(request_json)?;
    check_schema_version(request.schema_version)?;
    let rules = resolve_rules(request.rules)?;

    to_json(&LeaderboardReport {
        schema_version: SCHEMA_VERSION,
        generated_at: now_rfc3339(),
        leaderboard: leaderboard(&request.snapshot, &rules),
        awards: compute_awards(&request.snapshot, &rules),
    })
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ReadinessReport {
    pub schema_version: u8,
    pub generated_at: String,
    pub readiness: FinalReadiness,
    /// Team id of the final's winner once the final is completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub champion: Option<String>,
}

pub fn final_readiness_json(request_json: &str) -> Result<String, String> {
    let request: SnapshotRequest = parse_request(request_json)?;
    check_schema_version(request.schema_version)?;
    let rules = resolve_rules(request.rules)?;

    let champion = request
        .snapshot
        .final_match()
        .and_then(|m| m.winner())
        .map(ToString::to_string);
    to_json(&ReadinessReport {
        schema_version: SCHEMA_VERSION,
        generated_at: now_rfc3339(),
        readiness: final_readiness(&request.snapshot, &rules),
        champion,
    })
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct AuditResponse {
    pub schema_version: u8,
    pub generated_at: String,
    pub clean: bool,
    pub report: AuditReport,
}

pub fn audit_json(request_json: &str) -> Result<String, String> {
    let request: SnapshotRequest = parse_request(request_json)?;
    check_schema_version(request.schema_version)?;
    let rules = resolve_rules(request.rules)?;

    let report = audit_snapshot(&request.snapshot, &rules);
    to_json(&AuditResponse {
        schema_version: SCHEMA_VERSION,
        generated_at: now_rfc3339(),
        clean: report.is_clean(),
        report,
    })
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterTeamRequest {
    pub schema_version: u8,
    pub snapshot: TournamentSnapshot,
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    /// Player names; the engine enforces the exact roster size.
    #[validate(length(min = 1, max = 32))]
    pub squad: Vec<String>,
    #[serde(default)]
    pub rules: Option<Ruleset>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct RegisterTeamResponse {
    pub schema_version: u8,
    pub generated_at: String,
    pub registration: TeamRegistration,
    /// Input snapshot with the registration applied.
    pub snapshot: TournamentSnapshot,
}

pub fn register_team_json(request_json: &str) -> Result<String, String> {
    let request: RegisterTeamRequest = parse_request(request_json)?;
    check_schema_version(request.schema_version)?;
    request.validate().map_err(|e| err_code(INVALID_REQUEST, e))?;
    let rules = resolve_rules(request.rules)?;

    let mut snapshot = request.snapshot;
    let registration =
        ops::register_team(&snapshot, &request.name, &request.squad, &rules).map_err(engine_err)?;
    ops::apply_registration(&mut snapshot, &registration);
    to_json(&RegisterTeamResponse {
        schema_version: SCHEMA_VERSION,
        generated_at: now_rfc3339(),
        registration,
        snapshot,
    })
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ScheduleResponse {
    pub schema_version: u8,
    pub generated_at: String,
    pub plan: SchedulePlan,
    pub snapshot: TournamentSnapshot,
}

pub fn schedule_json(request_json: &str) -> Result<String, String> {
    let request: SnapshotRequest = parse_request(request_json)?;
    check_schema_version(request.schema_version)?;
    let rules = resolve_rules(request.rules)?;

    let mut snapshot = request.snapshot;
    let plan = plan_round_robin(&snapshot, &rules).map_err(engine_err)?;
    ops::apply_schedule(&mut snapshot, &plan);
    to_json(&ScheduleResponse {
        schema_version: SCHEMA_VERSION,
        generated_at: now_rfc3339(),
        plan,
        snapshot,
    })
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct PlanFinalResponse {
    pub schema_version: u8,
    pub generated_at: String,
    pub final_match: Match,
    pub snapshot: TournamentSnapshot,
}

pub fn plan_final_json(request_json: &str) -> Result<String, String> {
    let request: SnapshotRequest = parse_request(request_json)?;
    check_schema_version(request.schema_version)?;
    let rules = resolve_rules(request.rules)?;

    let mut snapshot = request.snapshot;
    let final_match = plan_final(&snapshot, &rules).map_err(engine_err)?;
    ops::apply_final(&mut snapshot, &final_match);
    to_json(&PlanFinalResponse {
        schema_version: SCHEMA_VERSION,
        generated_at: now_rfc3339(),
        final_match,
        snapshot,
    })
}

#[derive(Debug, Deserialize)]
pub struct RecordResultRequest {
    pub schema_version: u8,
    pub snapshot: TournamentSnapshot,
    pub sheet: ResultSheet,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct RecordResultResponse {
    pub schema_version: u8,
    pub generated_at: String,
    pub delta: ResultDelta,
    /// Input snapshot with the delta applied.
    pub snapshot: TournamentSnapshot,
}

pub fn record_result_json(request_json: &str) -> Result<String, String> {
    let request: RecordResultRequest = parse_request(request_json)?;
    check_schema_version(request.schema_version)?;

    let mut snapshot = request.snapshot;
    let delta = ops::record_result(&snapshot, &request.sheet).map_err(engine_err)?;
    ops::apply_result(&mut snapshot, &delta).map_err(engine_err)?;
    debug!(match_id = %delta.match_id, "result recorded");
    to_json(&RecordResultResponse {
        schema_version: SCHEMA_VERSION,
        generated_at: now_rfc3339(),
        delta,
        snapshot,
    })
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ResetResponse {
    pub schema_version: u8,
    pub generated_at: String,
    pub plan: ResetPlan,
    pub snapshot: TournamentSnapshot,
}

pub fn reset_json(request_json: &str) -> Result<String, String> {
    let request: SnapshotRequest = parse_request(request_json)?;
    check_schema_version(request.schema_version)?;

    let mut snapshot = request.snapshot;
    let plan = ops::plan_reset(&snapshot);
    ops::apply_reset(&mut snapshot, &plan);
    to_json(&ResetResponse {
        schema_version: SCHEMA_VERSION,
        generated_at: now_rfc3339(),
        plan,
        snapshot,
    })
}

#[derive(Debug, Deserialize)]
pub struct DemoRequest {
    pub schema_version: u8,
    #[serde(default)]
    pub seed: u64,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct DemoResponse {
    pub schema_version: u8,
    pub generated_at: String,
    pub seed: u64,
    pub snapshot: TournamentSnapshot,
}

pub fn demo_json(request_json: &str) -> Result<String, String> {
    let request: DemoRequest = parse_request(request_json)?;
    check_schema_version(request.schema_version)?;

    to_json(&DemoResponse {
        schema_version: SCHEMA_VERSION,
        generated_at: now_rfc3339(),
        seed: request.seed,
        snapshot: demo_snapshot(request.seed),
    })
}

/// JSON Schema for one of the exchanged document types, by kind name.
pub fn schema_json(kind: &str) -> Result<String, String> {
    let schema = match kind {
        "snapshot" => schema_for!(TournamentSnapshot),
        "ruleset" => schema_for!(Ruleset),
        "standings" => schema_for!(StandingsReport),
        "leaderboard" => schema_for!(LeaderboardReport),
        "readiness" => schema_for!(ReadinessReport),
        "delta" => schema_for!(ResultDelta),
        "audit" => schema_for!(AuditResponse),
        other => return Err(err_code(INVALID_REQUEST, format!("unknown schema kind: {other}"))),
    };
    to_json(&schema)
}
