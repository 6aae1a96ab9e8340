//! JSON boundary for embedding hosts.

pub mod json_api;

pub use json_api::{
    audit_json, demo_json, final_readiness_json, leaderboard_json, plan_final_json,
    record_result_json, register_team_json, reset_json, schedule_json, schema_json,
    standings_json,
};
pub use json_api::{
    AuditResponse, DemoResponse, LeaderboardReport, PlanFinalResponse, ReadinessReport,
    RecordResultRequest, RecordResultResponse, RegisterTeamRequest, RegisterTeamResponse,
    ResetResponse, ScheduleResponse, SnapshotRequest, StandingsReport, ViewRequest,
};
