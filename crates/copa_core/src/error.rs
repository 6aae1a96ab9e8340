//! Error taxonomy for the standings engine.
//!
//! Three categories mirror the precondition classes every operation checks:
//! input shape ([`ValidationError`]), record lifecycle ([`StateError`]) and
//! reference resolution ([`NotFoundError`]). Operations run every check
//! before building a plan or delta, so a returned error means nothing was
//! computed and nothing has to be rolled back.

use thiserror::Error;

/// Input fails a structural or tournament-rule precondition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("team name must not be blank")]
    BlankTeamName,

    #[error("team name already registered: {name}")]
    DuplicateTeamName { name: String },

    #[error("roster must have exactly {expected} players, got {actual}")]
    RosterSize { expected: usize, actual: usize },

    #[error("player name must not be blank")]
    BlankPlayerName,

    #[error("scheduling requires exactly {expected} teams, got {actual}")]
    TeamCount { expected: usize, actual: usize },

    #[error("round robin incomplete: {completed} of {expected} matches recorded")]
    RoundRobinIncomplete { completed: usize, expected: usize },

    #[error("player {player_id} is on neither side of match {match_id}")]
    PlayerNotInMatch { player_id: String, match_id: String },

    #[error("player {player_id} appears more than once in the result sheet")]
    DuplicateContribution { player_id: String },

    #[error("invalid ruleset: {detail}")]
    Ruleset { detail: String },
}

impl ValidationError {
    /// Stable machine-readable code for the JSON boundary.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BlankTeamName => "BLANK_TEAM_NAME",
            Self::DuplicateTeamName { .. } => "DUPLICATE_TEAM_NAME",
            Self::RosterSize { .. } => "ROSTER_SIZE",
            Self::BlankPlayerName => "BLANK_PLAYER_NAME",
            Self::TeamCount { .. } => "TEAM_COUNT",
            Self::RoundRobinIncomplete { .. } => "ROUND_ROBIN_INCOMPLETE",
            Self::PlayerNotInMatch { .. } => "PLAYER_NOT_IN_MATCH",
            Self::DuplicateContribution { .. } => "DUPLICATE_CONTRIBUTION",
            Self::Ruleset { .. } => "INVALID_RULESET",
        }
    }
}

/// A record exists but is in the wrong lifecycle state for the request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("match {match_id} already has a recorded result")]
    MatchAlreadyCompleted { match_id: String },

    #[error("a final match already exists")]
    FinalAlreadyExists,
}

impl StateError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MatchAlreadyCompleted { .. } => "MATCH_ALREADY_COMPLETED",
            Self::FinalAlreadyExists => "FINAL_ALREADY_EXISTS",
        }
    }
}

/// An id does not resolve against the snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotFoundError {
    #[error("team not found: {0}")]
    Team(String),

    #[error("player not found: {0}")]
    Player(String),

    #[error("match not found: {0}")]
    Match(String),
}

impl NotFoundError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Team(_) => "TEAM_NOT_FOUND",
            Self::Player(_) => "PLAYER_NOT_FOUND",
            Self::Match(_) => "MATCH_NOT_FOUND",
        }
    }
}

/// Umbrella error returned by every fallible engine operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("state error: {0}")]
    State(#[from] StateError),

    #[error("not found: {0}")]
    NotFound(#[from] NotFoundError),
}

impl EngineError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.code(),
            Self::State(e) => e.code(),
            Self::NotFound(e) => e.code(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
