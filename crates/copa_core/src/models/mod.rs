pub mod matches;
pub mod player;
pub mod snapshot;
pub mod stat;
pub mod team;

pub use matches::{Match, MatchOutcome};
pub use player::Player;
pub use snapshot::TournamentSnapshot;
pub use stat::PlayerMatchStat;
pub use team::Team;
