//! Player record. Squad membership is a single team id; transfers are out
//! of scope, so the id never changes after registration.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
    pub team_id: String,
}

impl Player {
    /// New player with a generated id, assigned to `team_id`.
    pub fn new(name: impl Into<String>, team_id: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4().to_string(), name: name.into(), team_id: team_id.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_player_is_assigned() {
        let player = Player::new("Dana Whitfield", "t-1");
        assert_eq!(player.team_id, "t-1");
        assert!(!player.id.is_empty());
    }

    #[test]
    fn ids_are_unique() {
        let a = Player::new("A", "t-1");
        let b = Player::new("A", "t-1");
        assert_ne!(a.id, b.id);
    }
}
