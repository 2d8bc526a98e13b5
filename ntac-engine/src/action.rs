//! The closed set of engine actions

use serde::{Deserialize, Serialize};

use ntac_core::{Difficulty, Position};

use crate::state::GameMode;

/// Every transition the engine knows about.
///
/// Serialized with a `type` tag so a sync collaborator can forward them;
/// tags this build does not know decode to `Unknown`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    MakeMove { position: Position },
    ResetGame,
    ChangeBoardSize { size: usize },
    ChangeGameMode { mode: GameMode },
    ChangeDifficulty { difficulty: Difficulty },
    UndoMove,
    JoinRemoteGame { room_id: String },
    #[serde(other)]
    Unknown,
}

impl Action {
    pub fn make_move(row: usize, col: usize) -> Self {
        Action::MakeMove {
            position: Position::new(row, col),
        }
    }

    /// Actions after which a pending machine reply must not land
    pub fn cancels_ai_turn(&self) -> bool {
        matches!(
            self,
            Action::ResetGame
                | Action::ChangeBoardSize { .. }
                | Action::ChangeGameMode { .. }
                | Action::UndoMove
                | Action::JoinRemoteGame { .. }
        )
    }

    /// Actions that start a new series and clear the scoreboard
    pub fn clears_score(&self) -> bool {
        matches!(
            self,
            Action::ChangeBoardSize { .. }
                | Action::ChangeGameMode { .. }
                | Action::JoinRemoteGame { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_tags() {
        let json = serde_json::to_value(Action::make_move(1, 2)).unwrap();
        assert_eq!(json["type"], "MAKE_MOVE");
        assert_eq!(json["position"]["row"], 1);

        let json = serde_json::to_value(Action::ChangeDifficulty {
            difficulty: Difficulty::Hard,
        })
        .unwrap();
        assert_eq!(json["type"], "CHANGE_DIFFICULTY");
        assert_eq!(json["difficulty"], "hard");
    }

    #[test]
    fn test_unknown_tag_decodes() {
        let action: Action = serde_json::from_str(r#"{"type":"SEND_CHAT","text":"hi"}"#).unwrap();
        assert_eq!(action, Action::Unknown);

        let action: Action = serde_json::from_str(r#"{"type":"UNDO_MOVE"}"#).unwrap();
        assert_eq!(action, Action::UndoMove);
    }
}
