//! Remote-play sync port
//!
//! Outgoing: every action dispatched locally in remote mode is handed to the
//! attached `SyncPort`, fire and forget. Incoming: the transport feeds
//! `SyncMessage`s to `Engine::receive`.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::action::Action;
use crate::error::EngineError;
use crate::state::GameState;

/// Messages exchanged with the remote collaborator
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncMessage {
    /// Replace the mirrored state wholesale
    SyncState { state: GameState },
    /// An action dispatched on the other side
    Action { action: Action },
}

/// Outgoing half of the remote collaborator
pub trait SyncPort {
    /// Forward a locally dispatched action. Must not block on delivery.
    fn forward(&self, action: &Action);
}

impl<F> SyncPort for F
where
    F: Fn(&Action),
{
    fn forward(&self, action: &Action) {
        self(action)
    }
}

/// Sync port backed by an unbounded tokio channel
pub struct ChannelSync {
    tx: mpsc::UnboundedSender<SyncMessage>,
}

impl ChannelSync {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SyncMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl SyncPort for ChannelSync {
    fn forward(&self, action: &Action) {
        let message = SyncMessage::Action {
            action: action.clone(),
        };
        if self.tx.send(message).is_err() {
            tracing::warn!("Sync channel closed, dropping {:?}", action);
        }
    }
}

/// Encode a message as JSON
pub fn encode(message: &SyncMessage) -> Result<String, EngineError> {
    Ok(serde_json::to_string(message)?)
}

/// Decode a JSON message
pub fn decode(text: &str) -> Result<SyncMessage, EngineError> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ntac_core::Difficulty;

    use crate::state::GameMode;

    #[test]
    fn test_sync_state_wire_format() {
        let state = GameState::fresh(4, GameMode::Remote, Difficulty::Easy, Some("r1".into())).unwrap();
        let text = encode(&SyncMessage::SyncState { state: state.clone() }).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["type"], "SYNC_STATE");
        assert_eq!(json["state"]["board_size"], 4);
        assert_eq!(json["state"]["room_id"], "r1");
        assert_eq!(decode(&text).unwrap(), SyncMessage::SyncState { state });
    }

    #[test]
    fn test_forwarded_action_carries_unknown_through() {
        let text = r#"{"type":"ACTION","action":{"type":"WAVE"}}"#;
        assert_eq!(
            decode(text).unwrap(),
            SyncMessage::Action {
                action: Action::Unknown
            }
        );
        assert!(matches!(decode("{not json"), Err(EngineError::Codec(_))));
    }

    #[test]
    fn test_channel_port_does_not_wait() {
        let (port, mut rx) = ChannelSync::new();
        port.forward(&Action::ResetGame);
        port.forward(&Action::make_move(0, 0));
        assert_eq!(
            rx.try_recv().unwrap(),
            SyncMessage::Action {
                action: Action::ResetGame
            }
        );
        assert!(rx.try_recv().is_ok());

        drop(rx);
        port.forward(&Action::UndoMove);
    }
}
