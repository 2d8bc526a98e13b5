//! Engine error type

use ntac_core::GameError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error("rejected snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("malformed sync message: {0}")]
    Codec(#[from] serde_json::Error),
}
