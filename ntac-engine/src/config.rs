//! Engine configuration

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use ntac_core::{check_board_size, Difficulty, GameError};
use serde::{Deserialize, Serialize};

use crate::state::GameMode;

/// Settings an engine starts from
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Side length of the board (3..=10)
    pub board_size: usize,
    /// Initial game mode
    pub game_mode: GameMode,
    /// Initial difficulty
    pub difficulty: Difficulty,
    /// Pause before the computer replies, in milliseconds
    pub ai_delay_ms: u64,
    /// Random seed for the AI (None = random)
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            board_size: 3,
            game_mode: GameMode::Single,
            difficulty: Difficulty::Unbeatable,
            ai_delay_ms: 500,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn with_board_size(mut self, board_size: usize) -> Self {
        self.board_size = board_size;
        self
    }

    pub fn with_game_mode(mut self, game_mode: GameMode) -> Self {
        self.game_mode = game_mode;
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_ai_delay_ms(mut self, ai_delay_ms: u64) -> Self {
        self.ai_delay_ms = ai_delay_ms;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn ai_delay(&self) -> Duration {
        Duration::from_millis(self.ai_delay_ms)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        check_board_size(self.board_size).map(|_| ())
    }

    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: EngineConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }
}
