//! Game state snapshots

use serde::{Deserialize, Serialize};

use ntac_core::{
    check_board, check_board_size, Board, Difficulty, GameError, History, Mark, Outcome,
    Position,
};

use crate::error::EngineError;

/// Mark played by the local human in single-player mode
pub const HUMAN: Mark = Mark::X;

/// Mark played by the computer in single-player mode
pub const MACHINE: Mark = Mark::O;

/// Who is playing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Human (X) against the computer (O)
    #[default]
    Single,
    /// Two humans sharing one engine
    Local,
    /// Two engines mirrored through a sync collaborator
    Remote,
}

impl std::str::FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" => Ok(GameMode::Single),
            "local" => Ok(GameMode::Local),
            "remote" => Ok(GameMode::Remote),
            other => Err(format!("unknown game mode: {other}")),
        }
    }
}

/// Immutable snapshot of one game.
///
/// Replaced wholesale on every transition; listeners receive a reference
/// to the new snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub current_player: Mark,
    pub winner: Option<Mark>,
    pub is_draw: bool,
    pub is_game_over: bool,
    pub winning_line: Option<Vec<Position>>,
    pub board_size: usize,
    pub move_history: History,
    pub game_mode: GameMode,
    pub difficulty: Difficulty,
    pub room_id: Option<String>,
}

impl GameState {
    /// Empty board, X to move, no history
    pub fn fresh(
        board_size: usize,
        game_mode: GameMode,
        difficulty: Difficulty,
        room_id: Option<String>,
    ) -> Result<Self, GameError> {
        Ok(Self {
            board: Board::new(board_size)?,
            current_player: Mark::X,
            winner: None,
            is_draw: false,
            is_game_over: false,
            winning_line: None,
            board_size,
            move_history: History::new(),
            game_mode,
            difficulty,
            room_id,
        })
    }

    /// In range, empty, and the game is still running
    pub fn is_valid_move(&self, pos: Position) -> bool {
        !self.is_game_over && self.board.is_open(pos)
    }

    /// Empty cells in row-major order
    pub fn available_moves(&self) -> Vec<Position> {
        self.board.empty_positions()
    }

    /// Single-player game waiting on the computer
    pub fn machine_to_move(&self) -> bool {
        self.game_mode == GameMode::Single && !self.is_game_over && self.current_player == MACHINE
    }

    /// Terminal fields as a detector outcome
    pub fn outcome(&self) -> Outcome {
        Outcome {
            is_game_over: self.is_game_over,
            winner: self.winner,
            is_draw: self.is_draw,
            winning_line: self.winning_line.clone(),
        }
    }

    pub(crate) fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.is_game_over = outcome.is_game_over;
        self.winner = outcome.winner;
        self.is_draw = outcome.is_draw;
        self.winning_line = outcome.winning_line;
        self
    }

    /// Check a snapshot from outside the engine before adopting it.
    ///
    /// The move history must replay onto exactly this board, the side to
    /// move must follow from the history, and the terminal fields must
    /// agree with a full scan of the board.
    pub fn validate(&self) -> Result<(), EngineError> {
        check_board_size(self.board_size)?;
        if self.board.size() != self.board_size {
            return Err(invalid(format!(
                "board is {}x{} but board_size is {}",
                self.board.size(),
                self.board.size(),
                self.board_size
            )));
        }

        let replayed = self
            .move_history
            .replay(self.board_size)
            .map_err(|e| invalid(format!("move history does not replay: {e}")))?;
        if replayed != self.board {
            return Err(invalid("board does not match move history".to_string()));
        }

        let expected_turn = self.move_history.next_to_move();
        if self.current_player != expected_turn {
            return Err(invalid(format!(
                "{:?} to move after {} moves",
                self.current_player,
                self.move_history.len()
            )));
        }

        let scan = check_board(&self.board);
        if scan.is_game_over != self.is_game_over
            || scan.winner != self.winner
            || scan.is_draw != self.is_draw
        {
            return Err(invalid("terminal fields disagree with the board".to_string()));
        }

        match (&self.winning_line, self.winner) {
            (None, None) => Ok(()),
            (Some(line), Some(mark))
                if line.len() == self.board_size
                    && line.iter().all(|&pos| self.board.mark_at(pos) == Some(mark)) =>
            {
                Ok(())
            }
            _ => Err(invalid("winning line does not match winner".to_string())),
        }
    }
}

fn invalid(reason: String) -> EngineError {
    EngineError::InvalidSnapshot(reason)
}

/// Wins and draws across games played on one engine
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub x_wins: u32,
    pub o_wins: u32,
    pub draws: u32,
}

impl Score {
    /// Tally a finished game
    pub fn record(self, state: &GameState) -> Self {
        match (state.winner, state.is_draw) {
            (Some(Mark::X), _) => Self { x_wins: self.x_wins + 1, ..self },
            (Some(Mark::O), _) => Self { o_wins: self.o_wins + 1, ..self },
            (None, true) => Self { draws: self.draws + 1, ..self },
            (None, false) => self,
        }
    }

    pub fn games(&self) -> u32 {
        self.x_wins + self.o_wins + self.draws
    }
}
