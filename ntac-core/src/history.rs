//! Move log and board reconstruction

use serde::{Deserialize, Serialize};

use crate::board::{Board, Mark, Position};
use crate::error::GameError;

/// A recorded move (immutable once logged)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub player: Mark,
    pub position: Position,
    /// 1-based ply number
    pub sequence: u32,
}

/// Ordered move log, insertion order = play order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    moves: Vec<Move>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_moves(moves: Vec<Move>) -> Self {
        Self { moves }
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn last(&self) -> Option<&Move> {
        self.moves.last()
    }

    /// Copy of this log with one more move appended
    pub fn with_move(&self, player: Mark, position: Position) -> Self {
        let mut moves = Vec::with_capacity(self.moves.len() + 1);
        moves.extend_from_slice(&self.moves);
        moves.push(Move {
            player,
            position,
            sequence: self.moves.len() as u32 + 1,
        });
        Self { moves }
    }

    /// Copy of this log without the last `count` moves
    pub fn without_last(&self, count: usize) -> Self {
        let keep = self.moves.len().saturating_sub(count);
        Self {
            moves: self.moves[..keep].to_vec(),
        }
    }

    /// Rebuild a board by replaying the log onto a fresh empty board.
    ///
    /// Fails if a move is off the board, hits a taken cell, or breaks the
    /// X-first alternation.
    pub fn replay(&self, size: usize) -> Result<Board, GameError> {
        let mut board = Board::new(size)?;
        let mut expected = Mark::X;
        for (index, mv) in self.moves.iter().enumerate() {
            if mv.player != expected {
                return Err(GameError::OutOfTurn {
                    index,
                    expected,
                    found: mv.player,
                });
            }
            board.place(mv.position, mv.player)?;
            expected = expected.opponent();
        }
        Ok(board)
    }

    /// Mark that moves next after this log
    pub fn next_to_move(&self) -> Mark {
        self.last().map_or(Mark::X, |mv| mv.player.opponent())
    }
}
