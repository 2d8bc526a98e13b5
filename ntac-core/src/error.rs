//! Core error type

use crate::board::{Mark, Position};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("board size {0} is outside 3..=10")]
    InvalidBoardSize(usize),

    #[error("position ({}, {}) is off the board", .0.row, .0.col)]
    OutOfBounds(Position),

    #[error("position ({}, {}) is already taken", .0.row, .0.col)]
    Occupied(Position),

    #[error("move {index} was played by {found:?}, expected {expected:?}")]
    OutOfTurn {
        index: usize,
        expected: Mark,
        found: Mark,
    },
}
