//! Win/draw detection
//!
//! Two entry points over the same rule (a line of `size` identical marks wins):
//! - `check_last_move`: only the lines through the cell just played
//! - `check_board`: every row, then every column, then both diagonals

use serde::{Deserialize, Serialize};

use crate::board::{Board, Mark, Position};

/// Terminal status of a board
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub is_game_over: bool,
    pub winner: Option<Mark>,
    pub is_draw: bool,
    pub winning_line: Option<Vec<Position>>,
}

impl Outcome {
    /// Non-terminal position
    pub fn ongoing() -> Self {
        Self::default()
    }

    fn win(mark: Mark, line: Vec<Position>) -> Self {
        Self {
            is_game_over: true,
            winner: Some(mark),
            is_draw: false,
            winning_line: Some(line),
        }
    }

    fn draw() -> Self {
        Self {
            is_game_over: true,
            winner: None,
            is_draw: true,
            winning_line: None,
        }
    }
}

/// Mark owning every cell of the line, if any
fn line_owner(board: &Board, line: &[Position]) -> Option<Mark> {
    let first = board.mark_at(*line.first()?)?;
    line.iter()
        .all(|&pos| board.mark_at(pos) == Some(first))
        .then_some(first)
}

fn first_win(board: &Board, lines: Vec<Vec<Position>>) -> Option<Outcome> {
    lines
        .into_iter()
        .find_map(|line| line_owner(board, &line).map(|mark| Outcome::win(mark, line)))
}

fn settle(board: &Board, win: Option<Outcome>) -> Outcome {
    match win {
        Some(outcome) => outcome,
        None if board.is_full() => Outcome::draw(),
        None => Outcome::ongoing(),
    }
}

/// Check only the lines through `last`.
///
/// Agrees with `check_board` whenever the board was non-terminal before
/// `last` was played.
pub fn check_last_move(board: &Board, last: Position) -> Outcome {
    if board.mark_at(last).is_none() {
        return check_board(board);
    }
    settle(board, first_win(board, board.lines_through(last)))
}

/// Full scan of every line
pub fn check_board(board: &Board) -> Outcome {
    settle(board, first_win(board, board.lines()))
}
