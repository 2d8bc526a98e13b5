//! Position evaluation

use crate::board::{Board, Mark};
use crate::rules::Outcome;

/// Base score of a win before the depth adjustment
pub const WIN_VALUE: i32 = 10;

/// Score a terminal outcome from `machine`'s point of view.
///
/// Faster wins score higher, slower losses score less badly. Returns None
/// for non-terminal outcomes.
pub fn terminal_score(outcome: &Outcome, machine: Mark, depth: u32) -> Option<i32> {
    if !outcome.is_game_over {
        return None;
    }
    let depth = depth as i32;
    Some(match outcome.winner {
        Some(mark) if mark == machine => WIN_VALUE - depth,
        Some(_) => depth - WIN_VALUE,
        None => 0,
    })
}

/// Line-potential heuristic used at the depth cutoff.
///
/// Each line open to only one side is worth 2^(marks in line) to that
/// side. An empty line counts for both and nets zero.
pub fn evaluate(board: &Board, machine: Mark) -> i32 {
    let mut score = 0i32;

    for line in board.lines() {
        let mut mine = 0u32;
        let mut theirs = 0u32;
        for &pos in &line {
            match board.mark_at(pos) {
                Some(m) if m == machine => mine += 1,
                Some(_) => theirs += 1,
                None => {}
            }
        }
        if theirs == 0 {
            score += 1 << mine;
        }
        if mine == 0 {
            score -= 1 << theirs;
        }
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Position;
    use crate::rules::check_board;

    #[test]
    fn test_empty_board_is_neutral() {
        for n in 3..=10 {
            let board = Board::new(n).unwrap();
            assert_eq!(evaluate(&board, Mark::O), 0);
        }
    }

    #[test]
    fn test_center_mark_favours_owner() {
        let mut board = Board::new(3).unwrap();
        board.place(Position::new(1, 1), Mark::O).unwrap();
        // Four lines through the center score 2 each, the four empty lines net 0
        assert_eq!(evaluate(&board, Mark::O), 8);
        assert_eq!(evaluate(&board, Mark::X), -8);
    }

    #[test]
    fn test_blocked_line_scores_nothing() {
        let mut board = Board::new(3).unwrap();
        board.place(Position::new(0, 0), Mark::O).unwrap();
        board.place(Position::new(0, 1), Mark::X).unwrap();
        // Row 0 is mixed and scores 0; col 0 and the main diagonal +2 each, col 1 -2
        assert_eq!(evaluate(&board, Mark::O), 2);
    }

    #[test]
    fn test_terminal_scores() {
        let mut board = Board::new(3).unwrap();
        for c in 0..3 {
            board.place(Position::new(0, c), Mark::O).unwrap();
        }
        let outcome = check_board(&board);
        assert_eq!(terminal_score(&outcome, Mark::O, 3), Some(7));
        assert_eq!(terminal_score(&outcome, Mark::X, 3), Some(-7));
        assert_eq!(terminal_score(&Outcome::ongoing(), Mark::O, 3), None);
    }
}
