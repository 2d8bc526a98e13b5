//! Minimax AI with alpha-beta pruning and difficulty-weighted play

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Mark, Position};
use crate::eval::{evaluate, terminal_score};
use crate::rules::{check_board, check_last_move};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Search depth used on boards larger than 3x3
pub const DEEP_BOARD_DEPTH: u32 = 5;

/// Depth limit for a board size (None = search to the end)
pub fn depth_limit(size: usize) -> Option<u32> {
    if size <= 3 {
        None
    } else {
        Some(DEEP_BOARD_DEPTH)
    }
}

// ============================================================================
// DIFFICULTY
// ============================================================================

/// Difficulty tier
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    #[default]
    Unbeatable,
}

impl Difficulty {
    /// Chance of playing the minimax move instead of a random one
    pub fn optimal_probability(self) -> f64 {
        match self {
            Difficulty::Easy => 0.3,
            Difficulty::Medium => 0.6,
            Difficulty::Hard => 0.9,
            Difficulty::Unbeatable => 1.0,
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "unbeatable" => Ok(Difficulty::Unbeatable),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

// ============================================================================
// SEARCH
// ============================================================================

/// Alpha-beta bounds, passed by value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub alpha: i32,
    pub beta: i32,
}

impl Window {
    pub const FULL: Window = Window {
        alpha: i32::MIN,
        beta: i32::MAX,
    };

    fn raise_alpha(self, score: i32) -> Self {
        Self {
            alpha: self.alpha.max(score),
            ..self
        }
    }

    fn lower_beta(self, score: i32) -> Self {
        Self {
            beta: self.beta.min(score),
            ..self
        }
    }

    fn is_closed(self) -> bool {
        self.beta <= self.alpha
    }
}

/// Score of a node plus the move that achieved it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scored {
    pub score: i32,
    pub best: Option<Position>,
}

/// Fixed inputs shared by every node of one search
#[derive(Clone, Copy, Debug)]
struct SearchParams {
    machine: Mark,
    limit: Option<u32>,
}

fn minimax(
    board: &Board,
    last: Option<Position>,
    to_move: Mark,
    depth: u32,
    window: Window,
    params: SearchParams,
    rng: &mut ChaCha8Rng,
) -> Scored {
    // The parent was non-terminal, so the last move is the only thing that can end it
    let outcome = match last {
        Some(pos) => check_last_move(board, pos),
        None => check_board(board),
    };
    if let Some(score) = terminal_score(&outcome, params.machine, depth) {
        return Scored { score, best: None };
    }

    if params.limit.is_some_and(|limit| depth >= limit) {
        return Scored {
            score: evaluate(board, params.machine),
            best: None,
        };
    }

    let mut moves = board.empty_positions();
    moves.shuffle(rng);

    let maximizing = to_move == params.machine;
    let mut window = window;
    let mut best = Scored {
        score: if maximizing { i32::MIN } else { i32::MAX },
        best: None,
    };

    for pos in moves {
        let mut child = board.clone();
        if child.place(pos, to_move).is_err() {
            continue;
        }
        let score = minimax(
            &child,
            Some(pos),
            to_move.opponent(),
            depth + 1,
            window,
            params,
            rng,
        )
        .score;

        if maximizing {
            if score > best.score {
                best = Scored { score, best: Some(pos) };
            }
            window = window.raise_alpha(best.score);
        } else {
            if score < best.score {
                best = Scored { score, best: Some(pos) };
            }
            window = window.lower_beta(best.score);
        }

        if window.is_closed() {
            break;
        }
    }

    best
}

/// Full minimax search for `machine`, who is assumed to be on move.
///
/// Branch order is shuffled with `rng`; the score is the same for any
/// order, only the choice among equally good moves varies.
pub fn search(board: &Board, machine: Mark, rng: &mut ChaCha8Rng) -> Scored {
    search_with_limit(board, machine, depth_limit(board.size()), rng)
}

/// Search with an explicit depth limit (None = to the end of the game).
///
/// Non-terminal nodes at the limit are scored with `evaluate`.
pub fn search_with_limit(
    board: &Board,
    machine: Mark,
    limit: Option<u32>,
    rng: &mut ChaCha8Rng,
) -> Scored {
    let params = SearchParams { machine, limit };
    minimax(board, None, machine, 0, Window::FULL, params, rng)
}

// ============================================================================
// MINIMAX AI
// ============================================================================

/// Computer player for one mark
pub struct MinimaxAI {
    pub machine: Mark,
    rng: ChaCha8Rng,
}

impl MinimaxAI {
    /// AI seeded from OS randomness
    pub fn new(machine: Mark) -> Self {
        Self::with_seed(machine, rand::random())
    }

    pub fn with_seed(machine: Mark, seed: u64) -> Self {
        Self {
            machine,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Minimax-optimal move, or None if the board is terminal
    pub fn best_move(&mut self, board: &Board) -> Option<Position> {
        self.best_move_for(self.machine, board)
    }

    /// Minimax-optimal move for `mark`, who must be on move
    pub fn best_move_for(&mut self, mark: Mark, board: &Board) -> Option<Position> {
        if check_board(board).is_game_over {
            return None;
        }
        let result = search(board, mark, &mut self.rng);
        tracing::debug!(
            "minimax for {:?} on {}x{}: score={} move={:?}",
            mark,
            board.size(),
            board.size(),
            result.score,
            result.best
        );
        result.best
    }

    /// Pick a move according to the difficulty policy.
    ///
    /// With probability `difficulty.optimal_probability()` the minimax move
    /// is played, otherwise a uniformly random legal move.
    pub fn choose_move(&mut self, board: &Board, difficulty: Difficulty) -> Option<Position> {
        self.choose_move_for(self.machine, board, difficulty)
    }

    /// Difficulty policy for an arbitrary side to move
    pub fn choose_move_for(
        &mut self,
        mark: Mark,
        board: &Board,
        difficulty: Difficulty,
    ) -> Option<Position> {
        if check_board(board).is_game_over {
            return None;
        }
        let moves = board.empty_positions();
        if moves.is_empty() {
            return None;
        }

        let play_optimal = difficulty == Difficulty::Unbeatable
            || self.rng.gen::<f64>() < difficulty.optimal_probability();

        if play_optimal {
            self.best_move_for(mark, board).or_else(|| moves.first().copied())
        } else {
            moves.choose(&mut self.rng).copied()
        }
    }

    /// Play both sides of a game from `board`, `self` for its mark and
    /// `other` for the opponent. Returns the final board and the moves played.
    pub fn play_out(
        &mut self,
        other: &mut MinimaxAI,
        board: &Board,
        difficulties: (Difficulty, Difficulty),
    ) -> (Board, Vec<Position>) {
        let mut board = board.clone();
        let mut moves = Vec::new();
        let mut to_move = if board.occupied() % 2 == 0 { Mark::X } else { Mark::O };

        loop {
            let (ai, difficulty) = if to_move == self.machine {
                (&mut *self, difficulties.0)
            } else {
                (&mut *other, difficulties.1)
            };
            let Some(pos) = ai.choose_move(&board, difficulty) else {
                break;
            };
            if board.place(pos, to_move).is_err() {
                break;
            }
            moves.push(pos);
            to_move = to_move.opponent();
        }

        (board, moves)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::check_board;

    fn board(rows: &[&str]) -> Board {
        let rows: Vec<Vec<_>> = rows
            .iter()
            .map(|r| {
                r.chars()
                    .map(|c| match c {
                        'X' => Some(Mark::X),
                        'O' => Some(Mark::O),
                        _ => None,
                    })
                    .collect()
            })
            .collect();
        Board::from_rows(&rows).unwrap()
    }

    #[test]
    fn test_depth_limit() {
        assert_eq!(depth_limit(3), None);
        for n in 4..=10 {
            assert_eq!(depth_limit(n), Some(DEEP_BOARD_DEPTH));
        }
    }

    #[test]
    fn test_takes_immediate_win() {
        let b = board(&["OO.", "XX.", "X.."]);
        for seed in 0..10 {
            let mut ai = MinimaxAI::with_seed(Mark::O, seed);
            assert_eq!(ai.best_move(&b), Some(Position::new(0, 2)));
        }
    }

    #[test]
    fn test_blocks_threat() {
        let b = board(&["XX.", ".O.", "..."]);
        for seed in 0..10 {
            let mut ai = MinimaxAI::with_seed(Mark::O, seed);
            assert_eq!(ai.best_move(&b), Some(Position::new(0, 2)));
        }
    }

    #[test]
    fn test_empty_board_is_a_draw() {
        let b = Board::new(3).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let result = search(&b, Mark::O, &mut rng);
        assert_eq!(result.score, 0);
        assert!(result.best.is_some());
    }

    #[test]
    fn test_no_move_on_terminal_board() {
        let won = board(&["XXX", "OO.", "..."]);
        let full = board(&["XOX", "XOO", "OXX"]);
        let mut ai = MinimaxAI::with_seed(Mark::O, 1);
        assert_eq!(ai.best_move(&won), None);
        assert_eq!(ai.choose_move(&won, Difficulty::Easy), None);
        assert_eq!(ai.choose_move(&full, Difficulty::Unbeatable), None);
    }

    #[test]
    fn test_seed_is_deterministic() {
        let b = Board::new(3).unwrap();
        let a = MinimaxAI::with_seed(Mark::O, 99).best_move(&b);
        let c = MinimaxAI::with_seed(Mark::O, 99).best_move(&b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_easy_sometimes_misses_the_win() {
        let b = board(&["OO.", "XX.", "X.."]);
        let win = Position::new(0, 2);
        let mut ai = MinimaxAI::with_seed(Mark::O, 3);
        let picks: Vec<_> = (0..60)
            .map(|_| ai.choose_move(&b, Difficulty::Easy).unwrap())
            .collect();
        assert!(picks.iter().any(|&p| p != win));
        assert!(picks.iter().all(|&p| b.is_open(p)));

        let mut ai = MinimaxAI::with_seed(Mark::O, 3);
        for _ in 0..20 {
            assert_eq!(ai.choose_move(&b, Difficulty::Unbeatable), Some(win));
        }
    }

    #[test]
    fn test_large_board_returns_legal_move() {
        let b = board(&["X...", ".O..", "..X.", "...."]);
        let mut ai = MinimaxAI::with_seed(Mark::O, 5);
        let mv = ai.best_move(&b).unwrap();
        assert!(b.is_open(mv));
    }

    #[test]
    fn test_large_board_takes_immediate_win() {
        let cases = [
            (board(&["OOO.", "XX..", "X...", "...."]), Position::new(0, 3), 9),
            (
                board(&["OOOO.", "XX...", "..X..", "...X.", "....."]),
                Position::new(0, 4),
                9,
            ),
        ];
        for (b, win, score) in cases {
            for seed in 0..3 {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let result = search(&b, Mark::O, &mut rng);
                assert_eq!(result.best, Some(win), "{}x{} seed {seed}", b.size(), b.size());
                assert_eq!(result.score, score);
            }
        }
    }

    #[test]
    fn test_large_board_blocks_threat() {
        // Scores come from the heuristic at the depth cutoff
        let cases = [
            (board(&["XXX.", ".O..", "..O.", "...."]), Position::new(0, 3), 6),
            (
                board(&["XXXX.", ".O...", "..O..", ".....", "....."]),
                Position::new(0, 4),
                4,
            ),
        ];
        for (b, block, score) in cases {
            for seed in 0..3 {
                let mut ai = MinimaxAI::with_seed(Mark::O, seed);
                assert_eq!(ai.best_move(&b), Some(block), "{}x{} seed {seed}", b.size(), b.size());

                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                assert_eq!(search(&b, Mark::O, &mut rng).score, score);
            }
        }
    }

    #[test]
    fn test_cutoff_scores_with_heuristic() {
        let b = board(&["X...", ".O..", "..X.", "...."]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let root = search_with_limit(&b, Mark::O, Some(0), &mut rng);
        assert_eq!(root.score, evaluate(&b, Mark::O));
        assert_eq!(root.best, None);

        // One ply: the best child by static evaluation
        let expected = b
            .empty_positions()
            .into_iter()
            .map(|pos| evaluate(&b.with_mark(pos, Mark::O).unwrap(), Mark::O))
            .max()
            .unwrap();
        let one_ply = search_with_limit(&b, Mark::O, Some(1), &mut rng);
        assert_eq!(one_ply.score, expected);
        let chosen = b.with_mark(one_ply.best.unwrap(), Mark::O).unwrap();
        assert_eq!(evaluate(&chosen, Mark::O), expected);
    }

    #[test]
    fn test_unbeatable_self_play_draws() {
        for seed in 0..5 {
            let empty = Board::new(3).unwrap();
            let mut x = MinimaxAI::with_seed(Mark::X, seed);
            let mut o = MinimaxAI::with_seed(Mark::O, seed + 100);
            let (end, moves) = x.play_out(
                &mut o,
                &empty,
                (Difficulty::Unbeatable, Difficulty::Unbeatable),
            );
            let outcome = check_board(&end);
            assert!(outcome.is_draw, "seed {seed}: {moves:?}");
            assert_eq!(moves.len(), 9);
        }
    }
}
