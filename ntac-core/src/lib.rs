//! NTAC Core - Board, rules and AI for N x N tic-tac-toe
//!
//! This crate provides the pure game logic:
//! - Board geometry (3x3 up to 10x10)
//! - Win/draw detection (last-move and full-scan)
//! - Move history and board reconstruction
//! - Line-potential evaluation
//! - Minimax AI with alpha-beta pruning and difficulty tiers

pub mod board;
pub mod error;
pub mod rules;
pub mod history;
pub mod eval;
pub mod ai;

// Re-exports for convenient access
pub use board::{Board, Cell, Mark, Position, MAX_BOARD_SIZE, MIN_BOARD_SIZE, check_board_size};
pub use error::GameError;
pub use rules::{check_board, check_last_move, Outcome};
pub use history::{History, Move};
pub use eval::{evaluate, terminal_score, WIN_VALUE};
pub use ai::{search, search_with_limit, depth_limit, Difficulty, MinimaxAI, Scored, Window, DEEP_BOARD_DEPTH};
