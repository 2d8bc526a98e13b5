//! State transitions
//!
//! `reduce` is total over well-formed actions: illegal moves, undo on an
//! empty history and unknown actions all return the state unchanged. The
//! only failure is a board size outside 3..=10.

use ntac_core::{check_board, check_board_size, check_last_move, Position};

use crate::action::Action;
use crate::error::EngineError;
use crate::state::{GameMode, GameState, HUMAN, MACHINE};

/// Apply one action, producing the next snapshot
pub fn reduce(state: &GameState, action: &Action) -> Result<GameState, EngineError> {
    let next = match action {
        Action::MakeMove { position } => make_move(state, *position),
        Action::ResetGame => GameState::fresh(
            state.board_size,
            state.game_mode,
            state.difficulty,
            state.room_id.clone(),
        )?,
        Action::ChangeBoardSize { size } => GameState::fresh(
            check_board_size(*size)?,
            state.game_mode,
            state.difficulty,
            state.room_id.clone(),
        )?,
        Action::ChangeGameMode { mode } => {
            let room_id = match mode {
                GameMode::Remote => state.room_id.clone(),
                _ => None,
            };
            GameState::fresh(state.board_size, *mode, state.difficulty, room_id)?
        }
        Action::ChangeDifficulty { difficulty } => GameState {
            difficulty: *difficulty,
            ..state.clone()
        },
        Action::UndoMove => undo(state)?,
        Action::JoinRemoteGame { room_id } => GameState::fresh(
            state.board_size,
            GameMode::Remote,
            state.difficulty,
            Some(room_id.clone()),
        )?,
        Action::Unknown => {
            tracing::warn!("Ignoring unrecognized action");
            state.clone()
        }
    };
    Ok(next)
}

fn make_move(state: &GameState, position: Position) -> GameState {
    if !state.is_valid_move(position) {
        tracing::debug!("Rejected move at {:?}", position);
        return state.clone();
    }

    let player = state.current_player;
    let mut board = state.board.clone();
    if board.place(position, player).is_err() {
        return state.clone();
    }
    let outcome = check_last_move(&board, position);

    GameState {
        board,
        current_player: player.opponent(),
        move_history: state.move_history.with_move(player, position),
        ..state.clone()
    }
    .with_outcome(outcome)
}

/// Drop a suffix of the history and rebuild the board from what is left.
///
/// Single-player undo takes back the computer's reply together with the
/// move that provoked it, and always hands the turn to the human. Local and
/// remote undo take back one move and flip the turn.
fn undo(state: &GameState) -> Result<GameState, EngineError> {
    let Some(last) = state.move_history.last() else {
        return Ok(state.clone());
    };

    let (drop, next_player) = match state.game_mode {
        GameMode::Single => {
            let drop = if last.player == MACHINE && state.move_history.len() >= 2 {
                2
            } else {
                1
            };
            (drop, HUMAN)
        }
        GameMode::Local | GameMode::Remote => (1, state.current_player.opponent()),
    };

    let move_history = state.move_history.without_last(drop);
    let board = move_history.replay(state.board_size)?;
    let outcome = check_board(&board);

    Ok(GameState {
        board,
        current_player: next_player,
        move_history,
        ..state.clone()
    }
    .with_outcome(outcome))
}
