//! Text rendering of game snapshots

use ntac_engine::{GameMode, GameState, Score, HUMAN};

/// Board as a grid with row and column indices
pub fn render_board(state: &GameState) -> String {
    let size = state.board_size;
    let mut out = String::new();

    out.push_str("   ");
    for col in 0..size {
        out.push_str(&format!("{col} "));
    }
    out.push('\n');

    for (row, cells) in state.board.rows().enumerate() {
        out.push_str(&format!("{row:>2} "));
        for cell in cells {
            out.push(cell.map(|m| m.symbol()).unwrap_or('.'));
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

/// One-line summary of whose turn it is or how the game ended
pub fn render_status(state: &GameState) -> String {
    if let Some(winner) = state.winner {
        let line: Vec<String> = state
            .winning_line
            .iter()
            .flatten()
            .map(|p| format!("({},{})", p.row, p.col))
            .collect();
        return format!("{} wins along {}", winner.symbol(), line.join(" "));
    }
    if state.is_draw {
        return "Draw".to_string();
    }
    match state.game_mode {
        GameMode::Single if state.current_player != HUMAN => "Computer is thinking...".to_string(),
        _ => format!("{} to move", state.current_player.symbol()),
    }
}

pub fn render_score(score: &Score) -> String {
    format!(
        "Score: X {} / O {} / draws {}",
        score.x_wins, score.o_wins, score.draws
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ntac_core::{Difficulty, Mark, Position};
    use ntac_engine::{reduce, Action};

    fn play(moves: &[(usize, usize)]) -> GameState {
        let mut state = GameState::fresh(3, GameMode::Local, Difficulty::Easy, None).unwrap();
        for &(r, c) in moves {
            state = reduce(&state, &Action::make_move(r, c)).unwrap();
        }
        state
    }

    #[test]
    fn test_render_board() {
        let state = play(&[(0, 0), (1, 1)]);
        assert_eq!(render_board(&state), "   0 1 2 \n 0 X . . \n 1 . O . \n 2 . . . \n");
    }

    #[test]
    fn test_render_status() {
        assert_eq!(render_status(&play(&[])), "X to move");
        assert_eq!(render_status(&play(&[(0, 0)])), "O to move");

        let won = play(&[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);
        assert_eq!(won.winner, Some(Mark::X));
        assert_eq!(render_status(&won), "X wins along (0,0) (0,1) (0,2)");
        assert!(won.winning_line.as_ref().unwrap().contains(&Position::new(0, 2)));
    }

    #[test]
    fn test_render_score() {
        let score = Score {
            x_wins: 2,
            o_wins: 1,
            draws: 3,
        };
        assert_eq!(render_score(&score), "Score: X 2 / O 1 / draws 3");
    }
}
