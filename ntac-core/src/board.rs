//! Square board geometry and cell storage

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Smallest supported side length
pub const MIN_BOARD_SIZE: usize = 3;

/// Largest supported side length
pub const MAX_BOARD_SIZE: usize = 10;

/// Player mark. X always moves first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }
}

/// A cell is either empty or holds one mark
pub type Cell = Option<Mark>;

/// Board coordinates (row, column), both zero-based
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Check if this position is on a board of the given size
    pub fn in_bounds(&self, size: usize) -> bool {
        self.row < size && self.col < size
    }

    /// On the main diagonal (row == col)
    pub fn on_main_diagonal(&self) -> bool {
        self.row == self.col
    }

    /// On the anti-diagonal (row + col == size - 1)
    pub fn on_anti_diagonal(&self, size: usize) -> bool {
        self.row + self.col + 1 == size
    }
}

/// Validate a requested side length
pub fn check_board_size(size: usize) -> Result<usize, GameError> {
    if (MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
        Ok(size)
    } else {
        Err(GameError::InvalidBoardSize(size))
    }
}

/// N x N grid of cells (row-major)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board, rejecting sizes outside [3, 10]
    pub fn new(size: usize) -> Result<Self, GameError> {
        let size = check_board_size(size)?;
        Ok(Self {
            size,
            cells: vec![None; size * size],
        })
    }

    /// Build a board from rows. Used by tests and snapshot tooling.
    pub fn from_rows(rows: &[Vec<Cell>]) -> Result<Self, GameError> {
        let mut board = Board::new(rows.len())?;
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != board.size {
                return Err(GameError::InvalidBoardSize(cells.len()));
            }
            for (col, &cell) in cells.iter().enumerate() {
                board.cells[row * board.size + col] = cell;
            }
        }
        Ok(board)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Cell at position, None when out of range
    pub fn get(&self, pos: Position) -> Option<Cell> {
        if pos.in_bounds(self.size) {
            Some(self.cells[pos.row * self.size + pos.col])
        } else {
            None
        }
    }

    /// Mark at position (empty and out-of-range both give None)
    pub fn mark_at(&self, pos: Position) -> Option<Mark> {
        self.get(pos).flatten()
    }

    /// In range and empty
    pub fn is_open(&self, pos: Position) -> bool {
        self.get(pos) == Some(None)
    }

    /// Place a mark on an open cell
    pub fn place(&mut self, pos: Position, mark: Mark) -> Result<(), GameError> {
        match self.get(pos) {
            None => Err(GameError::OutOfBounds(pos)),
            Some(Some(_)) => Err(GameError::Occupied(pos)),
            Some(None) => {
                self.cells[pos.row * self.size + pos.col] = Some(mark);
                Ok(())
            }
        }
    }

    /// Copy of this board with one more mark
    pub fn with_mark(&self, pos: Position, mark: Mark) -> Result<Self, GameError> {
        let mut next = self.clone();
        next.place(pos, mark)?;
        Ok(next)
    }

    /// Empty positions in row-major order, recomputed on every call
    pub fn empty_positions(&self) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(i, _)| Position::new(i / self.size, i % self.size))
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Number of marks on the board
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Rows as vectors of cells (for rendering and snapshots)
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.size)
    }

    /// All winning lines: rows, then columns, then main and anti diagonal
    pub fn lines(&self) -> Vec<Vec<Position>> {
        let n = self.size;
        let mut lines = Vec::with_capacity(2 * n + 2);
        lines.extend((0..n).map(|r| row_line(n, r)));
        lines.extend((0..n).map(|c| col_line(n, c)));
        lines.push(main_diagonal(n));
        lines.push(anti_diagonal(n));
        lines
    }

    /// Lines passing through a given cell, in the same order as `lines`
    pub fn lines_through(&self, pos: Position) -> Vec<Vec<Position>> {
        let n = self.size;
        let mut lines = vec![row_line(n, pos.row), col_line(n, pos.col)];
        if pos.on_main_diagonal() {
            lines.push(main_diagonal(n));
        }
        if pos.on_anti_diagonal(n) {
            lines.push(anti_diagonal(n));
        }
        lines
    }
}

fn row_line(n: usize, row: usize) -> Vec<Position> {
    (0..n).map(|col| Position::new(row, col)).collect()
}

fn col_line(n: usize, col: usize) -> Vec<Position> {
    (0..n).map(|row| Position::new(row, col)).collect()
}

fn main_diagonal(n: usize) -> Vec<Position> {
    (0..n).map(|i| Position::new(i, i)).collect()
}

fn anti_diagonal(n: usize) -> Vec<Position> {
    (0..n).map(|i| Position::new(i, n - 1 - i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_size_range() {
        assert!(Board::new(2).is_err());
        assert!(Board::new(11).is_err());
        for n in MIN_BOARD_SIZE..=MAX_BOARD_SIZE {
            let board = Board::new(n).unwrap();
            assert_eq!(board.size(), n);
            assert!(board.is_empty());
            assert_eq!(board.empty_positions().len(), n * n);
        }
    }

    #[test]
    fn test_place_and_reject() {
        let mut board = Board::new(3).unwrap();
        board.place(Position::new(1, 1), Mark::X).unwrap();
        assert_eq!(board.mark_at(Position::new(1, 1)), Some(Mark::X));
        assert_eq!(
            board.place(Position::new(1, 1), Mark::O),
            Err(GameError::Occupied(Position::new(1, 1)))
        );
        assert_eq!(
            board.place(Position::new(3, 0), Mark::O),
            Err(GameError::OutOfBounds(Position::new(3, 0)))
        );
        assert!(!board.is_open(Position::new(1, 1)));
        assert!(!board.is_open(Position::new(0, 9)));
    }

    #[test]
    fn test_empty_positions_row_major() {
        let mut board = Board::new(3).unwrap();
        board.place(Position::new(0, 1), Mark::X).unwrap();
        let open = board.empty_positions();
        assert_eq!(open[0], Position::new(0, 0));
        assert_eq!(open[1], Position::new(0, 2));
        assert_eq!(open.last(), Some(&Position::new(2, 2)));
        assert_eq!(open.len(), 8);
    }

    #[test]
    fn test_lines_through() {
        let board = Board::new(3).unwrap();
        // Center sits on both diagonals
        assert_eq!(board.lines_through(Position::new(1, 1)).len(), 4);
        // Edge midpoint only has its row and column
        assert_eq!(board.lines_through(Position::new(0, 1)).len(), 2);
        assert_eq!(board.lines().len(), 8);

        let board = Board::new(4).unwrap();
        // No center cell on an even board
        assert_eq!(board.lines_through(Position::new(1, 2)).len(), 3);
        assert_eq!(board.lines().len(), 10);
    }
}
