use std::fmt;

use serde::{Deserialize, Serialize};

/// A board coordinate. `row` 1 is white's back rank, `col` 1 is the a-file.
///
/// Values outside 1..=8 are representable so that offset arithmetic
/// (castling, en passant, move shapes) never has to special-case the edge;
/// use [`Position::is_on_board`] before trusting one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    pub const fn new(row: i8, col: i8) -> Self {
        Position { row, col }
    }

    pub fn is_on_board(&self) -> bool {
        (1..=8).contains(&self.row) && (1..=8).contains(&self.col)
    }

    pub fn offset(&self, d_row: i8, d_col: i8) -> Position {
        Position {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }

    /// All 64 on-board positions, rank 8 first, a-file to h-file within a rank.
    pub fn all() -> impl Iterator<Item = Position> {
        (1..=8)
            .rev()
            .flat_map(|row| (1..=8).map(move |col| Position { row, col }))
    }

    /// Squares strictly between `self` and `other` along a rank, file or
    /// diagonal. Empty when the two are adjacent or not aligned.
    pub fn between(&self, other: Position) -> Vec<Position> {
        let d_row = other.row - self.row;
        let d_col = other.col - self.col;
        let aligned = d_row == 0 || d_col == 0 || d_row.abs() == d_col.abs();
        if !aligned {
            return Vec::new();
        }
        let steps = d_row.abs().max(d_col.abs());
        let (step_row, step_col) = (d_row.signum(), d_col.signum());
        (1..steps)
            .map(|i| self.offset(step_row * i, step_col * i))
            .collect()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_on_board() {
            let file = (b'a' + (self.col - 1) as u8) as char;
            write!(f, "{file}{}", self.row)
        } else {
            write!(f, "({}, {})", self.row, self.col)
        }
    }
}
