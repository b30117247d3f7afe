use serde::{Deserialize, Serialize};

use crate::piece::{Color, Piece, PieceKind};
use crate::position::Position;

/// One of the 64 fixed squares. Only `occupant` ever changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Square {
    pub position: Position,
    /// Rendering tint of the square itself, not of any piece on it.
    pub tint: Color,
    pub occupant: Option<Piece>,
}

impl Square {
    fn new(position: Position) -> Self {
        let tint = if (position.row + position.col) % 2 == 0 {
            Color::Black
        } else {
            Color::White
        };
        Square {
            position,
            tint,
            occupant: None,
        }
    }
}

/// A dumb 8x8 grid: placement queries and mutations only, no rules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    squares: Vec<Square>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

impl Board {
    /// Create a board with no pieces. Useful for setting up test positions.
    pub fn empty() -> Self {
        Board {
            squares: Position::all().map(Square::new).collect(),
        }
    }

    /// Standard starting position.
    pub fn new() -> Self {
        let mut board = Board::empty();
        for (i, kind) in BACK_RANK.iter().enumerate() {
            let col = i as i8 + 1;
            for color in [Color::White, Color::Black] {
                let back = Position::new(color.back_rank(), col);
                board.place(back, Some(Piece::new(*kind, color, back)));
                let pawn = Position::new(color.pawn_start_row(), col);
                board.place(pawn, Some(Piece::new(PieceKind::Pawn, color, pawn)));
            }
        }
        board
    }

    // Squares are laid out by `Position::all()`: rank 8 first, files a..h.
    fn slot(&self, pos: Position) -> Option<usize> {
        if !pos.is_on_board() {
            return None;
        }
        let index = (8 - pos.row) as usize * 8 + (pos.col - 1) as usize;
        debug_assert_eq!(self.squares[index].position, pos);
        Some(index)
    }

    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    pub fn piece_at(&self, pos: Position) -> Option<Piece> {
        self.slot(pos).and_then(|i| self.squares[i].occupant)
    }

    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.piece_at(pos).is_none()
    }

    /// Overwrite the occupant at `pos`. The stored piece's `position` is
    /// set to `pos` so the square and the piece can never disagree.
    /// Off-grid positions are ignored.
    pub fn place(&mut self, pos: Position, piece: Option<Piece>) {
        if let Some(i) = self.slot(pos) {
            self.squares[i].occupant = piece.map(|mut p| {
                p.position = pos;
                p
            });
        }
    }

    /// Move whatever stands on `from` to `to`, returning what was on `to`.
    /// Does not touch `has_moved`.
    pub fn relocate(&mut self, from: Position, to: Position) -> Option<Piece> {
        let moving = self.piece_at(from);
        let displaced = self.piece_at(to);
        self.place(from, None);
        self.place(to, moving);
        displaced
    }

    pub fn all_pieces(&self, color: Color) -> Vec<Piece> {
        self.squares
            .iter()
            .filter_map(|sq| sq.occupant)
            .filter(|p| p.color == color)
            .collect()
    }

    pub fn find_king(&self, color: Color) -> Option<Position> {
        self.squares
            .iter()
            .filter_map(|sq| sq.occupant)
            .find(|p| p.kind == PieceKind::King && p.color == color)
            .map(|p| p.position)
    }
}
