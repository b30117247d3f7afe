use serde::{Deserialize, Serialize};

use crate::piece::{Color, Piece, PieceKind, PieceView};
use crate::position::Position;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    /// Column of the rook that castles on this side.
    pub fn rook_col(&self) -> i8 {
        match self {
            CastleSide::Kingside => 8,
            CastleSide::Queenside => 1,
        }
    }

    /// Column the rook lands on.
    pub fn rook_target_col(&self) -> i8 {
        match self {
            CastleSide::Kingside => 6,
            CastleSide::Queenside => 4,
        }
    }

    /// Column the king lands on.
    pub fn king_target_col(&self) -> i8 {
        match self {
            CastleSide::Kingside => 7,
            CastleSide::Queenside => 3,
        }
    }
}

/// The square a pawn skipped over on a double step. Lives for exactly one
/// reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnPassantTarget {
    pub color: Color,
    pub position: Position,
}

/// A pawn move onto the last rank, held open until a piece is chosen.
/// The board still shows the pawn on `from`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingPromotion {
    pub piece: Piece,
    pub from: Position,
    pub position: Position,
    pub color: Color,
}

/// What a completed move changed, for highlighting and animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveDelta {
    pub from: Position,
    pub to: Position,
    pub captured: Option<PieceView>,
    pub castled: Option<CastleSide>,
    pub en_passant: bool,
    pub promoted_to: Option<PieceKind>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    Applied(MoveDelta),
    AwaitingPromotion { from: Position, at: Position },
}
