use thiserror::Error;

use crate::game::GameStatus;
use crate::piece::{Color, PieceKind};
use crate::position::Position;

/// Why a move attempt was refused. The game is untouched in every case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("no piece at {at}")]
    NoPieceAtOrigin { at: Position },

    #[error("game is over ({status:?})")]
    GameOver { status: GameStatus },

    /// Covers wrong turn, bad shape, blocked path, capturing one's own
    /// piece and leaving one's own king in check.
    #[error("illegal move {from} -> {to}")]
    IllegalMove { from: Position, to: Position },

    #[error("a promotion on {at} must be resolved first")]
    PromotionPending { at: Position },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromotionError {
    #[error("no promotion is pending")]
    NoPendingPromotion,

    #[error("promotion belongs to {expected}, not {found}")]
    PromotionMismatch { expected: Color, found: Color },

    #[error("cannot promote to {kind}")]
    InvalidChoice { kind: PieceKind },

    #[error("game is over ({status:?})")]
    GameOver { status: GameStatus },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid game config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("time control must give each side at least one second")]
    ZeroTimeControl,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("game session has shut down")]
    Closed,
}
