// =============================================================================
// Move legality
//
// Every rule is a pure function of the board plus a small TurnContext (who is
// to move, which square is open for en passant). King safety is tested by
// playing the move on the real board inside a `Simulation`, which restores
// every square it touched when dropped, including during a panic unwind.
//
// Movement shape and attack pattern are the same thing for every piece except
// pawns (attack diagonally whether or not anything stands there) and kings
// (attack adjacent squares without asking whether that would be safe, which
// would otherwise recurse forever).
// =============================================================================

use std::collections::BTreeSet;

use crate::board::Board;
use crate::moves::{CastleSide, EnPassantTarget};
use crate::piece::{Color, Piece, PieceKind};
use crate::position::Position;

/// The part of game state the rules need besides the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnContext {
    pub to_move: Color,
    pub en_passant: Option<EnPassantTarget>,
}

/// Tentative edits to a board, undone on drop.
pub(crate) struct Simulation<'b> {
    board: &'b mut Board,
    saved: Vec<(Position, Option<Piece>)>,
}

impl<'b> Simulation<'b> {
    pub(crate) fn begin(board: &'b mut Board) -> Self {
        Simulation {
            board,
            saved: Vec::with_capacity(3),
        }
    }

    pub(crate) fn set(&mut self, pos: Position, piece: Option<Piece>) {
        if !self.saved.iter().any(|(p, _)| *p == pos) {
            self.saved.push((pos, self.board.piece_at(pos)));
        }
        self.board.place(pos, piece);
    }

    pub(crate) fn board(&self) -> &Board {
        self.board
    }
}

impl Drop for Simulation<'_> {
    fn drop(&mut self) {
        for (pos, piece) in self.saved.drain(..).rev() {
            self.board.place(pos, piece);
        }
    }
}

// -----------------------------------------------------------------------------
// Attack patterns (board only, no turn or safety)
// -----------------------------------------------------------------------------

fn is_path_clear(board: &Board, from: Position, to: Position) -> bool {
    from.between(to).into_iter().all(|p| board.is_empty_at(p))
}

fn is_rook_line(from: Position, to: Position) -> bool {
    (from.row == to.row) != (from.col == to.col)
}

fn is_bishop_line(from: Position, to: Position) -> bool {
    let d_row = (to.row - from.row).abs();
    d_row != 0 && d_row == (to.col - from.col).abs()
}

fn is_knight_jump(from: Position, to: Position) -> bool {
    let d_row = (to.row - from.row).abs();
    let d_col = (to.col - from.col).abs();
    (d_row == 2 && d_col == 1) || (d_row == 1 && d_col == 2)
}

fn is_king_step(from: Position, to: Position) -> bool {
    let d_row = (to.row - from.row).abs();
    let d_col = (to.col - from.col).abs();
    d_row <= 1 && d_col <= 1 && (d_row, d_col) != (0, 0)
}

/// Can `attacker` (standing on its own `position`) strike `target`?
fn attacks(board: &Board, attacker: &Piece, target: Position) -> bool {
    let from = attacker.position;
    if from == target {
        return false;
    }
    match attacker.kind {
        PieceKind::Pawn => {
            target.row - from.row == attacker.color.forward() && (target.col - from.col).abs() == 1
        }
        PieceKind::Knight => is_knight_jump(from, target),
        PieceKind::King => is_king_step(from, target),
        PieceKind::Rook => is_rook_line(from, target) && is_path_clear(board, from, target),
        PieceKind::Bishop => is_bishop_line(from, target) && is_path_clear(board, from, target),
        PieceKind::Queen => {
            (is_rook_line(from, target) || is_bishop_line(from, target))
                && is_path_clear(board, from, target)
        }
    }
}

/// True if any piece of the color opposing `defender` attacks `position`.
pub fn is_attacked_on(board: &Board, position: Position, defender: Color) -> bool {
    board
        .all_pieces(defender.opposite())
        .iter()
        .any(|p| attacks(board, p, position))
}

/// A side with no king on the board is never in check.
pub fn is_king_in_check_on(board: &Board, color: Color) -> bool {
    board
        .find_king(color)
        .map(|k| is_attacked_on(board, k, color))
        .unwrap_or(false)
}

// -----------------------------------------------------------------------------
// Validator
// -----------------------------------------------------------------------------

pub struct MoveValidator<'a> {
    board: &'a mut Board,
    ctx: TurnContext,
}

impl<'a> MoveValidator<'a> {
    pub fn new(board: &'a mut Board, ctx: TurnContext) -> Self {
        MoveValidator { board, ctx }
    }

    pub fn board(&self) -> &Board {
        self.board
    }

    /// Full legality: turn, occupancy, shape, path and king safety.
    pub fn is_legal_move(&mut self, piece: &Piece, from: Position, to: Position) -> bool {
        if piece.color != self.ctx.to_move || from == to {
            return false;
        }
        if !from.is_on_board() || !to.is_on_board() {
            return false;
        }
        if self
            .board
            .piece_at(to)
            .map(|p| p.color == piece.color)
            .unwrap_or(false)
        {
            return false;
        }
        if !self.follows_shape(piece, from, to) {
            return false;
        }
        self.is_king_safe_after(piece, from, to)
    }

    fn follows_shape(&self, piece: &Piece, from: Position, to: Position) -> bool {
        match piece.kind {
            PieceKind::Pawn => self.is_pawn_move(piece, from, to),
            PieceKind::Rook => is_rook_line(from, to) && is_path_clear(self.board, from, to),
            PieceKind::Knight => is_knight_jump(from, to),
            PieceKind::Bishop => is_bishop_line(from, to) && is_path_clear(self.board, from, to),
            PieceKind::Queen => {
                (is_rook_line(from, to) || is_bishop_line(from, to))
                    && is_path_clear(self.board, from, to)
            }
            PieceKind::King => {
                (is_king_step(from, to) && !self.is_attacked(to, piece.color))
                    || Self::castle_side(piece, from, to)
                        .map(|side| self.is_castling_legal(side, piece, from, to))
                        .unwrap_or(false)
            }
        }
    }

    fn is_pawn_move(&self, pawn: &Piece, from: Position, to: Position) -> bool {
        let dir = pawn.color.forward();
        let d_row = to.row - from.row;
        let d_col = to.col - from.col;

        if d_col == 0 {
            if d_row == dir {
                return self.board.is_empty_at(to);
            }
            if d_row == 2 * dir && from.row == pawn.color.pawn_start_row() {
                return self.board.is_empty_at(from.offset(dir, 0)) && self.board.is_empty_at(to);
            }
            return false;
        }

        if d_col.abs() == 1 && d_row == dir {
            return match self.board.piece_at(to) {
                Some(target) => target.color != pawn.color,
                None => self.en_passant_victim(pawn, from, to).is_some(),
            };
        }

        false
    }

    /// If moving `piece` from `from` to `to` is an en passant capture,
    /// the square of the pawn it removes.
    pub fn en_passant_victim(&self, piece: &Piece, from: Position, to: Position) -> Option<Position> {
        if piece.kind != PieceKind::Pawn {
            return None;
        }
        let target = self.ctx.en_passant?;
        if target.color == piece.color || target.position != to {
            return None;
        }
        if to.row - from.row != piece.color.forward() || (to.col - from.col).abs() != 1 {
            return None;
        }
        if !self.board.is_empty_at(to) {
            return None;
        }
        let victim = Position::new(from.row, to.col);
        self.board
            .piece_at(victim)
            .filter(|p| p.kind == PieceKind::Pawn && p.color == target.color)
            .map(|_| victim)
    }

    fn is_king_safe_after(&mut self, piece: &Piece, from: Position, to: Position) -> bool {
        let victim = self.en_passant_victim(piece, from, to);
        let mut sim = Simulation::begin(self.board);
        if let Some(v) = victim {
            sim.set(v, None);
        }
        sim.set(to, Some(*piece));
        sim.set(from, None);
        let safe = !is_king_in_check_on(sim.board(), piece.color);
        safe
    }

    /// Is `position` attacked by the side opposing `defender`?
    pub fn is_attacked(&self, position: Position, defender: Color) -> bool {
        is_attacked_on(self.board, position, defender)
    }

    pub fn is_king_in_check(&self, color: Color) -> bool {
        is_king_in_check_on(self.board, color)
    }

    /// Which way a king is trying to castle, judged by shape alone.
    pub fn castle_side(king: &Piece, from: Position, to: Position) -> Option<CastleSide> {
        if king.kind != PieceKind::King || from.row != to.row {
            return None;
        }
        match to.col - from.col {
            2 => Some(CastleSide::Kingside),
            -2 => Some(CastleSide::Queenside),
            _ => None,
        }
    }

    /// Checks unmoved king and rook, empty squares between them, and that no
    /// square the king stands on or crosses (`from` and `to` included) is
    /// attacked. Does not move anything.
    pub fn is_castling_legal(&self, side: CastleSide, king: &Piece, from: Position, to: Position) -> bool {
        if king.kind != PieceKind::King || king.has_moved {
            return false;
        }
        let rank = king.color.back_rank();
        if from != Position::new(rank, 5) || to != Position::new(rank, side.king_target_col()) {
            return false;
        }

        let rook_at = Position::new(rank, side.rook_col());
        let rook_ok = self
            .board
            .piece_at(rook_at)
            .map(|r| r.kind == PieceKind::Rook && r.color == king.color && !r.has_moved)
            .unwrap_or(false);
        if !rook_ok || !is_path_clear(self.board, from, rook_at) {
            return false;
        }

        std::iter::once(from)
            .chain(from.between(to))
            .chain(std::iter::once(to))
            .all(|p| !self.is_attacked(p, king.color))
    }

    /// Moves the castling rook. Call only after the king's own move has
    /// been validated and applied.
    pub fn execute_castling(&mut self, side: CastleSide, king: &Piece, from: Position, to: Position) {
        debug_assert_eq!(Self::castle_side(king, from, to), Some(side));
        let rook_from = Position::new(from.row, side.rook_col());
        let rook_to = Position::new(from.row, side.rook_target_col());
        self.board.relocate(rook_from, rook_to);
        if let Some(mut rook) = self.board.piece_at(rook_to) {
            rook.has_moved = true;
            self.board.place(rook_to, Some(rook));
        }
    }

    pub fn is_promotion(piece: &Piece, to: Position) -> bool {
        piece.kind == PieceKind::Pawn && to.row == piece.color.promotion_row()
    }

    /// Every square `piece` may legally move to from where it stands.
    pub fn legal_destinations(&mut self, piece: &Piece) -> BTreeSet<Position> {
        Position::all()
            .filter(|to| self.is_legal_move(piece, piece.position, *to))
            .collect()
    }

    /// Evaluated as if `color` were to move, whatever the context says.
    pub fn has_legal_move(&mut self, color: Color) -> bool {
        let ctx = TurnContext {
            to_move: color,
            ..self.ctx
        };
        let mut as_mover = MoveValidator::new(&mut *self.board, ctx);
        let pieces = as_mover.board.all_pieces(color);
        pieces.iter().any(|piece| {
            Position::all().any(|to| as_mover.is_legal_move(piece, piece.position, to))
        })
    }

    /// No legal move and the king is attacked.
    pub fn is_checkmate(&mut self, color: Color) -> bool {
        self.is_king_in_check(color) && !self.has_legal_move(color)
    }

    /// No legal move and the king is not attacked.
    pub fn is_stalemate(&mut self, color: Color) -> bool {
        !self.is_king_in_check(color) && !self.has_legal_move(color)
    }
}
