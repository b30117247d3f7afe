use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::board::Board;
use crate::clock::Clock;
use crate::config::{ClockStart, GameConfig};
use crate::error::{MoveError, PromotionError};
use crate::moves::{EnPassantTarget, MoveDelta, MoveOutcome, PendingPromotion};
use crate::piece::{Color, Piece, PieceKind};
use crate::position::Position;
use crate::validator::{is_king_in_check_on, MoveValidator, TurnContext};

/// Once a game leaves `InProgress` only [`GameState::reset`] brings it back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Checkmate,
    Stalemate,
    Timeout,
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        *self != GameStatus::InProgress
    }
}

/// Board, turn, transient move state and clock for one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GameState {
    config: GameConfig,
    board: Board,
    current_player: Color,
    status: GameStatus,
    en_passant: Option<EnPassantTarget>,
    pending_promotion: Option<PendingPromotion>,
    clock: Clock,
    last_move: Option<MoveDelta>,
    captured_white: Vec<PieceKind>,
    captured_black: Vec<PieceKind>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl GameState {
    pub fn new(config: GameConfig) -> Self {
        Self::from_board(Board::new(), Color::White, config)
    }

    /// Start from an arbitrary position. Useful for setting up test positions.
    pub fn from_board(board: Board, to_move: Color, config: GameConfig) -> Self {
        let mut clock = Clock::new(config.seconds_per_side);
        if config.clock_start == ClockStart::Immediately {
            clock.start(to_move);
        }
        GameState {
            config,
            board,
            current_player: to_move,
            status: GameStatus::InProgress,
            en_passant: None,
            pending_promotion: None,
            clock,
            last_move: None,
            captured_white: Vec::new(),
            captured_black: Vec::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Color {
        self.current_player
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn en_passant(&self) -> Option<EnPassantTarget> {
        self.en_passant
    }

    pub fn pending_promotion(&self) -> Option<PendingPromotion> {
        self.pending_promotion
    }

    pub fn last_move(&self) -> Option<MoveDelta> {
        self.last_move
    }

    /// Kinds of `color`'s pieces that have been taken.
    pub fn captured(&self, color: Color) -> &[PieceKind] {
        match color {
            Color::White => &self.captured_white,
            Color::Black => &self.captured_black,
        }
    }

    pub fn is_in_check(&self) -> bool {
        is_king_in_check_on(&self.board, self.current_player)
    }

    pub fn winner(&self) -> Option<Color> {
        match self.status {
            GameStatus::Checkmate => Some(self.current_player.opposite()),
            GameStatus::Timeout => self.clock.flagged().map(|c| c.opposite()),
            GameStatus::InProgress | GameStatus::Stalemate => None,
        }
    }

    fn turn_context(&self) -> TurnContext {
        TurnContext {
            to_move: self.current_player,
            en_passant: self.en_passant,
        }
    }

    pub fn validator(&mut self) -> MoveValidator<'_> {
        let ctx = self.turn_context();
        MoveValidator::new(&mut self.board, ctx)
    }

    #[instrument(skip(self))]
    pub fn attempt_move(&mut self, from: Position, to: Position) -> Result<MoveOutcome, MoveError> {
        let piece = self
            .board
            .piece_at(from)
            .ok_or(MoveError::NoPieceAtOrigin { at: from })?;
        if self.status.is_over() {
            return Err(MoveError::GameOver { status: self.status });
        }
        if let Some(pending) = self.pending_promotion {
            return Err(MoveError::PromotionPending { at: pending.position });
        }
        if !self.validator().is_legal_move(&piece, from, to) {
            debug!(kind = %piece.kind, color = %piece.color, "rejected move");
            return Err(MoveError::IllegalMove { from, to });
        }

        if MoveValidator::is_promotion(&piece, to) {
            debug!("promotion pending");
            self.pending_promotion = Some(PendingPromotion {
                piece,
                from,
                position: to,
                color: piece.color,
            });
            return Ok(MoveOutcome::AwaitingPromotion { from, at: to });
        }

        let delta = self.apply_move(piece, from, to);
        self.finish_turn(delta);
        Ok(MoveOutcome::Applied(delta))
    }

    /// Relocate `piece` with everything the move implies: capture,
    /// en passant removal, castling rook, `has_moved` and the new
    /// en passant window.
    fn apply_move(&mut self, piece: Piece, from: Position, to: Position) -> MoveDelta {
        let victim = self.validator().en_passant_victim(&piece, from, to);
        let castled = MoveValidator::castle_side(&piece, from, to);

        let mut captured = self.board.relocate(from, to);
        if let Some(v) = victim {
            captured = self.board.piece_at(v);
            self.board.place(v, None);
        }
        if let Some(mut moved) = self.board.piece_at(to) {
            moved.has_moved = true;
            self.board.place(to, Some(moved));
        }
        if let Some(side) = castled {
            self.validator().execute_castling(side, &piece, from, to);
        }
        if let Some(c) = captured {
            match c.color {
                Color::White => self.captured_white.push(c.kind),
                Color::Black => self.captured_black.push(c.kind),
            }
        }

        let dir = piece.color.forward();
        self.en_passant = (piece.kind == PieceKind::Pawn && to.row - from.row == 2 * dir).then(|| {
            EnPassantTarget {
                color: piece.color,
                position: from.offset(dir, 0),
            }
        });

        MoveDelta {
            from,
            to,
            captured: captured.map(|c| c.view()),
            castled,
            en_passant: victim.is_some(),
            promoted_to: None,
        }
    }

    fn finish_turn(&mut self, delta: MoveDelta) {
        debug!(from = %delta.from, to = %delta.to, "move applied");
        self.last_move = Some(delta);
        self.current_player = self.current_player.opposite();
        self.clock.start(self.current_player);

        let side = self.current_player;
        let mut validator = self.validator();
        if validator.has_legal_move(side) {
            return;
        }
        let in_check = validator.is_king_in_check(side);
        self.clock.stop();
        self.status = if in_check {
            GameStatus::Checkmate
        } else {
            GameStatus::Stalemate
        };
        info!(status = ?self.status, loser = %side, "game over");
    }

    /// Complete a held promotion with `kind`, on behalf of `color`.
    #[instrument(skip(self))]
    pub fn resolve_promotion(&mut self, color: Color, kind: PieceKind) -> Result<(), PromotionError> {
        let pending = self
            .pending_promotion
            .ok_or(PromotionError::NoPendingPromotion)?;
        if pending.color != color {
            return Err(PromotionError::PromotionMismatch {
                expected: pending.color,
                found: color,
            });
        }
        if !kind.is_promotion_choice() {
            return Err(PromotionError::InvalidChoice { kind });
        }
        if self.status.is_over() {
            return Err(PromotionError::GameOver { status: self.status });
        }

        self.pending_promotion = None;
        let mut delta = self.apply_move(pending.piece, pending.from, pending.position);
        let mut promoted = Piece::new(kind, color, pending.position);
        promoted.has_moved = true;
        self.board.place(pending.position, Some(promoted));
        delta.promoted_to = Some(kind);
        self.finish_turn(delta);
        Ok(())
    }

    /// Where the piece may go right now. Empty while the game is over, a
    /// promotion is pending, or it is not that piece's turn.
    pub fn available_destinations(&mut self, piece: &Piece) -> BTreeSet<Position> {
        if self.status.is_over() || self.pending_promotion.is_some() {
            return BTreeSet::new();
        }
        self.validator().legal_destinations(piece)
    }

    /// One second of wall time passed.
    pub fn tick(&mut self) {
        if self.status.is_over() {
            return;
        }
        self.clock.tick();
        self.observe_clock();
    }

    /// Turn an expired clock into a timeout. Returns whether that happened.
    pub fn observe_clock(&mut self) -> bool {
        if self.status.is_over() || !self.clock.has_expired() {
            return false;
        }
        self.clock.stop();
        self.status = GameStatus::Timeout;
        info!(flagged = ?self.clock.flagged(), "game over on time");
        true
    }

    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        *self = GameState::new(self.config.clone());
        info!("game reset");
    }
}
