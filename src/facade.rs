use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::GameConfig;
use crate::error::{MoveError, PromotionError};
use crate::game::{GameState, GameStatus};
use crate::moves::{MoveDelta, MoveOutcome, PendingPromotion};
use crate::piece::{Color, PieceKind, PieceView};
use crate::position::Position;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SquareView {
    pub position: Position,
    pub tint: Color,
    pub piece: Option<PieceView>,
}

/// Everything a renderer needs in one value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GameView {
    pub squares: Vec<SquareView>,
    pub current_player: Color,
    pub status: GameStatus,
    pub winner: Option<Color>,
    pub is_in_check: bool,
    pub pending_promotion: Option<Position>,
    pub last_move: Option<MoveDelta>,
    pub white_clock: String,
    pub black_clock: String,
    pub captured_white: Vec<PieceKind>,
    pub captured_black: Vec<PieceKind>,
}

/// The command/query surface a presentation layer drives.
#[derive(Clone, Debug, Default)]
pub struct GameFacade {
    game: GameState,
}

impl GameFacade {
    pub fn new(config: GameConfig) -> Self {
        GameFacade {
            game: GameState::new(config),
        }
    }

    pub fn from_state(game: GameState) -> Self {
        GameFacade { game }
    }

    pub fn state(&self) -> &GameState {
        &self.game
    }

    pub fn attempt_move(&mut self, from: Position, to: Position) -> Result<MoveOutcome, MoveError> {
        self.game.attempt_move(from, to)
    }

    /// Resolve the pending promotion for the side that started it.
    pub fn resolve_promotion(&mut self, kind: PieceKind) -> Result<(), PromotionError> {
        let color = self.game.current_player();
        self.game.resolve_promotion(color, kind)
    }

    pub fn pending_promotion(&self) -> Option<PendingPromotion> {
        self.game.pending_promotion()
    }

    /// Legal targets for whatever stands on `position`; empty if nothing does.
    pub fn available_destinations(&mut self, position: Position) -> BTreeSet<Position> {
        match self.game.board().piece_at(position) {
            Some(piece) => self.game.available_destinations(&piece),
            None => BTreeSet::new(),
        }
    }

    pub fn snapshot_board(&self) -> Vec<SquareView> {
        self.game
            .board()
            .squares()
            .iter()
            .map(|sq| SquareView {
                position: sq.position,
                tint: sq.tint,
                piece: sq.occupant.map(|p| p.view()),
            })
            .collect()
    }

    pub fn status(&self) -> GameStatus {
        self.game.status()
    }

    pub fn current_player(&self) -> Color {
        self.game.current_player()
    }

    pub fn clock_remaining(&self, color: Color) -> u32 {
        self.game.clock().remaining(color)
    }

    pub fn is_in_check(&self) -> bool {
        self.game.is_in_check()
    }

    pub fn tick(&mut self) {
        self.game.tick();
    }

    pub fn reset(&mut self) {
        self.game.reset();
    }

    pub fn view(&self) -> GameView {
        let clock = self.game.clock();
        GameView {
            squares: self.snapshot_board(),
            current_player: self.game.current_player(),
            status: self.game.status(),
            winner: self.game.winner(),
            is_in_check: self.game.is_in_check(),
            pending_promotion: self.game.pending_promotion().map(|p| p.position),
            last_move: self.game.last_move(),
            white_clock: clock.display(Color::White),
            black_clock: clock.display(Color::Black),
            captured_white: self.game.captured(Color::White).to_vec(),
            captured_black: self.game.captured(Color::Black).to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(row: i8, col: i8) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn snapshot_lists_all_squares_in_board_order() {
        let facade = GameFacade::default();
        let snapshot = facade.snapshot_board();
        assert_eq!(snapshot.len(), 64);
        assert_eq!(snapshot[0].position, at(8, 1));
        assert_eq!(
            snapshot[0].piece,
            Some(PieceView {
                kind: PieceKind::Rook,
                color: Color::Black
            })
        );
        assert_eq!(snapshot.iter().filter(|sq| sq.piece.is_some()).count(), 32);
    }

    #[test]
    fn rejected_move_leaves_snapshot_and_turn() {
        let mut facade = GameFacade::default();
        let snapshot = facade.snapshot_board();
        assert!(facade.attempt_move(at(2, 5), at(5, 5)).is_err());
        assert_eq!(facade.snapshot_board(), snapshot);
        assert_eq!(facade.current_player(), Color::White);
    }

    #[test]
    fn destinations_by_square() {
        let mut facade = GameFacade::default();
        let knight = facade.available_destinations(at(1, 7));
        assert_eq!(knight, BTreeSet::from([at(3, 6), at(3, 8)]));
        assert!(facade.available_destinations(at(4, 4)).is_empty());
    }

    #[test]
    fn view_serializes_for_the_frontend() {
        let mut facade = GameFacade::default();
        facade.attempt_move(at(2, 5), at(4, 5)).unwrap();
        let view = facade.view();
        assert_eq!(view.white_clock, "30:00");
        assert_eq!(view.current_player, Color::Black);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["status"], "InProgress");
        assert_eq!(json["last_move"]["to"]["row"], 4);
        assert_eq!(json["squares"].as_array().map(Vec::len), Some(64));
    }

    #[test]
    fn promotion_through_the_facade() {
        use crate::board::Board;
        use crate::piece::Piece;

        let mut board = Board::empty();
        for (kind, color, pos) in [
            (PieceKind::King, Color::White, at(1, 5)),
            (PieceKind::King, Color::Black, at(5, 8)),
            (PieceKind::Pawn, Color::Black, at(2, 1)),
        ] {
            board.place(pos, Some(Piece::new(kind, color, pos)));
        }
        let state = GameState::from_board(board, Color::Black, GameConfig::default());
        let mut facade = GameFacade::from_state(state);

        assert!(matches!(
            facade.attempt_move(at(2, 1), at(1, 1)),
            Ok(MoveOutcome::AwaitingPromotion { .. })
        ));
        assert!(facade.available_destinations(at(1, 5)).is_empty());
        facade.resolve_promotion(PieceKind::Rook).unwrap();

        assert_eq!(facade.status(), GameStatus::InProgress);
        assert!(facade.is_in_check(), "rook on a1 checks e1");
        assert_eq!(facade.current_player(), Color::White);
    }
}
