use crate::config::GameConfig;
use crate::facade::GameFacade;
use crate::moves::MoveOutcome;
use crate::piece::{Color, PieceKind};
use crate::position::Position;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct MoveResult {
    outcome: Option<MoveOutcome>,
    error: Option<String>,
}

#[derive(Serialize)]
struct PromotionResult {
    ok: bool,
    error: Option<String>,
}

fn string_to_piece_kind(s: &str) -> Option<PieceKind> {
    match s {
        "Queen" => Some(PieceKind::Queen),
        "Rook" => Some(PieceKind::Rook),
        "Bishop" => Some(PieceKind::Bishop),
        "Knight" => Some(PieceKind::Knight),
        _ => None,
    }
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

/// Browser-facing game. The page calls `tick()` from `setInterval` once a
/// second and re-renders from `get_state()`.
#[wasm_bindgen]
pub struct Game {
    facade: GameFacade,
}

#[wasm_bindgen]
impl Game {
    #[wasm_bindgen(constructor)]
    pub fn new(seconds_per_side: Option<u32>) -> Game {
        let config = seconds_per_side
            .filter(|s| *s > 0)
            .map(GameConfig::with_seconds)
            .unwrap_or_default();
        Game {
            facade: GameFacade::new(config),
        }
    }

    pub fn get_state(&self) -> JsValue {
        to_js(&self.facade.view())
    }

    pub fn make_move(&mut self, from_row: i8, from_col: i8, to_row: i8, to_col: i8) -> JsValue {
        let from = Position::new(from_row, from_col);
        let to = Position::new(to_row, to_col);
        let result = match self.facade.attempt_move(from, to) {
            Ok(outcome) => MoveResult {
                outcome: Some(outcome),
                error: None,
            },
            Err(e) => MoveResult {
                outcome: None,
                error: Some(e.to_string()),
            },
        };
        to_js(&result)
    }

    pub fn promote(&mut self, kind: &str) -> JsValue {
        let result = match string_to_piece_kind(kind) {
            Some(kind) => match self.facade.resolve_promotion(kind) {
                Ok(()) => PromotionResult { ok: true, error: None },
                Err(e) => PromotionResult {
                    ok: false,
                    error: Some(e.to_string()),
                },
            },
            None => PromotionResult {
                ok: false,
                error: Some(format!("unknown piece '{kind}'")),
            },
        };
        to_js(&result)
    }

    pub fn get_legal_moves_for_square(&mut self, row: i8, col: i8) -> JsValue {
        let targets: Vec<Position> = self
            .facade
            .available_destinations(Position::new(row, col))
            .into_iter()
            .collect();
        to_js(&targets)
    }

    pub fn clock_remaining(&self, white: bool) -> u32 {
        let color = if white { Color::White } else { Color::Black };
        self.facade.clock_remaining(color)
    }

    pub fn tick(&mut self) {
        self.facade.tick();
    }

    pub fn reset(&mut self) {
        self.facade.reset();
    }
}
