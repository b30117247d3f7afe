pub mod board;
pub mod clock;
pub mod config;
pub mod error;
pub mod facade;
pub mod game;
pub mod moves;
pub mod piece;
pub mod position;
pub mod validator;

#[cfg(not(target_arch = "wasm32"))]
pub mod session;

#[cfg(target_arch = "wasm32")]
mod wasm_api;

pub use config::{ClockStart, GameConfig};
pub use error::{ConfigError, MoveError, PromotionError, SessionError};
pub use facade::{GameFacade, GameView, SquareView};
pub use game::{GameState, GameStatus};
pub use moves::{MoveDelta, MoveOutcome};
pub use piece::{Color, Piece, PieceKind, PieceView};
pub use position::Position;
