//! A game behind a single task, so moves and clock ticks are handled one at
//! a time in arrival order.
//!
//! Each command travels over one mpsc channel and is answered on a oneshot.
//! The clock's one-second interval is polled in the same `select!` loop,
//! ahead of commands, so a clock that ran out before a move was dequeued
//! ends the game before that move is looked at.

use std::collections::BTreeSet;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tracing::{debug, instrument};

use crate::config::GameConfig;
use crate::error::{MoveError, PromotionError, SessionError};
use crate::facade::{GameFacade, GameView, SquareView};
use crate::game::GameStatus;
use crate::moves::MoveOutcome;
use crate::piece::{Color, PieceKind};
use crate::position::Position;

const TICK: Duration = Duration::from_secs(1);
const QUEUE_DEPTH: usize = 32;

enum Command {
    AttemptMove {
        from: Position,
        to: Position,
        reply: oneshot::Sender<Result<MoveOutcome, MoveError>>,
    },
    ResolvePromotion {
        kind: PieceKind,
        reply: oneshot::Sender<Result<(), PromotionError>>,
    },
    Destinations {
        from: Position,
        reply: oneshot::Sender<BTreeSet<Position>>,
    },
    Snapshot {
        reply: oneshot::Sender<Vec<SquareView>>,
    },
    View {
        reply: oneshot::Sender<GameView>,
    },
    Status {
        reply: oneshot::Sender<(GameStatus, Color)>,
    },
    ClockRemaining {
        color: Color,
        reply: oneshot::Sender<u32>,
    },
    Reset {
        reply: oneshot::Sender<()>,
    },
}

/// Cheap to clone; the game lives until the last handle is dropped.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    tx: mpsc::Sender<Command>,
}

/// Spawn the game task on the current tokio runtime.
pub fn spawn(config: GameConfig) -> SessionHandle {
    let (tx, rx) = mpsc::channel(QUEUE_DEPTH);
    tokio::spawn(run(GameFacade::new(config), rx));
    SessionHandle { tx }
}

#[instrument(skip_all)]
async fn run(mut facade: GameFacade, mut rx: mpsc::Receiver<Command>) {
    let mut ticks = time::interval_at(Instant::now() + TICK, TICK);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Burst);

    loop {
        tokio::select! {
            biased;
            _ = ticks.tick() => facade.tick(),
            cmd = rx.recv() => match cmd {
                Some(cmd) => handle(&mut facade, cmd),
                None => break,
            },
        }
    }
    debug!("all handles dropped, session closed");
}

// A dropped reply receiver only means the caller stopped waiting.
fn handle(facade: &mut GameFacade, cmd: Command) {
    match cmd {
        Command::AttemptMove { from, to, reply } => {
            let _ = reply.send(facade.attempt_move(from, to));
        }
        Command::ResolvePromotion { kind, reply } => {
            let _ = reply.send(facade.resolve_promotion(kind));
        }
        Command::Destinations { from, reply } => {
            let _ = reply.send(facade.available_destinations(from));
        }
        Command::Snapshot { reply } => {
            let _ = reply.send(facade.snapshot_board());
        }
        Command::View { reply } => {
            let _ = reply.send(facade.view());
        }
        Command::Status { reply } => {
            let _ = reply.send((facade.status(), facade.current_player()));
        }
        Command::ClockRemaining { color, reply } => {
            let _ = reply.send(facade.clock_remaining(color));
        }
        Command::Reset { reply } => {
            facade.reset();
            let _ = reply.send(());
        }
    }
}

impl SessionHandle {
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(build(reply))
            .await
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    pub async fn attempt_move(
        &self,
        from: Position,
        to: Position,
    ) -> Result<Result<MoveOutcome, MoveError>, SessionError> {
        self.request(|reply| Command::AttemptMove { from, to, reply })
            .await
    }

    pub async fn resolve_promotion(
        &self,
        kind: PieceKind,
    ) -> Result<Result<(), PromotionError>, SessionError> {
        self.request(|reply| Command::ResolvePromotion { kind, reply })
            .await
    }

    pub async fn available_destinations(
        &self,
        from: Position,
    ) -> Result<BTreeSet<Position>, SessionError> {
        self.request(|reply| Command::Destinations { from, reply })
            .await
    }

    pub async fn snapshot_board(&self) -> Result<Vec<SquareView>, SessionError> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    pub async fn view(&self) -> Result<GameView, SessionError> {
        self.request(|reply| Command::View { reply }).await
    }

    pub async fn status(&self) -> Result<GameStatus, SessionError> {
        Ok(self.request(|reply| Command::Status { reply }).await?.0)
    }

    pub async fn current_player(&self) -> Result<Color, SessionError> {
        Ok(self.request(|reply| Command::Status { reply }).await?.1)
    }

    pub async fn clock_remaining(&self, color: Color) -> Result<u32, SessionError> {
        self.request(|reply| Command::ClockRemaining { color, reply })
            .await
    }

    pub async fn reset(&self) -> Result<(), SessionError> {
        self.request(|reply| Command::Reset { reply }).await
    }
}
