use chess_rules::session::{self, SessionHandle};
use chess_rules::{GameConfig, GameStatus, MoveOutcome, PieceKind, Position, SessionError};
use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Play random legal games against the rules engine.
#[derive(Parser, Debug)]
struct Args {
    /// Number of games to play.
    #[arg(long, default_value_t = 10)]
    games: usize,

    /// Give up on a game after this many moves.
    #[arg(long, default_value_t = 300)]
    max_moves: usize,

    /// RNG seed, so a run can be repeated.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Seconds on each clock.
    #[arg(long, default_value_t = 1800)]
    seconds: u32,
}

async fn random_move(session: &SessionHandle, rng: &mut StdRng) -> Result<Option<(Position, Position)>, SessionError> {
    let side = session.current_player().await?;
    let mut candidates = Vec::new();
    for square in session.snapshot_board().await? {
        if square.piece.map(|p| p.color) != Some(side) {
            continue;
        }
        for to in session.available_destinations(square.position).await? {
            candidates.push((square.position, to));
        }
    }
    Ok(candidates.choose(rng).copied())
}

async fn play_game(session: &SessionHandle, rng: &mut StdRng, max_moves: usize) -> Result<(GameStatus, usize), SessionError> {
    session.reset().await?;
    for played in 0..max_moves {
        let status = session.status().await?;
        if status.is_over() {
            return Ok((status, played));
        }
        let Some((from, to)) = random_move(session, rng).await? else {
            warn!("no legal move but game still in progress");
            return Ok((status, played));
        };
        match session.attempt_move(from, to).await? {
            Ok(MoveOutcome::Applied(_)) => {}
            Ok(MoveOutcome::AwaitingPromotion { .. }) => {
                let kind = PieceKind::PROMOTION_CHOICES
                    .choose(rng)
                    .copied()
                    .unwrap_or(PieceKind::Queen);
                if let Err(e) = session.resolve_promotion(kind).await? {
                    warn!(error = %e, "promotion refused");
                }
            }
            Err(e) => warn!(error = %e, %from, %to, "offered move was refused"),
        }
    }
    Ok((session.status().await?, max_moves))
}

#[tokio::main]
async fn main() -> Result<(), SessionError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let session = session::spawn(GameConfig::with_seconds(args.seconds.max(1)));
    let mut rng = StdRng::seed_from_u64(args.seed);

    let (mut mates, mut stalemates, mut timeouts, mut unfinished) = (0, 0, 0, 0);
    for game in 0..args.games {
        let (status, moves) = play_game(&session, &mut rng, args.max_moves).await?;
        info!(game, moves, ?status, "game finished");
        match status {
            GameStatus::Checkmate => mates += 1,
            GameStatus::Stalemate => stalemates += 1,
            GameStatus::Timeout => timeouts += 1,
            GameStatus::InProgress => unfinished += 1,
        }
    }

    info!(mates, stalemates, timeouts, unfinished, "selfplay done");
    Ok(())
}
