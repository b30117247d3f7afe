//! Property tests over random playouts from the starting position.

use chess_rules::validator::is_king_in_check_on;
use chess_rules::{Color, GameFacade, MoveOutcome, PieceKind, Position};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn own_squares(facade: &GameFacade) -> Vec<Position> {
    let side = facade.current_player();
    facade
        .snapshot_board()
        .into_iter()
        .filter(|sq| sq.piece.map(|p| p.color) == Some(side))
        .map(|sq| sq.position)
        .collect()
}

fn legal_moves(facade: &mut GameFacade) -> Vec<(Position, Position)> {
    own_squares(facade)
        .into_iter()
        .flat_map(|from| {
            facade
                .available_destinations(from)
                .into_iter()
                .map(move |to| (from, to))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Play up to `plies` random legal moves, promoting to a queen.
fn random_game(seed: u64, plies: usize) -> GameFacade {
    let mut facade = GameFacade::default();
    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..plies {
        if facade.status().is_over() {
            break;
        }
        let moves = legal_moves(&mut facade);
        let Some(&(from, to)) = moves.choose(&mut rng) else {
            break;
        };
        if let Ok(MoveOutcome::AwaitingPromotion { .. }) = facade.attempt_move(from, to) {
            facade.resolve_promotion(PieceKind::Queen).unwrap();
        }
    }
    facade
}

fn any_square() -> impl Strategy<Value = Position> {
    (1i8..=8, 1i8..=8).prop_map(|(row, col)| Position::new(row, col))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Every offered destination is accepted and flips the turn exactly once.
    #[test]
    fn offered_moves_are_accepted(seed in any::<u64>(), plies in 0usize..30) {
        let mut facade = random_game(seed, plies);
        prop_assume!(!facade.status().is_over());

        let moves = legal_moves(&mut facade);
        let mut rng = StdRng::seed_from_u64(seed ^ 0x5eed);
        let &(from, to) = moves.choose(&mut rng).unwrap();
        let mover = facade.current_player();

        match facade.attempt_move(from, to).unwrap() {
            MoveOutcome::Applied(delta) => {
                prop_assert_eq!((delta.from, delta.to), (from, to));
                prop_assert_eq!(facade.current_player(), mover.opposite());
            }
            MoveOutcome::AwaitingPromotion { .. } => {
                prop_assert_eq!(facade.current_player(), mover);
                facade.resolve_promotion(PieceKind::Queen).unwrap();
                prop_assert_eq!(facade.current_player(), mover.opposite());
            }
        }
    }

    /// A refused move leaves the board and the turn alone.
    #[test]
    fn rejected_moves_are_invisible(
        seed in any::<u64>(),
        plies in 0usize..30,
        from in any_square(),
        to in any_square(),
    ) {
        let mut facade = random_game(seed, plies);
        let legal = legal_moves(&mut facade);
        prop_assume!(!legal.contains(&(from, to)));

        let snapshot = facade.snapshot_board();
        let turn = facade.current_player();
        prop_assert!(facade.attempt_move(from, to).is_err());
        prop_assert_eq!(facade.snapshot_board(), snapshot);
        prop_assert_eq!(facade.current_player(), turn);
    }

    /// Asking for destinations twice gives the same answer and moves nothing.
    #[test]
    fn destination_queries_are_pure(seed in any::<u64>(), plies in 0usize..30, square in any_square()) {
        let mut facade = random_game(seed, plies);
        let snapshot = facade.snapshot_board();

        let first = facade.available_destinations(square);
        let second = facade.available_destinations(square);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(facade.snapshot_board(), snapshot);
    }

    /// No legal move ever leaves the mover's king attacked.
    #[test]
    fn offered_moves_never_expose_the_king(seed in any::<u64>(), plies in 0usize..30) {
        let mut facade = random_game(seed, plies);
        prop_assume!(!facade.status().is_over());

        for (from, to) in legal_moves(&mut facade) {
            let mut probe = facade.clone();
            let mover = probe.current_player();
            if let Ok(MoveOutcome::Applied(_)) = probe.attempt_move(from, to) {
                prop_assert!(!is_king_in_check_on(probe.state().board(), mover));
            }
        }
    }
}

#[test]
fn random_games_keep_one_king_each() {
    for seed in 0..4 {
        let facade = random_game(seed, 80);
        for color in [Color::White, Color::Black] {
            let kings = facade
                .snapshot_board()
                .iter()
                .filter(|sq| sq.piece.map(|p| (p.kind, p.color)) == Some((PieceKind::King, color)))
                .count();
            assert_eq!(kings, 1, "seed {seed}");
        }
    }
}
