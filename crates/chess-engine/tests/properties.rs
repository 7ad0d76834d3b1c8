//! Property tests over random games.

use chess_core::{Color, Square};
use chess_engine::{Game, Rules, STARTING_FEN};
use proptest::prelude::*;

/// Plays a game by picking the `choice % n`-th legal move at every ply.
fn walk(choices: &[usize]) -> Game {
    let mut game = Game::new();
    for &choice in choices {
        let moves = game.legal_moves();
        if moves.is_empty() {
            break;
        }
        let m = &moves[choice % moves.len()];
        game.make_move(m.request()).expect("listed move must be legal");
    }
    game
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn listed_moves_are_playable(choices in prop::collection::vec(any::<usize>(), 0..40)) {
        let game = walk(&choices);
        for m in game.legal_moves() {
            let mut probe = game.clone();
            prop_assert!(probe.make_move(m.request()).is_ok(), "{} rejected in {}", m.san, game.fen());
        }
    }

    #[test]
    fn conflict_map_matches_attack_queries(choices in prop::collection::vec(any::<usize>(), 0..40)) {
        let game = walk(&choices);
        let map = game.conflict_map();
        prop_assert_eq!(map.len(), 64);
        for square in Square::all() {
            let conflict = map.get(square);
            prop_assert_eq!(conflict.white, game.rules().is_attacked(square, Color::White));
            prop_assert_eq!(conflict.black, game.rules().is_attacked(square, Color::Black));
            prop_assert_eq!(conflict.is_contested(), conflict.white && conflict.black);
        }
    }

    #[test]
    fn capture_lists_follow_history(choices in prop::collection::vec(any::<usize>(), 0..60)) {
        let game = walk(&choices);
        for color in Color::BOTH {
            let taken = game
                .history()
                .iter()
                .filter(|m| m.color == color && m.is_capture())
                .count();
            prop_assert_eq!(game.captured().by(color).len(), taken);
        }
    }

    #[test]
    fn turns_alternate(choices in prop::collection::vec(any::<usize>(), 0..40)) {
        let game = walk(&choices);
        for (ply, m) in game.history().iter().enumerate() {
            let expected = if ply % 2 == 0 { Color::White } else { Color::Black };
            prop_assert_eq!(m.color, expected);
        }
        let next = if game.history().len() % 2 == 0 { Color::White } else { Color::Black };
        prop_assert_eq!(game.turn(), next);
    }

    #[test]
    fn snapshot_agrees_with_game(choices in prop::collection::vec(any::<usize>(), 0..40)) {
        let game = walk(&choices);
        let snapshot = game.snapshot();
        prop_assert_eq!(&snapshot.moves, &game.legal_moves());
        prop_assert_eq!(snapshot.turn, game.turn());
        prop_assert_eq!(snapshot.last_move.as_ref(), game.history().last());
        prop_assert_eq!(snapshot.flags.is_game_over, snapshot.flags.is_checkmate || snapshot.flags.is_draw);

        let reloaded = Rules::from_fen(&snapshot.fen).unwrap();
        prop_assert_eq!(reloaded.fen(), snapshot.fen);
    }

    #[test]
    fn undo_returns_to_start(choices in prop::collection::vec(any::<usize>(), 0..30)) {
        let mut game = walk(&choices);
        while game.undo().is_some() {}
        prop_assert_eq!(game.fen(), STARTING_FEN);
        prop_assert!(game.captured().is_empty());
    }
}
