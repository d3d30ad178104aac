use lib::chess::{Game, Outcome};
use proptest::sample::Selector;
use shakmaty as sm;
use std::collections::BTreeSet;
use test_strategy::proptest;

fn legal_moves(chess: &sm::Chess) -> BTreeSet<String> {
    sm::Position::legal_moves(chess)
        .iter()
        .map(|m| sm::uci::Uci::from_standard(m).to_string())
        .collect()
}

#[proptest(cases = 64)]
fn move_generation_agrees_with_shakmaty(selector: Selector, #[strategy(1usize..200)] plies: usize) {
    let mut game = Game::default();
    let mut chess = sm::Chess::default();

    for _ in 0..plies {
        if game.outcome().is_some() {
            break;
        }

        let expected = legal_moves(&chess);
        let moves: BTreeSet<String> = game.moves().iter().map(|m| m.to_string()).collect();
        assert_eq!(moves, expected, "{}", game);
        assert_eq!(game.is_check(), sm::Position::is_check(&chess), "{}", game);

        let m = selector.select(game.moves());
        let vm = sm::Position::legal_moves(&chess)
            .into_iter()
            .find(|vm| sm::uci::Uci::from_standard(vm).to_string() == m.to_string())
            .unwrap();

        game.play(m)?;
        sm::Position::play_unchecked(&mut chess, &vm);
    }

    match game.outcome() {
        Some(Outcome::Checkmate(_)) => assert!(sm::Position::is_checkmate(&chess)),
        Some(Outcome::Stalemate) => assert!(sm::Position::is_stalemate(&chess)),
        _ => {}
    }
}
