//! Seeded random playouts: every legal step keeps the 104-card total and
//! the record invariants.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use crate::domain::rules::legal_moves;
use crate::domain::state::SessionStatus;
use crate::domain::test_state_helpers::playing_session_with_seed;
use crate::domain::turns::{apply_move, discard_when_stuck, pass_turn, Actor};
use crate::domain::{test_gens, test_prelude, DECK_SIZE};

const NAMES: [&str; 4] = ["ann", "ben", "cat", "dan"];
const MAX_STEPS: usize = 600;

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    #[test]
    fn prop_random_playout_keeps_invariants(
        players in test_gens::player_count(),
        seed in any::<u64>(),
    ) {
        let mut record = playing_session_with_seed(&NAMES[..players], seed);
        let mut rng = StdRng::seed_from_u64(seed ^ 0x5eed);

        for step in 0..MAX_STEPS {
            if record.status == SessionStatus::Finished {
                prop_assert!(record.winner_team.is_some());
                prop_assert!(record.winning_sequence.len() >= 5);
                break;
            }
            let now = step as i64;
            let id = record.current_turn.clone().expect("someone is on turn");
            let player = record.player(&id).expect("current player present");
            let team = player.team.expect("team assigned");
            let hand = player.hand.clone();
            let moves = legal_moves(&hand, &record.board, team);

            if let Some(mv) = moves.choose(&mut rng) {
                let (row, col) = (mv.position.row() as i32, mv.position.col() as i32);
                apply_move(&mut record, &id, mv.card, row, col, Actor::Bot, now)
                    .expect("legal move applies");
            } else if let Some(card) = hand.first() {
                discard_when_stuck(&mut record, &id, *card, Actor::Bot, now)
                    .expect("stuck discard applies");
            } else {
                pass_turn(&mut record, &id, now).expect("empty hand passes");
            }

            prop_assert_eq!(record.card_count(), DECK_SIZE);
            prop_assert!(record.check_invariants().is_ok());
        }
    }
}
