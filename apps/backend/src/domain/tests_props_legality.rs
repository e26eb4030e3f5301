//! Property-based tests for move legality and sequence detection.

use proptest::prelude::*;

use crate::domain::rules::{validate_move, Verdict};
use crate::domain::sequence::{check_win, SEQUENCE_LENGTH};
use crate::domain::{test_gens, test_prelude, Board, Card, Position, Printed, Team};

fn board_from(cells: &[(Position, Team)]) -> Board {
    let mut board = Board::empty();
    for (pos, team) in cells {
        if board.is_open(*pos) {
            let card = match pos.printed() {
                Printed::Card(rank, suit) => Card::normal(rank, suit),
                Printed::Corner => continue,
            };
            board.place(*pos, *team, card).expect("open cell");
        }
    }
    board
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// A placement verdict only ever targets an open, non-corner cell.
    #[test]
    fn prop_place_targets_open_cells(
        cells in test_gens::board_cells(),
        card in test_gens::card(),
        target in test_gens::position(),
        team in test_gens::team(),
    ) {
        let board = board_from(&cells);
        if validate_move(card, target, &board, team) == Verdict::Place {
            prop_assert!(!target.is_corner());
            prop_assert!(board.is_open(target));
            prop_assert!(!card.is_one_eyed());
        }
    }

    /// Removal only hits an opponent's marker, and only with a one-eyed jack.
    #[test]
    fn prop_remove_targets_opponents(
        cells in test_gens::board_cells(),
        card in test_gens::card(),
        target in test_gens::position(),
        team in test_gens::team(),
    ) {
        let board = board_from(&cells);
        if validate_move(card, target, &board, team) == Verdict::Remove {
            prop_assert!(card.is_one_eyed());
            let owner = board.owner(target);
            prop_assert!(owner.is_some());
            prop_assert_ne!(owner, Some(team));
        }
    }

    /// Removing a marker and placing it back restores the board.
    #[test]
    fn prop_remove_then_place_restores(
        cells in test_gens::board_cells(),
    ) {
        let board = board_from(&cells);
        let mut scratch = board.clone();
        let occupied: Vec<Position> = board.occupied().map(|(p, _)| p).collect();
        for pos in occupied {
            let chip = scratch.remove(pos).expect("occupied");
            prop_assert!(scratch.is_open(pos));
            scratch.place(pos, chip.team, chip.card).expect("reopened");
        }
        prop_assert_eq!(scratch, board);
    }

    /// A reported win is a run of at least five cells that all count for
    /// the team and passes through the last move.
    #[test]
    fn prop_win_cells_count_for_team(
        cells in test_gens::board_cells(),
        last in test_gens::open_position(),
        team in test_gens::team(),
    ) {
        let mut board = board_from(&cells);
        if board.is_open(last) {
            let card = match last.printed() {
                Printed::Card(rank, suit) => Card::normal(rank, suit),
                Printed::Corner => unreachable!("open_position excludes corners"),
            };
            board.place(last, team, card).expect("open cell");
        } else if board.owner(last) != Some(team) {
            return Ok(());
        }
        let win = check_win(&board, last, team);
        if win.won {
            prop_assert!(win.cells.len() >= SEQUENCE_LENGTH);
            prop_assert!(win.cells.contains(&last));
            for pos in &win.cells {
                prop_assert!(board.counts_for(*pos, team));
            }
        } else {
            prop_assert!(win.cells.is_empty());
        }
    }
}
