// Proptest generators for domain types.

use proptest::prelude::*;

use crate::domain::{Card, Position, Rank, Suit, Team};

/// Generate a random Suit
pub fn suit() -> impl Strategy<Value = Suit> {
    prop_oneof![
        Just(Suit::Clubs),
        Just(Suit::Diamonds),
        Just(Suit::Hearts),
        Just(Suit::Spades),
    ]
}

/// Generate a random printed Rank
pub fn rank() -> impl Strategy<Value = Rank> {
    proptest::sample::select(Rank::ALL.to_vec())
}

/// Any card, jacks included (roughly one in thirteen).
pub fn card() -> impl Strategy<Value = Card> {
    prop_oneof![
        12 => (rank(), suit()).prop_map(|(rank, suit)| Card::normal(rank, suit)),
        1 => suit().prop_map(Card::jack),
    ]
}

pub fn team() -> impl Strategy<Value = Team> {
    prop_oneof![Just(Team::A), Just(Team::B), Just(Team::C)]
}

/// Any in-bounds position, corners included.
pub fn position() -> impl Strategy<Value = Position> {
    (0..10i32, 0..10i32).prop_map(|(r, c)| Position::new(r, c).expect("in bounds"))
}

/// Non-corner position.
pub fn open_position() -> impl Strategy<Value = Position> {
    position().prop_filter("corners are never occupied", |p| !p.is_corner())
}

/// A sparse board: each listed cell owned by some team.
pub fn board_cells() -> impl Strategy<Value = Vec<(Position, Team)>> {
    proptest::collection::vec((open_position(), team()), 0..40)
}

pub fn player_count() -> impl Strategy<Value = usize> {
    2usize..=4
}
