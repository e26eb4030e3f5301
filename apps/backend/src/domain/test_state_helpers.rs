//! Session fixtures for domain unit tests. Every helper keeps the
//! 104-card total intact.

use super::board::{Position, Printed, Team};
use super::cards_types::Card;
use super::lobby::{join, new_session, start, NewSession};
use super::state::{PlayerId, SessionRecord};

pub const TEST_SEED: u64 = 42;

pub fn pid(s: &str) -> PlayerId {
    PlayerId::from(s)
}

/// Waiting session; the first name is the host.
pub fn waiting_session(names: &[&str]) -> SessionRecord {
    waiting_session_with_seed(names, TEST_SEED)
}

pub fn waiting_session_with_seed(names: &[&str], seed: u64) -> SessionRecord {
    let mut record = new_session(
        NewSession {
            host_id: pid(names[0]),
            host_name: names[0].to_string(),
            max_players: 4,
            is_private: false,
            password: None,
        },
        seed,
        0,
    )
    .expect("valid session settings");
    for name in &names[1..] {
        join(&mut record, &pid(name), name, None, 0).expect("join");
    }
    record
}

/// Started session at time 0; turn order follows seat order (the first
/// name moves first).
pub fn playing_session(names: &[&str]) -> SessionRecord {
    playing_session_with_seed(names, TEST_SEED)
}

pub fn playing_session_with_seed(names: &[&str], seed: u64) -> SessionRecord {
    let mut record = waiting_session_with_seed(names, seed);
    start(&mut record, 0).expect("start");
    record
}

/// The normal card printed on `pos`.
pub fn printed_card(pos: Position) -> Card {
    match pos.printed() {
        Printed::Card(rank, suit) => Card::normal(rank, suit),
        Printed::Corner => panic!("corner has no printed card"),
    }
}

/// Remove one copy of `card` from circulation outside `keep`'s hand.
/// A copy taken from another hand is refilled from the draw pile.
fn take_copy(record: &mut SessionRecord, card: Card, keep: Option<&PlayerId>) -> bool {
    if let Some(i) = record.deck.draw_pile.iter().position(|c| *c == card) {
        record.deck.draw_pile.remove(i);
        return true;
    }
    if let Some(i) = record.deck.discard_pile.iter().position(|c| *c == card) {
        record.deck.discard_pile.remove(i);
        return true;
    }
    let holder = record
        .players
        .iter()
        .find(|(id, p)| Some(*id) != keep && p.hand.contains(&card))
        .map(|(id, _)| id.clone());
    if let Some(holder) = holder {
        let refill = record.deck.draw_pile.pop();
        let hand = &mut record.players.get_mut(&holder).expect("holder").hand;
        let i = hand.iter().position(|c| *c == card).expect("card in hand");
        hand.remove(i);
        hand.extend(refill);
        return true;
    }
    false
}

/// Put `card` into `who`'s hand. The hand's first card goes to the draw
/// pile so the hand size stays the same (an empty hand just grows).
pub fn give_card(record: &mut SessionRecord, who: &str, card: Card) {
    let id = pid(who);
    if record.players[&id].hand.contains(&card) {
        return;
    }
    assert!(take_copy(record, card, Some(&id)), "no copy of {card} left");
    let hand = &mut record.players.get_mut(&id).expect("player").hand;
    if hand.is_empty() {
        hand.push(card);
    } else {
        let returned = std::mem::replace(&mut hand[0], card);
        record.deck.draw_pile.insert(0, returned);
    }
}

/// Occupy `pos` for `team` with its printed card, taken from circulation.
pub fn place_chip(record: &mut SessionRecord, pos: Position, team: Team) {
    let card = printed_card(pos);
    assert!(take_copy(record, card, None), "no copy of {card} left");
    record.board.place(pos, team, card).expect("open cell");
}
