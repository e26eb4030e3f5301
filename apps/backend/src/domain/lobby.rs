//! Roster operations on a session record: create, join, leave, start.

use std::collections::BTreeMap;

use unicode_normalization::UnicodeNormalization;

use super::board::Board;
use super::deck::Deck;
use super::rules::{hand_size_for_players, MAX_PLAYERS, MIN_PLAYERS};
use super::state::{
    ConnectionStatus, PlayerId, PlayerRecord, SessionRecord, SessionStatus, TurnSlot,
};
use super::teams::{assign_teams, turn_order};
use super::turns::advance_turn;
use crate::errors::domain::{DomainError, ValidationKind};

pub const MAX_NAME_CHARS: usize = 24;

/// Trim and NFKC-normalize a display name.
pub fn normalize_name(raw: &str) -> Result<String, DomainError> {
    let name: String = raw.trim().nfkc().collect();
    let len = name.chars().count();
    if len == 0 || len > MAX_NAME_CHARS {
        return Err(DomainError::validation(
            ValidationKind::InvalidName,
            format!("name must be 1 to {MAX_NAME_CHARS} characters"),
        ));
    }
    Ok(name)
}

/// Settings chosen by the host at creation.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub host_id: PlayerId,
    pub host_name: String,
    pub max_players: u8,
    pub is_private: bool,
    pub password: Option<String>,
}

/// A waiting session holding only its host.
pub fn new_session(
    settings: NewSession,
    rng_seed: u64,
    now: i64,
) -> Result<SessionRecord, DomainError> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&usize::from(settings.max_players)) {
        return Err(DomainError::validation(
            ValidationKind::InvalidMaxPlayers,
            format!("max players must be {MIN_PLAYERS} to {MAX_PLAYERS}"),
        ));
    }
    let password = settings.password.filter(|p| !p.is_empty());
    if settings.is_private && password.is_none() {
        return Err(DomainError::validation(
            ValidationKind::PasswordRequired,
            "private sessions need a password",
        ));
    }
    let name = normalize_name(&settings.host_name)?;

    let mut host = PlayerRecord::new(name, 0, now);
    host.is_host = true;
    let mut players = BTreeMap::new();
    players.insert(settings.host_id, host);

    Ok(SessionRecord {
        status: SessionStatus::Waiting,
        max_players: settings.max_players,
        players,
        board: Board::empty(),
        deck: Deck::default(),
        turn_order: Vec::new(),
        current_turn: None,
        turn_started_at: None,
        winner_team: None,
        winning_sequence: Vec::new(),
        last_move: None,
        created_at: now,
        is_private: settings.is_private,
        password: if settings.is_private { password } else { None },
        rng_seed,
        next_seat: 1,
    })
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum JoinKind {
    Joined,
    Rejoined,
}

/// Admit `id` into the session.
///
/// Present identities always rejoin. An identity from the turn order may
/// come back to a running game on its original team with a fresh hand.
/// Otherwise the session must be waiting, not full, and the password
/// must match.
pub fn join(
    record: &mut SessionRecord,
    id: &PlayerId,
    raw_name: &str,
    password: Option<&str>,
    now: i64,
) -> Result<JoinKind, DomainError> {
    let name = normalize_name(raw_name)?;

    if let Some(player) = record.players.get_mut(id) {
        player.name = name;
        player.status = ConnectionStatus::Online;
        player.offline_since = None;
        player.last_seen = now;
        player.is_bot = false;
        ensure_host(record);
        return Ok(JoinKind::Rejoined);
    }

    if record.status == SessionStatus::Playing {
        if let Some(slot) = record.turn_slot(id).cloned() {
            rejoin_running_game(record, id, &slot, name, now)?;
            ensure_host(record);
            return Ok(JoinKind::Rejoined);
        }
    }

    if record.status != SessionStatus::Waiting {
        return Err(DomainError::validation(
            ValidationKind::AlreadyStarted,
            "session already started",
        ));
    }
    if record.is_full() {
        return Err(DomainError::validation(ValidationKind::RoomFull, "session is full"));
    }
    if record.is_private && record.password.as_deref() != password {
        return Err(DomainError::validation(
            ValidationKind::WrongPassword,
            "password does not match",
        ));
    }

    let seat = record.next_seat;
    record.next_seat = seat
        .checked_add(1)
        .ok_or_else(|| DomainError::validation(ValidationKind::RoomFull, "no seats left"))?;
    record
        .players
        .insert(id.clone(), PlayerRecord::new(name, seat, now));
    ensure_host(record);
    Ok(JoinKind::Joined)
}

fn rejoin_running_game(
    record: &mut SessionRecord,
    id: &PlayerId,
    slot: &TurnSlot,
    name: String,
    now: i64,
) -> Result<(), DomainError> {
    let hand_size = hand_size_for_players(record.turn_order.len())?;
    let mut player = PlayerRecord::new(name, slot.seat, now);
    player.set_team(slot.team);
    for _ in 0..hand_size {
        match record.deck.draw(record.rng_seed) {
            Some(card) => player.hand.push(card),
            None => break,
        }
    }
    record.players.insert(id.clone(), player);
    if record.current_turn.is_none() {
        record.current_turn = Some(id.clone());
        record.turn_started_at = Some(now);
    }
    Ok(())
}

/// Drop `id` from the roster. The hand goes to the discard pile, the turn
/// moves on if it was theirs, and the turn order keeps their slot.
/// Returns `false` when the player was not present.
pub fn leave(record: &mut SessionRecord, id: &PlayerId, now: i64) -> bool {
    let Some(player) = record.players.remove(id) else {
        return false;
    };
    if record.status != SessionStatus::Waiting {
        record.deck.discard_pile.extend(player.hand);
    }
    if record.status == SessionStatus::Playing && record.current_turn.as_ref() == Some(id) {
        advance_turn(record, now);
    }
    ensure_host(record);
    true
}

/// Make sure exactly one present player holds the host flag. Returns the
/// newly promoted player, if any.
pub fn ensure_host(record: &mut SessionRecord) -> Option<PlayerId> {
    if record.host().is_some() || record.players.is_empty() {
        return None;
    }
    let by_turn = record
        .turn_order
        .iter()
        .map(|s| &s.player_id)
        .find(|id| record.players.contains_key(*id))
        .cloned();
    let candidate = match (record.status, by_turn) {
        (SessionStatus::Waiting, _) | (_, None) => record
            .players_by_seat()
            .first()
            .map(|(id, _)| (*id).clone()),
        (_, Some(id)) => Some(id),
    }?;
    if let Some(player) = record.players.get_mut(&candidate) {
        player.is_host = true;
    }
    Some(candidate)
}

/// `waiting → playing`: teams, shuffle, deal, turn order.
pub fn start(record: &mut SessionRecord, now: i64) -> Result<(), DomainError> {
    if record.status != SessionStatus::Waiting {
        return Err(DomainError::validation(
            ValidationKind::AlreadyStarted,
            "session already started",
        ));
    }
    let count = record.players.len();
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
        return Err(DomainError::validation(
            ValidationKind::InvalidPlayerCount,
            format!("{count} players; need {MIN_PLAYERS} to {MAX_PLAYERS} to start"),
        ));
    }
    let hand_size = hand_size_for_players(count)?;

    let seated: Vec<(PlayerId, u32, Option<_>)> = record
        .players_by_seat()
        .into_iter()
        .map(|(id, p)| (id.clone(), p.seat, p.team))
        .collect();
    let existing: Vec<_> = seated.iter().map(|(_, _, team)| *team).collect();
    let teams = assign_teams(&existing)?;
    let with_teams: Vec<((PlayerId, u32), _)> = seated
        .into_iter()
        .zip(teams)
        .map(|((id, seat, _), team)| ((id, seat), team))
        .collect();
    let order = turn_order(&with_teams);

    record.deck = Deck::fresh(record.rng_seed, record.deck.shuffle_count);
    record.board = Board::empty();
    record.winner_team = None;
    record.winning_sequence.clear();
    record.last_move = None;
    record.turn_order = order
        .into_iter()
        .map(|((player_id, seat), team)| TurnSlot {
            player_id,
            team,
            seat,
        })
        .collect();

    for slot in &record.turn_order {
        let mut hand = Vec::with_capacity(hand_size);
        for _ in 0..hand_size {
            if let Some(card) = record.deck.draw(record.rng_seed) {
                hand.push(card);
            }
        }
        if let Some(player) = record.players.get_mut(&slot.player_id) {
            player.set_team(slot.team);
            player.hand = hand;
            player.is_bot = false;
        }
    }

    record.current_turn = record.turn_order.first().map(|s| s.player_id.clone());
    record.turn_started_at = Some(now);
    record.status = SessionStatus::Playing;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::board::Team;
    use crate::domain::deck::DECK_SIZE;

    fn settings(max: u8) -> NewSession {
        NewSession {
            host_id: PlayerId::from("host"),
            host_name: "Host".into(),
            max_players: max,
            is_private: false,
            password: None,
        }
    }

    fn pid(s: &str) -> PlayerId {
        PlayerId::from(s)
    }

    #[test]
    fn name_is_trimmed_and_normalized() {
        assert_eq!(normalize_name("  Ａｌｉｃｅ ").unwrap(), "Alice");
        assert!(normalize_name("   ").is_err());
        assert!(normalize_name(&"x".repeat(25)).is_err());
        assert!(normalize_name(&"é".repeat(24)).is_ok());
    }

    #[test]
    fn create_validates_settings() {
        assert!(new_session(settings(1), 1, 0).is_err());
        assert!(new_session(settings(5), 1, 0).is_err());
        let mut private = settings(2);
        private.is_private = true;
        let err = new_session(private.clone(), 1, 0).unwrap_err();
        assert_eq!(err.validation_kind(), Some(&ValidationKind::PasswordRequired));
        private.password = Some("pw".into());
        let s = new_session(private, 1, 0).unwrap();
        assert_eq!(s.password.as_deref(), Some("pw"));
        assert_eq!(s.host(), Some(&pid("host")));
    }

    #[test]
    fn join_rejects_when_full_or_started() {
        let mut s = new_session(settings(2), 1, 0).unwrap();
        assert_eq!(join(&mut s, &pid("a"), "A", None, 0).unwrap(), JoinKind::Joined);
        let err = join(&mut s, &pid("b"), "B", None, 0).unwrap_err();
        assert_eq!(err.validation_kind(), Some(&ValidationKind::RoomFull));

        start(&mut s, 10).unwrap();
        leave(&mut s, &pid("a"), 11);
        let err = join(&mut s, &pid("c"), "C", None, 12).unwrap_err();
        assert_eq!(err.validation_kind(), Some(&ValidationKind::AlreadyStarted));
    }

    #[test]
    fn join_checks_password_but_rejoin_does_not() {
        let mut cfg = settings(3);
        cfg.is_private = true;
        cfg.password = Some("sesame".into());
        let mut s = new_session(cfg, 1, 0).unwrap();
        let err = join(&mut s, &pid("a"), "A", Some("nope"), 0).unwrap_err();
        assert_eq!(err.validation_kind(), Some(&ValidationKind::WrongPassword));
        assert_eq!(
            join(&mut s, &pid("a"), "A", Some("sesame"), 0).unwrap(),
            JoinKind::Joined
        );
        assert_eq!(
            join(&mut s, &pid("a"), "A2", None, 5).unwrap(),
            JoinKind::Rejoined
        );
        assert_eq!(s.players[&pid("a")].name, "A2");
    }

    #[test]
    fn seats_are_never_reused() {
        let mut s = new_session(settings(4), 1, 0).unwrap();
        join(&mut s, &pid("a"), "A", None, 0).unwrap();
        leave(&mut s, &pid("a"), 0);
        join(&mut s, &pid("b"), "B", None, 0).unwrap();
        assert_eq!(s.players[&pid("b")].seat, 2);
    }

    #[test]
    fn join_leave_churn_keeps_seats_unique() {
        let mut s = new_session(settings(4), 1, 0).unwrap();
        for i in 0..300 {
            let id = pid(&format!("p{i}"));
            join(&mut s, &id, "P", None, i).unwrap();
            assert_eq!(s.players[&id].seat, i as u32 + 1);
            assert!(leave(&mut s, &id, i));
        }
        join(&mut s, &pid("last"), "Last", None, 300).unwrap();
        assert_eq!(s.players[&pid("last")].seat, 301);
        assert_eq!(s.players[&pid("host")].seat, 0);
        assert_eq!(s.host(), Some(&pid("host")));
    }

    #[test]
    fn exhausted_seat_counter_is_refused() {
        let mut s = new_session(settings(4), 1, 0).unwrap();
        s.next_seat = u32::MAX;
        let err = join(&mut s, &pid("a"), "A", None, 0).unwrap_err();
        assert_eq!(err.validation_kind(), Some(&ValidationKind::RoomFull));
        assert!(!s.players.contains_key(&pid("a")));
    }

    #[test]
    fn start_deals_and_orders() {
        let mut s = new_session(settings(4), 7, 0).unwrap();
        for id in ["a", "b", "c"] {
            join(&mut s, &pid(id), id, None, 0).unwrap();
        }
        start(&mut s, 100).unwrap();
        assert_eq!(s.status, SessionStatus::Playing);
        assert_eq!(s.turn_order.len(), 4);
        assert!(s.players.values().all(|p| p.hand.len() == 6));
        assert_eq!(s.card_count(), DECK_SIZE);
        assert_eq!(s.current_turn, Some(s.turn_order[0].player_id.clone()));
        assert_eq!(s.turn_started_at, Some(100));
        let teams: Vec<Team> = s.turn_order.iter().map(|t| t.team).collect();
        assert_eq!(teams, vec![Team::A, Team::B, Team::A, Team::B]);

        let err = start(&mut s, 101).unwrap_err();
        assert_eq!(err.validation_kind(), Some(&ValidationKind::AlreadyStarted));
    }

    #[test]
    fn start_needs_two_players() {
        let mut s = new_session(settings(2), 1, 0).unwrap();
        let err = start(&mut s, 0).unwrap_err();
        assert_eq!(err.validation_kind(), Some(&ValidationKind::InvalidPlayerCount));
    }

    #[test]
    fn leaving_host_promotes_next_in_turn_order() {
        let mut s = new_session(settings(3), 1, 0).unwrap();
        join(&mut s, &pid("a"), "A", None, 0).unwrap();
        join(&mut s, &pid("b"), "B", None, 0).unwrap();
        start(&mut s, 0).unwrap();
        assert!(leave(&mut s, &pid("host"), 5));
        assert_eq!(s.host(), Some(&pid("a")));
        assert_eq!(s.current_turn, Some(pid("a")));
        assert_eq!(s.card_count(), DECK_SIZE);
        assert!(!leave(&mut s, &pid("host"), 6));
    }

    #[test]
    fn removed_player_rejoins_on_original_team() {
        let mut s = new_session(settings(2), 3, 0).unwrap();
        join(&mut s, &pid("a"), "A", None, 0).unwrap();
        start(&mut s, 0).unwrap();
        let team = s.players[&pid("a")].team;
        leave(&mut s, &pid("a"), 1);
        assert_eq!(
            join(&mut s, &pid("a"), "A", None, 2).unwrap(),
            JoinKind::Rejoined
        );
        let back = &s.players[&pid("a")];
        assert_eq!(back.team, team);
        assert_eq!(back.hand.len(), 7);
        assert_eq!(s.card_count(), DECK_SIZE);
    }
}
