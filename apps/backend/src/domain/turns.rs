//! Per-move transitions. Every check runs before the first mutation, so a
//! rejected move leaves the record untouched.

use super::board::{Position, Team};
use super::cards_types::Card;
use super::rules::{has_any_legal_move, validate_move, MoveKind, Verdict};
use super::sequence::check_win;
use super::state::{LastMove, PlayerId, SessionRecord, SessionStatus};
use crate::errors::domain::{DomainError, ValidationKind};

/// Who is submitting the move.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Actor {
    Human,
    Bot,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AppliedMove {
    pub player_id: PlayerId,
    pub card: Card,
    pub position: Option<Position>,
    pub kind: MoveKind,
    pub removed_team: Option<Team>,
    pub winner: Option<Team>,
    pub winning_cells: Vec<Position>,
    pub next_turn: Option<PlayerId>,
}

/// Checks shared by every turn action; returns the acting team.
fn check_turn(record: &SessionRecord, id: &PlayerId) -> Result<Team, DomainError> {
    match record.status {
        SessionStatus::Waiting => {
            return Err(DomainError::validation(
                ValidationKind::GameNotStarted,
                "session has not started",
            ))
        }
        SessionStatus::Finished => {
            return Err(DomainError::validation(
                ValidationKind::GameFinished,
                "session is finished",
            ))
        }
        SessionStatus::Playing => {}
    }
    let player = record.players.get(id).ok_or_else(|| {
        DomainError::validation(ValidationKind::PlayerNotFound, format!("{id} is not seated"))
    })?;
    if record.current_turn.as_ref() != Some(id) {
        return Err(DomainError::validation(
            ValidationKind::NotYourTurn,
            format!("it is not {id}'s turn"),
        ));
    }
    player
        .team
        .or_else(|| record.turn_slot(id).map(|s| s.team))
        .ok_or_else(|| DomainError::corruption(format!("{id} has no team")))
}

fn check_card_in_hand(record: &SessionRecord, id: &PlayerId, card: Card) -> Result<(), DomainError> {
    if record.player(id)?.hand.contains(&card) {
        Ok(())
    } else {
        Err(DomainError::validation(
            ValidationKind::CardNotInHand,
            format!("{card} is not in hand"),
        ))
    }
}

/// Take `card` out of the hand, draw a replacement, and apply the
/// bot-flag rule for human moves.
fn spend_card(
    record: &mut SessionRecord,
    id: &PlayerId,
    card: Card,
    actor: Actor,
) -> Result<(), DomainError> {
    let replacement = record.deck.draw(record.rng_seed);
    let player = record.player_mut(id)?;
    if let Some(idx) = player.hand.iter().position(|c| *c == card) {
        player.hand.remove(idx);
    }
    player.hand.extend(replacement);
    if actor == Actor::Human {
        player.is_bot = false;
    }
    Ok(())
}

/// Place or remove a marker.
pub fn apply_move(
    record: &mut SessionRecord,
    id: &PlayerId,
    card: Card,
    row: i32,
    col: i32,
    actor: Actor,
    now: i64,
) -> Result<AppliedMove, DomainError> {
    let team = check_turn(record, id)?;
    check_card_in_hand(record, id, card)?;
    let position = Position::try_new(row, col)?;
    let verdict = validate_move(card, position, &record.board, team);

    let mut applied = AppliedMove {
        player_id: id.clone(),
        card,
        position: Some(position),
        kind: MoveKind::Place,
        removed_team: None,
        winner: None,
        winning_cells: Vec::new(),
        next_turn: None,
    };

    match verdict {
        Verdict::Invalid => {
            return Err(DomainError::validation(
                ValidationKind::IllegalMove,
                format!("{card} cannot be used on ({row},{col})"),
            ))
        }
        Verdict::Place => {
            // The card sits on the board under the marker until removed.
            record.board.place(position, team, card)?;
            spend_card(record, id, card, actor)?;
            let win = check_win(&record.board, position, team);
            if win.won {
                record.status = SessionStatus::Finished;
                record.winner_team = Some(team);
                record.winning_sequence = win.cells.clone();
                applied.winner = Some(team);
                applied.winning_cells = win.cells;
            }
        }
        Verdict::Remove => {
            let chip = record.board.remove(position)?;
            record.deck.discard(card);
            record.deck.discard(chip.card);
            spend_card(record, id, card, actor)?;
            applied.kind = MoveKind::Remove;
            applied.removed_team = Some(chip.team);
        }
    }

    record.last_move = Some(LastMove {
        player_id: id.clone(),
        card,
        position: Some(position),
        kind: applied.kind,
        removed_team: applied.removed_team,
    });
    if record.status == SessionStatus::Playing {
        advance_turn(record, now);
    }
    applied.next_turn = record.current_turn.clone();
    Ok(applied)
}

/// Swap a card for a fresh one when nothing in hand can be played.
pub fn discard_when_stuck(
    record: &mut SessionRecord,
    id: &PlayerId,
    card: Card,
    actor: Actor,
    now: i64,
) -> Result<AppliedMove, DomainError> {
    let team = check_turn(record, id)?;
    check_card_in_hand(record, id, card)?;
    if has_any_legal_move(&record.player(id)?.hand, &record.board, team) {
        return Err(DomainError::validation(
            ValidationKind::HasLegalMove,
            "a legal move is available",
        ));
    }
    record.deck.discard(card);
    spend_card(record, id, card, actor)?;
    record.last_move = Some(LastMove {
        player_id: id.clone(),
        card,
        position: None,
        kind: MoveKind::Discard,
        removed_team: None,
    });
    advance_turn(record, now);
    Ok(AppliedMove {
        player_id: id.clone(),
        card,
        position: None,
        kind: MoveKind::Discard,
        removed_team: None,
        winner: None,
        winning_cells: Vec::new(),
        next_turn: record.current_turn.clone(),
    })
}

/// Skip a turn; only allowed with an empty hand (both piles exhausted).
pub fn pass_turn(record: &mut SessionRecord, id: &PlayerId, now: i64) -> Result<(), DomainError> {
    check_turn(record, id)?;
    if !record.player(id)?.hand.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::IllegalMove,
            "cannot pass while holding cards",
        ));
    }
    advance_turn(record, now);
    Ok(())
}

/// Move the turn to the next present identity in turn order, wrapping and
/// skipping departed players. Resets the turn timer.
pub fn advance_turn(record: &mut SessionRecord, now: i64) {
    let n = record.turn_order.len();
    let base = record
        .current_turn
        .as_ref()
        .and_then(|id| record.turn_order.iter().position(|s| &s.player_id == id))
        .map_or(0, |i| i + 1);
    let next = (0..n)
        .map(|k| &record.turn_order[(base + k) % n].player_id)
        .find(|id| record.players.contains_key(*id))
        .cloned();
    record.current_turn = next;
    record.turn_started_at = Some(now);
}
