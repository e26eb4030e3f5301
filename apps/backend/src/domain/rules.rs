//! Move legality: which card may target which cell.

use serde::{Deserialize, Serialize};

use super::board::{Board, Position, Team};
use super::cards_types::Card;
use crate::errors::domain::{DomainError, ValidationKind};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

/// Hand size: 7 cards for 2–3 players, 6 for 4.
pub fn hand_size_for_players(players: usize) -> Result<usize, DomainError> {
    match players {
        2 | 3 => Ok(7),
        4 => Ok(6),
        n => Err(DomainError::validation(
            ValidationKind::InvalidPlayerCount,
            format!("{n} players; a session needs {MIN_PLAYERS} to {MAX_PLAYERS}"),
        )),
    }
}

/// Outcome of validating a single card against a single cell.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Verdict {
    Place,
    Remove,
    Invalid,
}

/// Board-affecting move kinds plus the stuck discard.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveKind {
    Place,
    Remove,
    Discard,
}

/// A legal board move.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CandidateMove {
    pub card: Card,
    pub position: Position,
    pub kind: MoveKind,
}

/// Decide whether `card` may be used on `target` by `team`. Pure.
pub fn validate_move(card: Card, target: Position, board: &Board, team: Team) -> Verdict {
    match card {
        Card::OneEyedJack(_) => match board.chip(target) {
            Some(chip) if chip.team != team && !target.is_corner() => {
                Verdict::Remove
            }
            _ => Verdict::Invalid,
        },
        Card::TwoEyedJack(_) if board.is_open(target) => Verdict::Place,
        Card::Normal { .. } if board.is_open(target) && target.printed().matches(&card) => {
            Verdict::Place
        }
        _ => Verdict::Invalid,
    }
}

/// Every legal move for one card.
pub fn legal_targets(card: Card, board: &Board, team: Team) -> Vec<CandidateMove> {
    Position::all()
        .filter_map(|position| {
            let kind = match validate_move(card, position, board, team) {
                Verdict::Place => MoveKind::Place,
                Verdict::Remove => MoveKind::Remove,
                Verdict::Invalid => return None,
            };
            Some(CandidateMove {
                card,
                position,
                kind,
            })
        })
        .collect()
}

/// Every legal move across a hand. Duplicate cards are considered once.
pub fn legal_moves(hand: &[Card], board: &Board, team: Team) -> Vec<CandidateMove> {
    let mut seen: Vec<Card> = Vec::with_capacity(hand.len());
    let mut moves = Vec::new();
    for &card in hand {
        if seen.contains(&card) {
            continue;
        }
        seen.push(card);
        moves.extend(legal_targets(card, board, team));
    }
    moves
}

pub fn has_any_legal_move(hand: &[Card], board: &Board, team: Team) -> bool {
    hand.iter().any(|&card| {
        Position::all().any(|pos| validate_move(card, pos, board, team) != Verdict::Invalid)
    })
}
