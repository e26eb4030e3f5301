//! The persisted session aggregate and its player entries.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::board::{Board, Position, Team, TeamColor};
use super::cards_types::Card;
use super::deck::{Deck, DECK_SIZE};
use super::rules::MoveKind;
use crate::errors::domain::{DomainError, NotFoundKind};

/// Opaque, stable player identity supplied by the identity provider.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

/// Room code of a session.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

macro_rules! string_id {
    ($ty:ident) => {
        impl $ty {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $ty {
            fn from(s: &str) -> Self {
                $ty(s.to_string())
            }
        }

        impl From<String> for $ty {
            fn from(s: String) -> Self {
                $ty(s)
            }
        }
    };
}

string_id!(PlayerId);
string_id!(SessionId);

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Waiting,
    Playing,
    Finished,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Online,
    Offline,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub name: String,
    /// Join slot, never reused within a session.
    pub seat: u32,
    pub team: Option<Team>,
    pub color: Option<TeamColor>,
    pub hand: Vec<Card>,
    pub is_host: bool,
    pub status: ConnectionStatus,
    pub is_bot: bool,
    /// Epoch millis of the last heartbeat.
    pub last_seen: i64,
    /// Epoch millis when the player was last marked offline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offline_since: Option<i64>,
}

impl PlayerRecord {
    pub fn new(name: String, seat: u32, now: i64) -> Self {
        PlayerRecord {
            name,
            seat,
            team: None,
            color: None,
            hand: Vec::new(),
            is_host: false,
            status: ConnectionStatus::Online,
            is_bot: false,
            last_seen: now,
            offline_since: None,
        }
    }

    pub fn set_team(&mut self, team: Team) {
        self.team = Some(team);
        self.color = Some(team.color());
    }

    pub fn is_online(&self) -> bool {
        self.status == ConnectionStatus::Online
    }
}

/// One entry of the fixed turn order.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnSlot {
    pub player_id: PlayerId,
    pub team: Team,
    pub seat: u32,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMove {
    pub player_id: PlayerId,
    pub card: Card,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    pub kind: MoveKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed_team: Option<Team>,
}

/// The whole session document. Every mutation replaces it wholesale
/// under a version check.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub status: SessionStatus,
    pub max_players: u8,
    pub players: BTreeMap<PlayerId, PlayerRecord>,
    pub board: Board,
    #[serde(flatten)]
    pub deck: Deck,
    pub turn_order: Vec<TurnSlot>,
    pub current_turn: Option<PlayerId>,
    pub turn_started_at: Option<i64>,
    pub winner_team: Option<Team>,
    pub winning_sequence: Vec<Position>,
    pub last_move: Option<LastMove>,
    pub created_at: i64,
    pub is_private: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub rng_seed: u64,
    pub next_seat: u32,
}

impl SessionRecord {
    pub fn player(&self, id: &PlayerId) -> Result<&PlayerRecord, DomainError> {
        self.players
            .get(id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, format!("player {id} not in session")))
    }

    pub fn player_mut(&mut self, id: &PlayerId) -> Result<&mut PlayerRecord, DomainError> {
        self.players
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, format!("player {id} not in session")))
    }

    pub fn host(&self) -> Option<&PlayerId> {
        self.players
            .iter()
            .find(|(_, p)| p.is_host)
            .map(|(id, _)| id)
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= usize::from(self.max_players)
    }

    /// Present players ordered by seat.
    pub fn players_by_seat(&self) -> Vec<(&PlayerId, &PlayerRecord)> {
        let mut seated: Vec<_> = self.players.iter().collect();
        seated.sort_by_key(|(_, p)| p.seat);
        seated
    }

    pub fn turn_slot(&self, id: &PlayerId) -> Option<&TurnSlot> {
        self.turn_order.iter().find(|s| &s.player_id == id)
    }

    /// Cards across draw pile, discard pile, hands and the board.
    pub fn card_count(&self) -> usize {
        self.deck.len()
            + self.players.values().map(|p| p.hand.len()).sum::<usize>()
            + self.board.occupied_count()
    }

    /// Structural checks run before every write.
    pub fn check_invariants(&self) -> Result<(), DomainError> {
        if self.status != SessionStatus::Waiting {
            let count = self.card_count();
            if count != DECK_SIZE {
                return Err(DomainError::corruption(format!(
                    "card count {count} != {DECK_SIZE}"
                )));
            }
        }
        if self.status == SessionStatus::Playing {
            if let Some(current) = &self.current_turn {
                if !self.players.contains_key(current) {
                    return Err(DomainError::corruption(format!(
                        "current turn {current} is not in the roster"
                    )));
                }
            }
        }
        let hosts = self.players.values().filter(|p| p.is_host).count();
        if hosts > 1 {
            return Err(DomainError::corruption(format!("{hosts} hosts in session")));
        }
        Ok(())
    }
}
