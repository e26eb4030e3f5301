//! Per-player projection of a session: own hand visible, other hands
//! reduced to counts, password withheld.

use serde::Serialize;

use super::board::{Board, Position, Team, TeamColor};
use super::cards_types::Card;
use super::rules::has_any_legal_move;
use super::state::{
    ConnectionStatus, LastMove, PlayerId, SessionId, SessionRecord, SessionStatus, TurnSlot,
};
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicPlayer {
    pub id: PlayerId,
    pub name: String,
    pub seat: u32,
    pub team: Option<Team>,
    pub color: Option<TeamColor>,
    pub hand_count: usize,
    pub is_host: bool,
    pub status: ConnectionStatus,
    pub is_bot: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub session_id: SessionId,
    pub version: u64,
    pub status: SessionStatus,
    pub max_players: u8,
    pub is_private: bool,
    pub me: PlayerId,
    pub my_team: Option<Team>,
    pub my_hand: Vec<Card>,
    /// Whether the viewer is stuck and may use the stuck discard.
    pub must_discard: bool,
    pub players: Vec<PublicPlayer>,
    pub board: Board,
    pub turn_order: Vec<TurnSlot>,
    pub current_turn: Option<PlayerId>,
    pub turn_started_at: Option<i64>,
    pub draw_count: usize,
    pub discard_count: usize,
    pub discard_top: Option<Card>,
    pub winner_team: Option<Team>,
    pub winning_sequence: Vec<Position>,
    pub last_move: Option<LastMove>,
}

impl PlayerView {
    pub fn build(
        session_id: SessionId,
        version: u64,
        record: &SessionRecord,
        me: &PlayerId,
    ) -> Result<Self, DomainError> {
        let mine = record.player(me)?;
        let is_my_turn = record.current_turn.as_ref() == Some(me);
        let must_discard = record.status == SessionStatus::Playing
            && is_my_turn
            && !mine.hand.is_empty()
            && mine
                .team
                .is_some_and(|team| !has_any_legal_move(&mine.hand, &record.board, team));

        let players = record
            .players_by_seat()
            .into_iter()
            .map(|(id, p)| PublicPlayer {
                id: id.clone(),
                name: p.name.clone(),
                seat: p.seat,
                team: p.team,
                color: p.color,
                hand_count: p.hand.len(),
                is_host: p.is_host,
                status: p.status,
                is_bot: p.is_bot,
            })
            .collect();

        Ok(PlayerView {
            session_id,
            version,
            status: record.status,
            max_players: record.max_players,
            is_private: record.is_private,
            me: me.clone(),
            my_team: mine.team,
            my_hand: mine.hand.clone(),
            must_discard,
            players,
            board: record.board.clone(),
            turn_order: record.turn_order.clone(),
            current_turn: record.current_turn.clone(),
            turn_started_at: record.turn_started_at,
            draw_count: record.deck.draw_pile.len(),
            discard_count: record.deck.discard_pile.len(),
            discard_top: record.deck.discard_pile.last().copied(),
            winner_team: record.winner_team,
            winning_sequence: record.winning_sequence.clone(),
            last_move: record.last_move.clone(),
        })
    }
}
