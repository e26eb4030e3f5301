use tracing::{debug, info, warn};

use super::{GameFlowService, MutationOutcome};
use crate::domain::state::{PlayerId, SessionId, SessionRecord, SessionStatus};
use crate::domain::turns::{self, Actor, AppliedMove};
use crate::error::AppError;
use crate::errors::domain::DomainError;

fn as_millis(d: std::time::Duration) -> i64 {
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}

impl GameFlowService {
    /// The bot-controlled player whose turn is inside the bot window
    /// (`bot_min_delay <= turn age < bot_max_turn`), if any.
    pub fn bot_turn_due(&self, record: &SessionRecord, now: i64) -> Option<PlayerId> {
        if record.status != SessionStatus::Playing {
            return None;
        }
        let id = record.current_turn.as_ref()?;
        if !record.players.get(id)?.is_bot {
            return None;
        }
        let age = now - record.turn_started_at?;
        let window = as_millis(self.config.bot_min_delay)..as_millis(self.config.bot_max_turn);
        window.contains(&age).then(|| id.clone())
    }

    /// One bot decision applied to `record`. The AI proposes; the move goes
    /// through the same transition a human move does. With nothing to play
    /// the bot trades its first card, and with an empty hand it passes.
    fn bot_step(
        &self,
        record: &mut SessionRecord,
        now: i64,
    ) -> Result<Option<AppliedMove>, AppError> {
        let Some(id) = self.bot_turn_due(record, now) else {
            return Ok(None);
        };
        let player = record.player(&id)?;
        let team = player
            .team
            .ok_or_else(|| DomainError::corruption(format!("bot {id} has no team")))?;
        let hand = player.hand.clone();

        let applied = match self.bot.choose_move(&record.board, &hand, team)? {
            Some(mv) => {
                let (row, col) = (mv.position.row() as i32, mv.position.col() as i32);
                turns::apply_move(record, &id, mv.card, row, col, Actor::Bot, now)?
            }
            None => match hand.first() {
                Some(&card) => turns::discard_when_stuck(record, &id, card, Actor::Bot, now)?,
                None => {
                    turns::pass_turn(record, &id, now)?;
                    debug!(player_id = %id, "bot passed with an empty hand");
                    return Ok(None);
                }
            },
        };
        Ok(Some(applied))
    }

    /// Play the due bot turn, if any.
    ///
    /// A refused bot move (the record moved on under it) is logged and
    /// reported as `None`.
    pub(super) async fn run_bot_turn(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<MutationOutcome<Option<AppliedMove>>>, AppError> {
        let result = self
            .run_mutation(session_id, "bot_move", |record, now| self.bot_step(record, now))
            .await;

        match result {
            Ok(outcome) => {
                if let Some(applied) = &outcome.value {
                    info!(
                        session_id = %session_id,
                        player_id = %applied.player_id,
                        card = %applied.card,
                        kind = ?applied.kind,
                        winner = ?applied.winner,
                        version = outcome.version,
                        "bot moved"
                    );
                }
                Ok(Some(outcome))
            }
            Err(err) if err.is_validation() => {
                warn!(
                    session_id = %session_id,
                    code = %err.code(),
                    detail = %err.detail(),
                    "bot move refused"
                );
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}
