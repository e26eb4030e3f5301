use serde::Serialize;
use tracing::{debug, info};

use super::GameFlowService;
use crate::domain::connectivity::mark_offline;
use crate::domain::player_view::PlayerView;
use crate::domain::session_transition::SessionTransition;
use crate::domain::state::{PlayerId, SessionId};
use crate::domain::turns::{self, Actor, AppliedMove};
use crate::domain::Card;
use crate::error::AppError;
use crate::errors::ErrorCode;

/// Why a move was refused. The record is untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveRejection {
    pub code: ErrorCode,
    pub detail: String,
}

#[derive(Debug, Clone)]
pub enum MoveOutcome {
    Applied {
        applied: AppliedMove,
        version: u64,
        transitions: Vec<SessionTransition>,
    },
    Rejected(MoveRejection),
}

impl MoveOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MoveOutcome::Applied { .. })
    }

    pub fn rejection_code(&self) -> Option<ErrorCode> {
        match self {
            MoveOutcome::Rejected(r) => Some(r.code),
            MoveOutcome::Applied { .. } => None,
        }
    }
}

/// Validation failures become a rejection; anything else is an error.
fn into_outcome(
    result: Result<super::MutationOutcome<AppliedMove>, AppError>,
) -> Result<MoveOutcome, AppError> {
    match result {
        Ok(outcome) => Ok(MoveOutcome::Applied {
            applied: outcome.value,
            version: outcome.version,
            transitions: outcome.transitions,
        }),
        Err(err) if err.is_validation() => Ok(MoveOutcome::Rejected(MoveRejection {
            code: err.code(),
            detail: err.detail(),
        })),
        Err(err) => Err(err),
    }
}

impl GameFlowService {
    /// Play `card` on `(row, col)` as a human move.
    pub async fn attempt_move(
        &self,
        session_id: &SessionId,
        player_id: &PlayerId,
        card: Card,
        row: i32,
        col: i32,
    ) -> Result<MoveOutcome, AppError> {
        let result = self
            .run_mutation(session_id, "move", |record, now| {
                turns::apply_move(record, player_id, card, row, col, Actor::Human, now)
            })
            .await;
        let outcome = into_outcome(result)?;
        match &outcome {
            MoveOutcome::Applied { applied, version, .. } => info!(
                session_id = %session_id,
                player_id = %player_id,
                card = %card,
                row,
                col,
                kind = ?applied.kind,
                version,
                winner = ?applied.winner,
                "move applied"
            ),
            MoveOutcome::Rejected(r) => debug!(
                session_id = %session_id,
                player_id = %player_id,
                code = %r.code,
                "move rejected"
            ),
        }
        Ok(outcome)
    }

    /// Trade an unplayable card when the hand has no legal move.
    pub async fn discard_when_stuck(
        &self,
        session_id: &SessionId,
        player_id: &PlayerId,
        card: Card,
    ) -> Result<MoveOutcome, AppError> {
        let result = self
            .run_mutation(session_id, "discard", |record, now| {
                turns::discard_when_stuck(record, player_id, card, Actor::Human, now)
            })
            .await;
        let outcome = into_outcome(result)?;
        if outcome.is_applied() {
            info!(session_id = %session_id, player_id = %player_id, card = %card, "stuck discard");
        }
        Ok(outcome)
    }

    /// Record that the player is still connected. Status changes are left
    /// to the next tick.
    pub async fn heartbeat(
        &self,
        session_id: &SessionId,
        player_id: &PlayerId,
    ) -> Result<(), AppError> {
        self.run_mutation(session_id, "heartbeat", |record, now| {
            record.player_mut(player_id).map(|p| p.last_seen = now)
        })
        .await?;
        Ok(())
    }

    /// The client signalled it is going away: mark offline immediately.
    pub async fn disconnect(
        &self,
        session_id: &SessionId,
        player_id: &PlayerId,
    ) -> Result<(), AppError> {
        let outcome = self
            .run_mutation(session_id, "disconnect", |record, now| {
                Ok::<_, AppError>(mark_offline(record, player_id, now))
            })
            .await?;
        if outcome.value {
            info!(session_id = %session_id, player_id = %player_id, "player disconnected");
        }
        Ok(())
    }

    /// What `player_id` is allowed to see of the session.
    pub async fn player_view(
        &self,
        session_id: &SessionId,
        player_id: &PlayerId,
    ) -> Result<PlayerView, AppError> {
        let current = self.store.read(session_id).await?;
        Ok(PlayerView::build(
            session_id.clone(),
            current.version,
            &current.value,
            player_id,
        )?)
    }
}
