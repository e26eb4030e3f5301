use serde::Serialize;
use tracing::info;

use super::GameFlowService;
use crate::domain::lobby::{self, JoinKind, NewSession};
use crate::domain::state::{PlayerId, SessionId, SessionStatus};
use crate::error::AppError;

/// Host-chosen settings for a new session.
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub host_id: PlayerId,
    pub host_name: String,
    pub max_players: u8,
    pub is_private: bool,
    pub password: Option<String>,
}

/// Lobby listing entry for a joinable session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSession {
    pub session_id: SessionId,
    pub host_name: Option<String>,
    pub player_count: usize,
    pub max_players: u8,
    pub is_private: bool,
    pub created_at: i64,
}

impl GameFlowService {
    pub async fn create_session(&self, settings: CreateSession) -> Result<SessionId, AppError> {
        let host_id = settings.host_id.clone();
        let record = lobby::new_session(
            NewSession {
                host_id: settings.host_id,
                host_name: settings.host_name,
                max_players: settings.max_players,
                is_private: settings.is_private,
                password: settings.password,
            },
            rand::random(),
            self.now(),
        )?;
        let created = self.store.create(record).await?;
        info!(
            session_id = %created.value,
            player_id = %host_id,
            max_players = settings.max_players,
            is_private = settings.is_private,
            "session created"
        );
        Ok(created.value)
    }

    pub async fn join_session(
        &self,
        session_id: &SessionId,
        player_id: &PlayerId,
        name: &str,
        password: Option<&str>,
    ) -> Result<JoinKind, AppError> {
        let outcome = self
            .run_mutation(session_id, "join", |record, now| {
                lobby::join(record, player_id, name, password, now)
            })
            .await?;
        info!(session_id = %session_id, player_id = %player_id, kind = ?outcome.value, "player joined");
        Ok(outcome.value)
    }

    /// `waiting → playing`. Concurrent starts race on the record version;
    /// the loser re-reads and gets `ALREADY_STARTED`.
    pub async fn start_session(&self, session_id: &SessionId) -> Result<(), AppError> {
        let outcome = self
            .run_mutation(session_id, "start", |record, now| lobby::start(record, now))
            .await?;
        info!(
            session_id = %session_id,
            version = outcome.version,
            players = outcome.record.turn_order.len(),
            "session started"
        );
        Ok(())
    }

    /// Explicit leave. Leaving a session one is not part of is a no-op.
    pub async fn leave(&self, session_id: &SessionId, player_id: &PlayerId) -> Result<(), AppError> {
        let outcome = self
            .run_mutation(session_id, "leave", |record, now| {
                Ok::<_, AppError>(lobby::leave(record, player_id, now))
            })
            .await?;
        if outcome.value {
            info!(session_id = %session_id, player_id = %player_id, "player left");
        }
        Ok(())
    }

    /// Waiting sessions with a free seat, oldest first.
    pub async fn list_open_sessions(&self) -> Result<Vec<OpenSession>, AppError> {
        let mut open: Vec<OpenSession> = self
            .store
            .list()
            .await?
            .into_iter()
            .filter(|(_, s)| s.value.status == SessionStatus::Waiting && !s.value.is_full())
            .map(|(session_id, s)| {
                let record = s.value;
                OpenSession {
                    host_name: record
                        .host()
                        .and_then(|id| record.players.get(id))
                        .map(|p| p.name.clone()),
                    player_count: record.players.len(),
                    max_players: record.max_players,
                    is_private: record.is_private,
                    created_at: record.created_at,
                    session_id,
                }
            })
            .collect();
        open.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.session_id.cmp(&b.session_id))
        });
        Ok(open)
    }
}
