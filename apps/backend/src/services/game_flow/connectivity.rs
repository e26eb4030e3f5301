use tracing::info;

use super::GameFlowService;
use crate::domain::connectivity::{evaluate, ConnectivityChange};
use crate::domain::state::{SessionId, SessionStatus};
use crate::domain::turns::AppliedMove;
use crate::error::AppError;

/// What one tick did to a session.
#[derive(Debug, Clone)]
pub struct TickReport {
    pub changes: Vec<ConnectivityChange>,
    pub bot_move: Option<AppliedMove>,
    pub status: SessionStatus,
    pub version: u64,
}

impl GameFlowService {
    /// Connectivity bookkeeping for every player, then one bot move if a
    /// bot-controlled player is due. Finished sessions are left alone.
    pub async fn tick(&self, session_id: &SessionId) -> Result<TickReport, AppError> {
        let timings = self.config.timings;
        let outcome = self
            .run_mutation(session_id, "tick", |record, now| {
                Ok::<_, AppError>(evaluate(record, now, &timings))
            })
            .await?;
        for change in &outcome.value {
            info!(session_id = %session_id, change = ?change, "connectivity change");
        }

        let mut report = TickReport {
            changes: outcome.value,
            bot_move: None,
            status: outcome.record.status,
            version: outcome.version,
        };
        if report.status != SessionStatus::Playing {
            return Ok(report);
        }

        if let Some(bot) = self.run_bot_turn(session_id).await? {
            report.status = bot.record.status;
            report.version = bot.version;
            report.bot_move = bot.value;
        }
        Ok(report)
    }
}
