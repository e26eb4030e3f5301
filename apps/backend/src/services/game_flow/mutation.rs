use tracing::{debug, info, warn};

use super::GameFlowService;
use crate::domain::session_transition::{derive_session_transitions, SessionTransition};
use crate::domain::state::{SessionId, SessionRecord};
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError};
use crate::repos::sessions::StoreError;

#[derive(Debug)]
pub struct MutationOutcome<T> {
    pub value: T,
    /// Store version after the mutation (unchanged when nothing was written).
    pub version: u64,
    pub transitions: Vec<SessionTransition>,
    pub record: SessionRecord,
}

impl GameFlowService {
    /// Read, mutate a copy, validate, compare-and-swap; retried with a fresh
    /// read on version conflicts up to `max_write_retries` attempts.
    ///
    /// `mutation` may run several times and must only touch the record it
    /// is given. An error from it aborts without writing. A mutation that
    /// leaves the record unchanged is not written either.
    pub(super) async fn run_mutation<T, E, F>(
        &self,
        session_id: &SessionId,
        op: &'static str,
        mut mutation: F,
    ) -> Result<MutationOutcome<T>, AppError>
    where
        F: FnMut(&mut SessionRecord, i64) -> Result<T, E> + Send,
        E: Into<AppError>,
        T: Send,
    {
        let max_attempts = self.config.max_write_retries;
        for attempt in 1..=max_attempts {
            let current = self.store.read(session_id).await?;
            let before = current.value;
            let mut after = before.clone();
            let value = mutation(&mut after, self.now()).map_err(Into::into)?;

            if after == before {
                return Ok(MutationOutcome {
                    value,
                    version: current.version,
                    transitions: Vec::new(),
                    record: after,
                });
            }

            if let Err(err) = after.check_invariants() {
                warn!(session_id = %session_id, op, error = %err, "mutation broke record invariants");
                return Err(err.into());
            }

            match self
                .store
                .update(session_id, after.clone(), current.version)
                .await
            {
                Ok(version) => {
                    let transitions = derive_session_transitions(&before, &after);
                    info!(
                        session_id = %session_id,
                        op,
                        version,
                        attempt,
                        transitions = transitions.len(),
                        "session updated"
                    );
                    return Ok(MutationOutcome {
                        value,
                        version,
                        transitions,
                        record: after,
                    });
                }
                Err(StoreError::VersionConflict { expected, actual }) => {
                    debug!(
                        session_id = %session_id,
                        op,
                        attempt,
                        expected,
                        actual,
                        "version conflict, retrying"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }

        warn!(session_id = %session_id, op, max_attempts, "write retries exhausted");
        Err(DomainError::conflict(
            ConflictKind::RetriesExhausted,
            format!("{op} on {session_id} lost {max_attempts} write races"),
        )
        .into())
    }
}
