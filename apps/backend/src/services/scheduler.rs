//! One server-owned ticking task per watched session.
//!
//! Tasks are keyed by session id; watching an already watched session is a
//! no-op. A task stops when its session finishes or disappears, or when it
//! is cancelled through [`SessionScheduler::unwatch`] or
//! [`SessionScheduler::shutdown`].

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::game_flow::GameFlowService;
use crate::domain::state::{SessionId, SessionStatus};
use crate::errors::ErrorCode;

struct Watch {
    token: Uuid,
    cancel: CancellationToken,
}

pub struct SessionScheduler {
    service: Arc<GameFlowService>,
    tasks: Arc<DashMap<SessionId, Watch>>,
    root: CancellationToken,
}

impl SessionScheduler {
    pub fn new(service: Arc<GameFlowService>) -> Self {
        Self {
            service,
            tasks: Arc::new(DashMap::new()),
            root: CancellationToken::new(),
        }
    }

    /// Start ticking `session_id`. Returns `false` if it was already watched.
    /// Must be called inside a Tokio runtime.
    pub fn watch(&self, session_id: &SessionId) -> bool {
        let token = Uuid::new_v4();
        let cancel = self.root.child_token();
        match self.tasks.entry(session_id.clone()) {
            Entry::Occupied(_) => {
                debug!(session_id = %session_id, "already watched");
                return false;
            }
            Entry::Vacant(slot) => {
                slot.insert(Watch {
                    token,
                    cancel: cancel.clone(),
                });
            }
        }

        let service = Arc::clone(&self.service);
        let tasks = Arc::clone(&self.tasks);
        let id = session_id.clone();
        tokio::spawn(async move {
            run_ticks(&service, &id, cancel).await;
            tasks.remove_if(&id, |_, watch| watch.token == token);
        });
        info!(session_id = %session_id, "scheduler watching session");
        true
    }

    /// Stop ticking `session_id`. Returns whether a task was running.
    pub fn unwatch(&self, session_id: &SessionId) -> bool {
        match self.tasks.remove(session_id) {
            Some((_, watch)) => {
                watch.cancel.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_watching(&self, session_id: &SessionId) -> bool {
        self.tasks.contains_key(session_id)
    }

    pub fn watched_count(&self) -> usize {
        self.tasks.len()
    }

    /// Cancel every task.
    pub fn shutdown(&self) {
        self.root.cancel();
        self.tasks.clear();
    }
}

impl Drop for SessionScheduler {
    fn drop(&mut self) {
        self.root.cancel();
    }
}

async fn run_ticks(service: &GameFlowService, session_id: &SessionId, cancel: CancellationToken) {
    let mut ticker = interval(service.config().tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!(session_id = %session_id, "scheduler cancelled");
                return;
            }
            _ = ticker.tick() => {}
        }

        match service.tick(session_id).await {
            Ok(report) if report.status == SessionStatus::Finished => {
                info!(session_id = %session_id, "session finished, scheduler stopping");
                return;
            }
            Ok(_) => {}
            Err(err) if err.code() == ErrorCode::SessionNotFound => {
                info!(session_id = %session_id, "session gone, scheduler stopping");
                return;
            }
            Err(err) => {
                warn!(session_id = %session_id, code = %err.code(), error = %err, "tick failed");
            }
        }
    }
}
