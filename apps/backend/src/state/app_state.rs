use std::sync::Arc;

use crate::config::EngineConfig;
use crate::services::game_flow::GameFlowService;
use crate::services::scheduler::SessionScheduler;

/// Shared handles for a running engine.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<GameFlowService>,
    pub scheduler: Arc<SessionScheduler>,
}

impl AppState {
    pub fn new(sessions: Arc<GameFlowService>) -> Self {
        let scheduler = Arc::new(SessionScheduler::new(Arc::clone(&sessions)));
        Self {
            sessions,
            scheduler,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        self.sessions.config()
    }
}
