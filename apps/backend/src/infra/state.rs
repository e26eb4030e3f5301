use std::sync::Arc;

use crate::adapters::sessions_memory::InMemorySessionStore;
use crate::ai::AiPlayer;
use crate::config::EngineConfig;
use crate::error::AppError;
use crate::repos::sessions::SessionStore;
use crate::services::game_flow::GameFlowService;
use crate::state::app_state::AppState;
use crate::utils::clock::{Clock, SystemClock};

/// Builder for creating AppState instances (used in tests, the simulator
/// and embedding hosts). Unset parts fall back to the in-memory store, the
/// system clock and configuration from the environment.
#[derive(Default)]
pub struct StateBuilder {
    store: Option<Arc<dyn SessionStore>>,
    clock: Option<Arc<dyn Clock>>,
    config: Option<EngineConfig>,
    bot: Option<Arc<dyn AiPlayer>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_bot(mut self, bot: Arc<dyn AiPlayer>) -> Self {
        self.bot = Some(bot);
        self
    }

    pub fn build(self) -> Result<AppState, AppError> {
        let config = match self.config {
            Some(config) => {
                config.validate()?;
                config
            }
            None => EngineConfig::from_env()?,
        };
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(InMemorySessionStore::new()));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let mut service = GameFlowService::new(store, clock, config)?;
        if let Some(bot) = self.bot {
            service = service.with_bot(bot);
        }
        Ok(AppState::new(Arc::new(service)))
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_with_explicit_config() {
        let state = build_state()
            .with_config(EngineConfig::default())
            .build()
            .unwrap();
        assert_eq!(state.config().max_write_retries, 5);
        assert_eq!(state.scheduler.watched_count(), 0);
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let config = EngineConfig {
            max_write_retries: 0,
            ..EngineConfig::default()
        };
        assert!(build_state().with_config(config).build().is_err());
    }
}
