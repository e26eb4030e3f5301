//! Session flow service: bridges the pure domain transitions with the
//! versioned session store.
//!
//! Every mutating operation goes through [`GameFlowService::run_mutation`],
//! which reads the record, applies a domain transition to a copy, checks the
//! record invariants and writes it back with compare-and-swap, retrying on
//! version conflicts.

mod ai_coordinator;
mod connectivity;
mod lobby;
mod mutation;
mod player_actions;

use std::sync::Arc;

pub use connectivity::TickReport;
pub use lobby::{CreateSession, OpenSession};
pub use mutation::MutationOutcome;
pub use player_actions::{MoveOutcome, MoveRejection};

use crate::ai::{create_ai, AiPlayer};
use crate::config::EngineConfig;
use crate::error::AppError;
use crate::repos::sessions::SessionStore;
use crate::utils::clock::Clock;

pub struct GameFlowService {
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
    bot: Arc<dyn AiPlayer>,
}

impl GameFlowService {
    /// Service whose bot seats are driven by the AI named in `config`.
    pub fn new(
        store: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Result<Self, AppError> {
        let bot = create_ai(&config.bot_ai, None).ok_or_else(|| {
            AppError::config(format!("SEQUENCE_BOT_AI '{}' is not registered", config.bot_ai))
        })?;
        Ok(Self {
            store,
            clock,
            config,
            bot: Arc::from(bot),
        })
    }

    /// Replace the bot AI (seeded players in tests and the simulator).
    pub fn with_bot(mut self, bot: Arc<dyn AiPlayer>) -> Self {
        self.bot = bot;
        self
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn now(&self) -> i64 {
        self.clock.now_millis()
    }
}
