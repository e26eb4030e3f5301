//! AI player module - automated move selection for bot-controlled seats.
//!
//! - [`AiPlayer`]: the decision trait
//! - [`HeuristicPlayer`]: scoring heuristic used for bot takeover
//! - [`RandomPlayer`]: uniformly random legal moves (seedable)

mod config;
mod heuristic;
mod random;
pub mod registry;
mod trait_def;

pub use config::AiConfig;
pub use heuristic::{placement_score, removal_score, run_value, HeuristicPlayer, CRITICAL};
pub use random::RandomPlayer;
use serde_json::Value as JsonValue;
pub use trait_def::{AiError, AiPlayer};

/// Create an AI player from its config key and optional JSON config.
///
/// Returns None if the key is unrecognized.
pub fn create_ai(key: &str, config: Option<&JsonValue>) -> Option<Box<dyn AiPlayer>> {
    let config = AiConfig::from_json(config);
    registry::by_key(key).map(|factory| (factory.make)(config.seed()))
}
