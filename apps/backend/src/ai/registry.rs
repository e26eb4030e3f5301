//! Registered AI implementations, looked up by their config key
//! (`SEQUENCE_BOT_AI`). Same seed means same decisions.

use crate::ai::{AiPlayer, HeuristicPlayer, RandomPlayer};

/// Factory definition for constructing AI implementations.
pub struct AiFactory {
    /// Short key used in configuration.
    pub key: &'static str,
    pub name: &'static str,
    pub version: &'static str,
    pub make: fn(seed: Option<u64>) -> Box<dyn AiPlayer>,
}

static AI_FACTORIES: &[AiFactory] = &[
    AiFactory {
        key: "heuristic",
        name: HeuristicPlayer::NAME,
        version: HeuristicPlayer::VERSION,
        make: make_heuristic,
    },
    AiFactory {
        key: "random",
        name: RandomPlayer::NAME,
        version: RandomPlayer::VERSION,
        make: make_random_player,
    },
];

pub fn registered_ais() -> &'static [AiFactory] {
    AI_FACTORIES
}

pub fn by_key(key: &str) -> Option<&'static AiFactory> {
    registered_ais().iter().find(|factory| factory.key == key)
}

fn make_random_player(seed: Option<u64>) -> Box<dyn AiPlayer> {
    Box::new(RandomPlayer::new(seed))
}

fn make_heuristic(seed: Option<u64>) -> Box<dyn AiPlayer> {
    Box::new(HeuristicPlayer::new(seed))
}
