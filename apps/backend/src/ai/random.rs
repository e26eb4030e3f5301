//! Random AI player - makes random legal moves.
//!
//! Baseline for the simulator and a fallback when a heuristic is not wanted.
//! The RNG sits behind a `Mutex` because [`AiPlayer`] takes `&self`.

use std::sync::Mutex;

use rand::prelude::*;

use super::trait_def::{AiError, AiPlayer};
use crate::domain::{legal_moves, Board, CandidateMove, Card, Team};

pub struct RandomPlayer {
    rng: Mutex<StdRng>,
}

impl RandomPlayer {
    pub const NAME: &'static str = "RandomPlayer";
    pub const VERSION: &'static str = "1.0.0";

    /// `Some(seed)` for reproducible play, `None` for OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl AiPlayer for RandomPlayer {
    fn choose_move(
        &self,
        board: &Board,
        hand: &[Card],
        team: Team,
    ) -> Result<Option<CandidateMove>, AiError> {
        let moves = legal_moves(hand, board, team);
        if moves.is_empty() {
            return Ok(None);
        }

        let mut rng = self
            .rng
            .lock()
            .map_err(|e| AiError::Internal(format!("RNG lock poisoned: {e}")))?;
        Ok(moves.choose(&mut *rng).copied())
    }
}
