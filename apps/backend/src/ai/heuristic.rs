//! Heuristic: scores every legal move and keeps one-eyed jacks for real
//! threats.
//!
//! Placement: for each of the four axes through the cell, the run of own
//! markers (corners included) the placement would produce, mapped through
//! [`run_value`] and summed.
//!
//! Removal: for each axis, the opponent run through the targeted marker.
//! A run only counts when it has an open cell at one of its ends and the
//! axis has room for a full sequence; four or more is critical, three is
//! worth a modest bonus.
//!
//! Selection:
//! - a critical removal is played immediately;
//! - otherwise the best placement wins unless a removal beats it by half
//!   again;
//! - ties are broken uniformly at random;
//! - with no placement at all any legal move will do.

use std::sync::Mutex;

use rand::prelude::*;

use super::trait_def::{AiError, AiPlayer};
use crate::domain::sequence::{line_through, DIRECTIONS, SEQUENCE_LENGTH};
use crate::domain::{legal_moves, Board, CandidateMove, Card, MoveKind, Position, Team};

/// Removal score that blocks an imminent win.
pub const CRITICAL: u32 = 1000;
const THREAT: u32 = 50;

/// Value of a run of own markers of the given length.
pub fn run_value(len: usize) -> u32 {
    match len {
        n if n >= SEQUENCE_LENGTH => 1000,
        4 => 50,
        3 => 20,
        2 => 5,
        _ => 0,
    }
}

/// Score of placing a `team` marker on `pos`.
pub fn placement_score(board: &Board, pos: Position, team: Team) -> u32 {
    DIRECTIONS
        .iter()
        .map(|&dir| run_value(line_through(pos, dir, |p| board.counts_for(p, team)).len()))
        .sum()
}

/// Score of removing the opponent marker on `pos`.
pub fn removal_score(board: &Board, pos: Position) -> u32 {
    let Some(opponent) = board.owner(pos) else {
        return 0;
    };
    DIRECTIONS
        .iter()
        .map(|&dir| {
            let run = line_through(pos, dir, |p| board.counts_for(p, opponent));
            if run.len() < 3 {
                return 0;
            }
            let (first, last) = (run[0], run[run.len() - 1]);
            let open_end = [
                first.offset(-dir.0, -dir.1, 1),
                last.offset(dir.0, dir.1, 1),
            ]
            .into_iter()
            .flatten()
            .any(|p| board.is_open(p));
            let room =
                line_through(pos, dir, |p| board.counts_for(p, opponent) || board.is_open(p));
            if !open_end || room.len() < SEQUENCE_LENGTH {
                return 0;
            }
            if run.len() >= 4 {
                CRITICAL
            } else {
                THREAT
            }
        })
        .sum()
}

#[derive(Debug, Clone, Copy)]
struct Scored {
    mv: CandidateMove,
    score: u32,
}

pub struct HeuristicPlayer {
    rng: Mutex<StdRng>,
}

impl HeuristicPlayer {
    pub const NAME: &'static str = "HeuristicPlayer";
    pub const VERSION: &'static str = "1.0.0";

    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }

    fn pick_best(candidates: &[Scored], rng: &mut StdRng) -> Option<CandidateMove> {
        let best = candidates.iter().map(|c| c.score).max()?;
        let top: Vec<&Scored> = candidates.iter().filter(|c| c.score == best).collect();
        top.choose(rng).map(|c| c.mv)
    }
}

impl AiPlayer for HeuristicPlayer {
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

        let (placements, removals): (Vec<Scored>, Vec<Scored>) = moves
            .iter()
            .map(|&mv| Scored {
                mv,
                score: match mv.kind {
                    MoveKind::Place => placement_score(board, mv.position, team),
                    MoveKind::Remove => removal_score(board, mv.position),
                    MoveKind::Discard => 0,
                },
            })
            .partition(|s| s.mv.kind == MoveKind::Place);

        let mut rng = self
            .rng
            .lock()
            .map_err(|e| AiError::Internal(format!("RNG lock poisoned: {e}")))?;

        let best_removal = removals.iter().map(|s| s.score).max().unwrap_or(0);
        if best_removal >= CRITICAL {
            return Ok(Self::pick_best(&removals, &mut rng));
        }

        if placements.is_empty() {
            return Ok(moves.choose(&mut *rng).copied());
        }

        let best_placement = placements.iter().map(|s| s.score).max().unwrap_or(0);
        // Removals spend a scarce card; only take one when clearly better.
        if best_removal > 0 && u64::from(best_removal) * 2 > u64::from(best_placement) * 3 {
            return Ok(Self::pick_best(&removals, &mut rng));
        }
        Ok(Self::pick_best(&placements, &mut rng))
    }
}
