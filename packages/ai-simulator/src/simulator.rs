//! Bot-only games driven through the session service.
//!
//! Every seat is played by its own AI. Moves go through
//! `GameFlowService` exactly like client moves, so the same validation,
//! compare-and-swap and invariant checks apply. The record is re-checked
//! after every step.

use std::error::Error;
use std::sync::Arc;

use backend::ai::AiPlayer;
use backend::domain::lobby::{self, NewSession};
use backend::domain::{MoveKind, PlayerId, Position, SessionStatus, Team};
use backend::utils::clock::{Clock, ManualClock};
use backend::{EngineConfig, GameFlowService, InMemorySessionStore, MoveOutcome, SessionStore};

/// Fixed start instant for simulated clocks.
const SIM_EPOCH_MS: i64 = 1_700_000_000_000;
/// Simulated time spent per turn.
const TURN_MS: i64 = 1_000;

#[derive(Debug, Clone)]
pub struct SeatResult {
    pub player_id: PlayerId,
    pub team: Team,
    pub ai: String,
}

/// Result of simulating a complete game.
#[derive(Debug, Clone)]
pub struct GameResult {
    pub seats: Vec<SeatResult>,
    /// `None` when the game stalled before anyone completed a sequence.
    pub winner: Option<Team>,
    pub winning_sequence: Vec<Position>,
    pub turns: u32,
    pub placements: u32,
    pub removals: u32,
    pub discards: u32,
}

impl GameResult {
    pub fn is_stalemate(&self) -> bool {
        self.winner.is_none()
    }
}

pub struct Simulator {
    seed: u64,
    max_turns: u32,
}

impl Simulator {
    pub fn new(seed: u64, max_turns: u32) -> Self {
        Self { seed, max_turns }
    }

    /// Play one game with `ais[i]` in seat `i` (2 to 4 seats).
    pub async fn simulate_game(
        &self,
        ais: &[(String, Box<dyn AiPlayer>)],
    ) -> Result<GameResult, Box<dyn Error>> {
        let store = Arc::new(InMemorySessionStore::new());
        let clock = Arc::new(ManualClock::new(SIM_EPOCH_MS));
        let service = GameFlowService::new(
            Arc::clone(&store) as Arc<dyn SessionStore>,
            clock.clone(),
            EngineConfig::default(),
        )?;

        let seat_ids: Vec<PlayerId> = (0..ais.len())
            .map(|i| PlayerId::from(format!("seat-{i}").as_str()))
            .collect();
        let record = lobby::new_session(
            NewSession {
                host_id: seat_ids[0].clone(),
                host_name: seat_ids[0].to_string(),
                max_players: u8::try_from(ais.len())?,
                is_private: false,
                password: None,
            },
            self.seed,
            clock.now_millis(),
        )?;
        let id = store.create(record).await?.value;
        for seat in &seat_ids[1..] {
            service
                .join_session(&id, seat, seat.as_str(), None)
                .await?;
        }
        service.start_session(&id).await?;

        let mut result = GameResult {
            seats: Vec::new(),
            winner: None,
            winning_sequence: Vec::new(),
            turns: 0,
            placements: 0,
            removals: 0,
            discards: 0,
        };

        while result.turns < self.max_turns {
            let snapshot = store.read(&id).await?.value;
            snapshot.check_invariants()?;
            if snapshot.status == SessionStatus::Finished {
                break;
            }
            let current = snapshot
                .current_turn
                .clone()
                .ok_or("playing session without a current turn")?;
            let seat = seat_ids
                .iter()
                .position(|s| *s == current)
                .ok_or_else(|| format!("{current} is not a simulated seat"))?;
            let player = snapshot.player(&current)?;
            let team = player.team.ok_or_else(|| format!("{current} has no team"))?;
            let (ai_name, ai) = &ais[seat];

            clock.advance(TURN_MS);
            let outcome = match ai.choose_move(&snapshot.board, &player.hand, team)? {
                Some(mv) => {
                    service
                        .attempt_move(
                            &id,
                            &current,
                            mv.card,
                            mv.position.row() as i32,
                            mv.position.col() as i32,
                        )
                        .await?
                }
                None => match player.hand.first() {
                    Some(&card) => service.discard_when_stuck(&id, &current, card).await?,
                    // Both piles are exhausted; nothing can change any more.
                    None => break,
                },
            };

            match outcome {
                MoveOutcome::Applied { applied, .. } => match applied.kind {
                    MoveKind::Place => result.placements += 1,
                    MoveKind::Remove => result.removals += 1,
                    MoveKind::Discard => result.discards += 1,
                },
                MoveOutcome::Rejected(rejection) => {
                    return Err(format!(
                        "{ai_name} in seat {seat} was refused: {} ({})",
                        rejection.code, rejection.detail
                    )
                    .into());
                }
            }
            result.turns += 1;
        }

        let last = store.read(&id).await?.value;
        last.check_invariants()?;
        result.winner = last.winner_team;
        result.winning_sequence = last.winning_sequence.clone();
        for (seat, (ai_name, _)) in seat_ids.iter().zip(ais) {
            let team = last
                .turn_slot(seat)
                .map(|slot| slot.team)
                .ok_or_else(|| format!("{seat} missing from turn order"))?;
            result.seats.push(SeatResult {
                player_id: seat.clone(),
                team,
                ai: ai_name.clone(),
            });
        }
        Ok(result)
    }
}
