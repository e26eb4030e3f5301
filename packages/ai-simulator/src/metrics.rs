//! Per-game metrics written by the simulator.

use backend::domain::{Position, Team};
use serde::Serialize;

use crate::simulator::GameResult;

/// Complete game metrics for output.
#[derive(Debug, Clone, Serialize)]
pub struct GameMetrics {
    pub game_id: u32,
    pub seed: u64,
    pub timestamp: String,
    pub seats: Vec<SeatMetrics>,
    pub result: GameResultMetrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeatMetrics {
    pub seat: usize,
    pub player_id: String,
    pub team: Team,
    pub ai_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameResultMetrics {
    pub winner: Option<Team>,
    pub stalemate: bool,
    pub turns: u32,
    pub placements: u32,
    pub removals: u32,
    pub discards: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub winning_sequence: Vec<Position>,
    pub duration_ms: f64,
}

/// One CSV line per game.
#[derive(Debug, Clone, Serialize)]
pub struct CsvSummaryRow {
    pub game_id: u32,
    pub seed: u64,
    pub players: usize,
    pub winner: String,
    pub turns: u32,
    pub removals: u32,
    pub discards: u32,
    pub ai_types: String,
}

impl From<&GameMetrics> for CsvSummaryRow {
    fn from(metrics: &GameMetrics) -> Self {
        CsvSummaryRow {
            game_id: metrics.game_id,
            seed: metrics.seed,
            players: metrics.seats.len(),
            winner: metrics
                .result
                .winner
                .map_or_else(|| "none".to_string(), |team| format!("{team:?}")),
            turns: metrics.result.turns,
            removals: metrics.result.removals,
            discards: metrics.result.discards,
            ai_types: metrics
                .seats
                .iter()
                .map(|s| s.ai_type.as_str())
                .collect::<Vec<_>>()
                .join("|"),
        }
    }
}

pub fn build_game_metrics(
    game_id: u32,
    seed: u64,
    result: &GameResult,
    duration_ms: f64,
) -> GameMetrics {
    let timestamp = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| String::from("unknown"));

    let seats = result
        .seats
        .iter()
        .enumerate()
        .map(|(seat, s)| SeatMetrics {
            seat,
            player_id: s.player_id.to_string(),
            team: s.team,
            ai_type: s.ai.clone(),
        })
        .collect();

    GameMetrics {
        game_id,
        seed,
        timestamp,
        seats,
        result: GameResultMetrics {
            winner: result.winner,
            stalemate: result.is_stalemate(),
            turns: result.turns,
            placements: result.placements,
            removals: result.removals,
            discards: result.discards,
            winning_sequence: result.winning_sequence.clone(),
            duration_ms,
        },
    }
}
