//! AI player trait definition.

use std::fmt;

use crate::domain::{Board, CandidateMove, Card, Team};
use crate::error::AppError;
use crate::errors::ErrorCode;

/// Errors that can occur during AI decision-making.
#[derive(Debug)]
pub enum AiError {
    /// AI encountered an internal error
    Internal(String),
    /// AI produced an invalid move
    InvalidMove(String),
}

impl fmt::Display for AiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiError::Internal(msg) => write!(f, "AI internal error: {msg}"),
            AiError::InvalidMove(msg) => write!(f, "AI invalid move: {msg}"),
        }
    }
}

impl std::error::Error for AiError {}

impl From<AiError> for AppError {
    fn from(err: AiError) -> Self {
        AppError::internal(ErrorCode::AiFailure, format!("AI error: {err}"))
    }
}

/// Trait for AI players.
///
/// Implementations see only what the seated player sees: the board, their
/// own hand and their team. They must return a legal move or `None` when
/// the hand has nothing playable.
pub trait AiPlayer: Send + Sync {
    fn choose_move(
        &self,
        board: &Board,
        hand: &[Card],
        team: Team,
    ) -> Result<Option<CandidateMove>, AiError>;
}
