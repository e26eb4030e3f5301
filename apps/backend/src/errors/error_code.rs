//! Error codes for the session engine.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that callers see in rejections and error payloads.

use core::fmt;

use serde::{Serialize, Serializer};

/// Centralized error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Move validation
    /// Acting player does not hold the turn
    NotYourTurn,
    /// Session already has a winner
    GameFinished,
    /// Session is still in the lobby
    GameNotStarted,
    /// Card cannot be used on the target cell
    IllegalMove,
    /// Card not in hand
    CardNotInHand,
    /// Stuck discard attempted while a legal move exists
    HasLegalMove,
    /// Target cell outside the board
    InvalidPosition,
    /// Card token could not be parsed
    ParseCard,

    // Lobby validation
    /// Start attempted with fewer than 2 or more than 4 players
    InvalidPlayerCount,
    /// Max players outside 2..=4
    InvalidMaxPlayers,
    /// Display name empty or too long
    InvalidName,
    /// Private session created without a password
    PasswordRequired,
    /// Session is full
    RoomFull,
    /// Password does not match
    WrongPassword,
    /// Session already started
    AlreadyStarted,
    /// General validation error
    ValidationError,

    // Resource Not Found
    /// Session not found
    SessionNotFound,
    /// Player not in the session roster
    PlayerNotFound,
    /// General not found error
    NotFound,

    // Conflicts
    /// Compare-and-swap lost against a concurrent writer
    OptimisticLock,
    /// Write retries exhausted
    RetriesExhausted,
    /// Could not allocate a free room code
    RoomCodeExhausted,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    /// Session store unavailable
    StoreUnavailable,
    /// Persisted record violates an invariant
    DataCorruption,
    /// Bot failed to decide
    AiFailure,
    /// Internal error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotYourTurn => "NOT_YOUR_TURN",
            Self::GameFinished => "GAME_FINISHED",
            Self::GameNotStarted => "GAME_NOT_STARTED",
            Self::IllegalMove => "ILLEGAL_MOVE",
            Self::CardNotInHand => "CARD_NOT_IN_HAND",
            Self::HasLegalMove => "HAS_LEGAL_MOVE",
            Self::InvalidPosition => "INVALID_POSITION",
            Self::ParseCard => "PARSE_CARD",

            Self::InvalidPlayerCount => "INVALID_PLAYER_COUNT",
            Self::InvalidMaxPlayers => "INVALID_MAX_PLAYERS",
            Self::InvalidName => "INVALID_NAME",
            Self::PasswordRequired => "PASSWORD_REQUIRED",
            Self::RoomFull => "ROOM_FULL",
            Self::WrongPassword => "WRONG_PASSWORD",
            Self::AlreadyStarted => "ALREADY_STARTED",
            Self::ValidationError => "VALIDATION_ERROR",

            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::RetriesExhausted => "RETRIES_EXHAUSTED",
            Self::RoomCodeExhausted => "ROOM_CODE_EXHAUSTED",
            Self::Conflict => "CONFLICT",

            Self::StoreUnavailable => "STORE_UNAVAILABLE",
            Self::DataCorruption => "DATA_CORRUPTION",
            Self::AiFailure => "AI_FAILURE",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
