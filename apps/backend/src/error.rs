use serde::Serialize;
use thiserror::Error;

use crate::errors::domain::{
    ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::errors::ErrorCode;
use crate::repos::sessions::StoreError;

/// Serializable error payload handed to callers (UI, simulator output).
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub title: String,
    pub detail: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation { code: ErrorCode, detail: String },
    #[error("Not found: {detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: ErrorCode, detail: String },
    #[error("Store unavailable: {detail}")]
    Unavailable { detail: String },
    #[error("Internal error: {detail}")]
    Internal { code: ErrorCode, detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. } => *code,
            AppError::NotFound { code, .. } => *code,
            AppError::Conflict { code, .. } => *code,
            AppError::Unavailable { .. } => ErrorCode::StoreUnavailable,
            AppError::Internal { code, .. } => *code,
            AppError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            AppError::Validation { detail, .. }
            | AppError::NotFound { detail, .. }
            | AppError::Conflict { detail, .. }
            | AppError::Unavailable { detail }
            | AppError::Internal { detail, .. }
            | AppError::Config { detail } => detail.clone(),
        }
    }

    pub fn invalid(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Validation {
            code,
            detail: detail.into(),
        }
    }

    pub fn not_found(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            detail: detail.into(),
        }
    }

    pub fn conflict(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            detail: detail.into(),
        }
    }

    pub fn internal(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Internal {
            code,
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation { .. })
    }

    pub fn payload(&self) -> ErrorPayload {
        let code = self.code().as_str();
        ErrorPayload {
            code: code.to_string(),
            title: Self::humanize_code(code),
            detail: self.detail(),
        }
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Error code for a validation kind; shared with move rejections.
pub fn validation_code(kind: &ValidationKind) -> ErrorCode {
    match kind {
        ValidationKind::NotYourTurn => ErrorCode::NotYourTurn,
        ValidationKind::GameFinished => ErrorCode::GameFinished,
        ValidationKind::GameNotStarted => ErrorCode::GameNotStarted,
        ValidationKind::IllegalMove => ErrorCode::IllegalMove,
        ValidationKind::CardNotInHand => ErrorCode::CardNotInHand,
        ValidationKind::HasLegalMove => ErrorCode::HasLegalMove,
        ValidationKind::InvalidPosition => ErrorCode::InvalidPosition,
        ValidationKind::ParseCard => ErrorCode::ParseCard,
        ValidationKind::InvalidPlayerCount => ErrorCode::InvalidPlayerCount,
        ValidationKind::InvalidMaxPlayers => ErrorCode::InvalidMaxPlayers,
        ValidationKind::InvalidName => ErrorCode::InvalidName,
        ValidationKind::PasswordRequired => ErrorCode::PasswordRequired,
        ValidationKind::RoomFull => ErrorCode::RoomFull,
        ValidationKind::WrongPassword => ErrorCode::WrongPassword,
        ValidationKind::AlreadyStarted => ErrorCode::AlreadyStarted,
        ValidationKind::PlayerNotFound => ErrorCode::PlayerNotFound,
        ValidationKind::Other(_) => ErrorCode::ValidationError,
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(kind, detail) => AppError::invalid(validation_code(&kind), detail),
            DomainError::Conflict(kind, detail) => {
                let code = match kind {
                    ConflictKind::OptimisticLock => ErrorCode::OptimisticLock,
                    ConflictKind::RetriesExhausted => ErrorCode::RetriesExhausted,
                    ConflictKind::RoomCodeExhausted => ErrorCode::RoomCodeExhausted,
                    ConflictKind::Other(_) => ErrorCode::Conflict,
                };
                AppError::conflict(code, detail)
            }
            DomainError::NotFound(kind, detail) => {
                let code = match kind {
                    NotFoundKind::Session => ErrorCode::SessionNotFound,
                    NotFoundKind::Player => ErrorCode::PlayerNotFound,
                    NotFoundKind::Other(_) => ErrorCode::NotFound,
                };
                AppError::not_found(code, detail)
            }
            DomainError::Infra(kind, detail) => match kind {
                InfraErrorKind::StoreUnavailable => AppError::Unavailable { detail },
                InfraErrorKind::DataCorruption => {
                    AppError::internal(ErrorCode::DataCorruption, detail)
                }
                InfraErrorKind::Other(_) => AppError::internal(ErrorCode::Internal, detail),
            },
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => {
                AppError::not_found(ErrorCode::SessionNotFound, format!("session {id} not found"))
            }
            e @ StoreError::VersionConflict { .. } => {
                AppError::conflict(ErrorCode::OptimisticLock, e.to_string())
            }
            e @ StoreError::CodeSpaceExhausted { .. } => {
                AppError::conflict(ErrorCode::RoomCodeExhausted, e.to_string())
            }
            StoreError::Unavailable(detail) => AppError::Unavailable { detail },
        }
    }
}

impl From<std::env::VarError> for AppError {
    fn from(e: std::env::VarError) -> Self {
        AppError::config(format!("env var error: {e}"))
    }
}
