// Unit tests for error mapping - pure conversions without a store
use crate::errors::domain::{
    ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::repos::sessions::StoreError;
use crate::{AppError, ErrorCode, SessionId};

#[test]
fn maps_validation_kinds_to_codes() {
    let cases = [
        (ValidationKind::NotYourTurn, "NOT_YOUR_TURN"),
        (ValidationKind::IllegalMove, "ILLEGAL_MOVE"),
        (ValidationKind::RoomFull, "ROOM_FULL"),
        (ValidationKind::WrongPassword, "WRONG_PASSWORD"),
        (ValidationKind::AlreadyStarted, "ALREADY_STARTED"),
        (ValidationKind::Other("X".into()), "VALIDATION_ERROR"),
    ];
    for (kind, code) in cases {
        let app: AppError = DomainError::validation(kind, "bad").into();
        assert!(app.is_validation());
        assert_eq!(app.code().as_str(), code);
    }
}

#[test]
fn maps_conflicts() {
    let app: AppError = DomainError::conflict(ConflictKind::RetriesExhausted, "gave up").into();
    assert_eq!(app.code(), ErrorCode::RetriesExhausted);

    let other: AppError =
        DomainError::conflict(ConflictKind::Other("x".into()), "generic conflict").into();
    assert_eq!(other.code().as_str(), "CONFLICT");
}

#[test]
fn maps_not_found() {
    let app: AppError = DomainError::not_found(NotFoundKind::Session, "gone").into();
    assert_eq!(app.code(), ErrorCode::SessionNotFound);
    assert!(matches!(app, AppError::NotFound { .. }));
}

#[test]
fn maps_infra() {
    let corrupt: AppError = DomainError::corruption("104 != 103").into();
    assert_eq!(corrupt.code().as_str(), "DATA_CORRUPTION");
    assert!(matches!(corrupt, AppError::Internal { .. }));

    let down: AppError =
        DomainError::infra(InfraErrorKind::StoreUnavailable, "store offline").into();
    assert_eq!(down.code(), ErrorCode::StoreUnavailable);
}

#[test]
fn maps_store_errors() {
    let nf: AppError = StoreError::NotFound(SessionId::from("ABC123")).into();
    assert_eq!(nf.code(), ErrorCode::SessionNotFound);
    assert!(nf.detail().contains("ABC123"));

    let conflict: AppError = StoreError::VersionConflict {
        expected: 3,
        actual: 4,
    }
    .into();
    assert_eq!(conflict.code(), ErrorCode::OptimisticLock);
}

#[test]
fn payload_humanizes_code() {
    let app = AppError::invalid(ErrorCode::NotYourTurn, "wait");
    let payload = app.payload();
    assert_eq!(payload.code, "NOT_YOUR_TURN");
    assert_eq!(payload.title, "Not Your Turn");
    assert_eq!(payload.detail, "wait");
}
