use ulid::Ulid;

use crate::model::SeatId;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("user already has an active reservation")]
    UserHasActiveReservation(Ulid),
    #[error("seat already taken")]
    SeatTaken(SeatId),
    #[error("seat not found: {0}")]
    SeatNotFound(SeatId),
    #[error("user not found: {0}")]
    UserNotFound(Ulid),
    #[error("invalid email: {0:?}")]
    InvalidEmail(String),
    #[error("limit exceeded: {0}")]
    LimitExceeded(&'static str),
}

impl EngineError {
    /// Double-booking and double-active-reservation; callers show the message as-is.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            EngineError::UserHasActiveReservation(_) | EngineError::SeatTaken(_)
        )
    }

    /// Short machine-readable kind, used for metrics labels and HTTP error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::UserHasActiveReservation(_) => "user_has_active_reservation",
            EngineError::SeatTaken(_) => "seat_taken",
            EngineError::SeatNotFound(_) => "seat_not_found",
            EngineError::UserNotFound(_) => "user_not_found",
            EngineError::InvalidEmail(_) => "invalid_email",
            EngineError::LimitExceeded(_) => "limit_exceeded",
        }
    }
}
