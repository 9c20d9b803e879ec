use ulid::Ulid;

use crate::limits::MAX_EMAIL_LEN;
use crate::model::*;

use super::store::ReservationLog;
use super::EngineError;

pub(crate) fn now_ms() -> Ms {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as Ms)
        .unwrap_or_default()
}

/// Trims and validates a login email. Any non-empty address is accepted.
pub(crate) fn validate_email(email: &str) -> Result<&str, EngineError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(EngineError::InvalidEmail(email.to_string()));
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err(EngineError::LimitExceeded("email too long"));
    }
    Ok(email)
}

/// The user check runs first and short-circuits the seat check.
pub(crate) fn check_no_conflict(
    log: &ReservationLog,
    user_id: &Ulid,
    seat_id: &str,
) -> Result<(), EngineError> {
    if log.active_for_user(user_id).is_some() {
        return Err(EngineError::UserHasActiveReservation(*user_id));
    }
    if log.active_for_seat(seat_id).is_some() {
        return Err(EngineError::SeatTaken(seat_id.to_string()));
    }
    Ok(())
}
