use tracing::{debug, info};
use ulid::Ulid;

use crate::limits::RESERVATION_DURATION_MS;
use crate::model::*;
use crate::observability;

use super::conflict::{check_no_conflict, now_ms};
use super::{Engine, EngineError};

impl Engine {
    /// Reserve `seat_id` for `user_id`, starting now and ending four hours later.
    ///
    /// Unknown seats and users are rejected before the conflict checks. The
    /// check and the insert happen under one write lock, so a failed create
    /// never leaves anything behind.
    pub async fn create_reservation(
        &self,
        user_id: Ulid,
        seat_id: &str,
    ) -> Result<ReservationInfo, EngineError> {
        self.simulate_latency().await;

        let seat = self
            .store
            .seat(seat_id)
            .ok_or_else(|| EngineError::SeatNotFound(seat_id.to_string()))?;
        if !self.store.contains_user(&user_id) {
            return Err(EngineError::UserNotFound(user_id));
        }

        let mut log = self.store.reservations.write().await;
        if let Err(e) = check_no_conflict(&log, &user_id, seat_id) {
            metrics::counter!(observability::RESERVATION_CONFLICTS_TOTAL, "reason" => e.kind())
                .increment(1);
            return Err(e);
        }

        let now = now_ms();
        let reservation = Reservation {
            id: Ulid::new(),
            seat_id: seat.id.clone(),
            user_id,
            status: ReservationStatus::Active,
            start_at: now,
            end_at: Some(now + RESERVATION_DURATION_MS),
            canceled_at: None,
        };
        let info = ReservationInfo::new(&reservation, seat);
        log.push(reservation);

        metrics::counter!(observability::RESERVATIONS_CREATED_TOTAL).increment(1);
        info!(reservation = %info.id, user = %user_id, seat = seat_id, "reservation created");
        Ok(info)
    }

    /// Cancel a reservation. Unknown ids and reservations that are no longer
    /// active are left alone without an error; the return value says whether
    /// anything changed.
    pub async fn cancel_reservation(&self, id: Ulid) -> bool {
        self.simulate_latency().await;

        let mut log = self.store.reservations.write().await;
        let Some(reservation) = log.get_mut(&id) else {
            debug!(reservation = %id, "cancel of unknown reservation ignored");
            return false;
        };
        if !reservation.cancel(now_ms()) {
            debug!(
                reservation = %id,
                status = ?reservation.status,
                "cancel of inactive reservation ignored"
            );
            return false;
        }

        metrics::counter!(observability::RESERVATIONS_CANCELED_TOTAL).increment(1);
        info!(reservation = %id, seat = %reservation.seat_id, "reservation canceled");
        true
    }
}
