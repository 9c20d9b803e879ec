use std::cmp::Reverse;

use ulid::Ulid;

use crate::model::*;

use super::Engine;

impl Engine {
    /// Seats in layout order, optionally restricted to one floor, each with
    /// its status derived from the active reservations at the time of the call.
    pub async fn get_seats(&self, floor: Option<u32>) -> Vec<SeatInfo> {
        self.simulate_latency().await;

        let log = self.store.reservations.read().await;
        self.store
            .seats()
            .iter()
            .filter(|seat| floor.is_none_or(|f| seat.floor == f))
            .map(|seat| SeatInfo {
                id: seat.id.clone(),
                floor: seat.floor,
                label: seat.label.clone(),
                active: seat.active,
                status: if log.is_occupied(&seat.id) {
                    SeatStatus::Occupied
                } else {
                    SeatStatus::Available
                },
            })
            .collect()
    }

    pub async fn get_seat(&self, seat_id: &str) -> Option<SeatInfo> {
        self.get_seats(None)
            .await
            .into_iter()
            .find(|s| s.id == seat_id)
    }

    /// Occupancy counts per floor, ascending by floor.
    pub async fn floor_summaries(&self) -> Vec<FloorSummary> {
        let seats = self.get_seats(None).await;
        self.store
            .floors()
            .into_iter()
            .map(|floor| {
                let on_floor = seats.iter().filter(|s| s.floor == floor);
                let (total, occupied) = on_floor.fold((0, 0), |(t, o), s| {
                    (t + 1, o + usize::from(s.status == SeatStatus::Occupied))
                });
                FloorSummary {
                    floor,
                    total,
                    occupied,
                    available: total - occupied,
                }
            })
            .collect()
    }

    pub async fn get_active_reservation(&self, user_id: Ulid) -> Option<ReservationInfo> {
        self.simulate_latency().await;

        let log = self.store.reservations.read().await;
        log.active_for_user(&user_id)
            .and_then(|r| self.store.reservation_info(r))
    }

    /// Every reservation of the user, newest start first. Reservations that
    /// started in the same millisecond come out newest-inserted first.
    pub async fn get_history(&self, user_id: Ulid) -> Vec<ReservationInfo> {
        self.simulate_latency().await;

        let log = self.store.reservations.read().await;
        let mut history: Vec<ReservationInfo> = log
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .filter_map(|r| self.store.reservation_info(r))
            .collect();
        // Stable sort keeps the reversed insertion order among equal starts
        history.sort_by_key(|r| Reverse(r.start_at));
        history
    }

    pub async fn get_reservation(&self, id: Ulid) -> Option<ReservationInfo> {
        self.simulate_latency().await;

        let log = self.store.reservations.read().await;
        log.get(&id).and_then(|r| self.store.reservation_info(r))
    }
}
