use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unix milliseconds.
pub type Ms = i64;

/// Seat identifiers are stable strings of the form `seat-{floor}-{nn}`.
pub type SeatId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Ulid,
    pub email: String,
    pub name: String,
}

impl User {
    /// Display name is the local part of the email (everything before the first `@`).
    pub fn provision(email: &str) -> Self {
        let name = email.split('@').next().unwrap_or(email).to_string();
        Self {
            id: Ulid::new(),
            email: email.to_string(),
            name,
        }
    }
}

/// A physical seat. The set is generated once and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub id: SeatId,
    pub floor: u32,
    pub label: String,
    pub active: bool,
}

impl Seat {
    pub fn new(floor: u32, number: u32) -> Self {
        Self {
            id: format!("seat-{floor}-{number:02}"),
            floor,
            label: format!("{floor}F-{number:02}"),
            active: true,
        }
    }

    /// Floors and seat numbers both start at 1.
    pub fn layout(floors: u32, seats_per_floor: u32) -> Vec<Seat> {
        (1..=floors)
            .flat_map(|floor| (1..=seats_per_floor).map(move |n| Seat::new(floor, n)))
            .collect()
    }
}

/// Derived per query, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatStatus {
    Available,
    Occupied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Active,
    Canceled,
    /// Defined for clients; nothing transitions a reservation here.
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub id: Ulid,
    pub seat_id: SeatId,
    pub user_id: Ulid,
    pub status: ReservationStatus,
    pub start_at: Ms,
    pub end_at: Option<Ms>,
    pub canceled_at: Option<Ms>,
}

impl Reservation {
    pub fn is_active(&self) -> bool {
        self.status == ReservationStatus::Active
    }

    /// Returns false if the reservation was not active, in which case nothing changes.
    pub fn cancel(&mut self, now: Ms) -> bool {
        if !self.is_active() {
            return false;
        }
        self.status = ReservationStatus::Canceled;
        self.canceled_at = Some(now);
        true
    }
}

// ── Query result types ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatInfo {
    pub id: SeatId,
    pub floor: u32,
    pub label: String,
    pub active: bool,
    pub status: SeatStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationInfo {
    pub id: Ulid,
    pub seat_id: SeatId,
    pub floor: u32,
    pub seat_label: String,
    pub user_id: Ulid,
    pub status: ReservationStatus,
    pub start_at: Ms,
    pub end_at: Option<Ms>,
    pub canceled_at: Option<Ms>,
}

impl ReservationInfo {
    pub fn new(reservation: &Reservation, seat: &Seat) -> Self {
        Self {
            id: reservation.id,
            seat_id: reservation.seat_id.clone(),
            floor: seat.floor,
            seat_label: seat.label.clone(),
            user_id: reservation.user_id,
            status: reservation.status,
            start_at: reservation.start_at,
            end_at: reservation.end_at,
            canceled_at: reservation.canceled_at,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ReservationStatus::Active
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorSummary {
    pub floor: u32,
    pub total: usize,
    pub occupied: usize,
    pub available: usize,
}
