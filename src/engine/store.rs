use std::collections::HashMap;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::RwLock;
use ulid::Ulid;

use crate::limits::{FLOORS, SEATS_PER_FLOOR};
use crate::model::*;

/// Reservations in insertion order, with an id index into the vector.
#[derive(Debug, Default)]
pub struct ReservationLog {
    entries: Vec<Reservation>,
    index: HashMap<Ulid, usize>,
}

impl ReservationLog {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, reservation: Reservation) {
        self.index.insert(reservation.id, self.entries.len());
        self.entries.push(reservation);
    }

    pub fn get(&self, id: &Ulid) -> Option<&Reservation> {
        self.index.get(id).map(|&pos| &self.entries[pos])
    }

    pub fn get_mut(&mut self, id: &Ulid) -> Option<&mut Reservation> {
        self.index.get(id).map(|&pos| &mut self.entries[pos])
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Reservation> {
        self.entries.iter()
    }

    pub fn active_for_user(&self, user_id: &Ulid) -> Option<&Reservation> {
        self.entries
            .iter()
            .find(|r| r.is_active() && r.user_id == *user_id)
    }

    pub fn active_for_seat(&self, seat_id: &str) -> Option<&Reservation> {
        self.entries
            .iter()
            .find(|r| r.is_active() && r.seat_id == seat_id)
    }

    pub fn is_occupied(&self, seat_id: &str) -> bool {
        self.active_for_seat(seat_id).is_some()
    }
}

pub struct InMemoryStore {
    seats: Vec<Seat>,
    seat_index: HashMap<SeatId, usize>,
    users_by_email: DashMap<String, User>,
    email_by_id: DashMap<Ulid, String>,
    pub(crate) reservations: RwLock<ReservationLog>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(Seat::layout(FLOORS, SEATS_PER_FLOOR))
    }
}

impl InMemoryStore {
    pub fn new(seats: Vec<Seat>) -> Self {
        let seat_index = seats
            .iter()
            .enumerate()
            .map(|(pos, s)| (s.id.clone(), pos))
            .collect();
        Self {
            seats,
            seat_index,
            users_by_email: DashMap::new(),
            email_by_id: DashMap::new(),
            reservations: RwLock::new(ReservationLog::default()),
        }
    }

    // ── Seats ────────────────────────────────────────────────

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn seat(&self, id: &str) -> Option<&Seat> {
        self.seat_index.get(id).map(|&pos| &self.seats[pos])
    }

    /// Distinct floor numbers, ascending.
    pub fn floors(&self) -> Vec<u32> {
        let mut floors: Vec<u32> = self.seats.iter().map(|s| s.floor).collect();
        floors.sort_unstable();
        floors.dedup();
        floors
    }

    // ── Users ────────────────────────────────────────────────

    pub fn user_count(&self) -> usize {
        self.users_by_email.len()
    }

    pub fn get_user(&self, id: &Ulid) -> Option<User> {
        // Never hold an id shard while locking the email map.
        let email = self.email_by_id.get(id)?.value().clone();
        self.users_by_email.get(&email).map(|u| u.value().clone())
    }

    pub fn contains_user(&self, id: &Ulid) -> bool {
        self.email_by_id.contains_key(id)
    }

    /// Returns the user for `email`, creating it on first sight.
    /// The flag is true when the user was just provisioned.
    pub fn find_or_provision_user(&self, email: &str) -> (User, bool) {
        match self.users_by_email.entry(email.to_string()) {
            Entry::Occupied(e) => (e.get().clone(), false),
            Entry::Vacant(e) => {
                let user = User::provision(email);
                self.email_by_id.insert(user.id, email.to_string());
                e.insert(user.clone());
                (user, true)
            }
        }
    }

    // ── Projections ──────────────────────────────────────────

    pub fn reservation_info(&self, reservation: &Reservation) -> Option<ReservationInfo> {
        self.seat(&reservation.seat_id)
            .map(|seat| ReservationInfo::new(reservation, seat))
    }
}
