use std::time::Duration;

use crate::model::Ms;

/// Number of floors in the seat map.
pub const FLOORS: u32 = 3;

/// Seats generated on each floor.
pub const SEATS_PER_FLOOR: u32 = 20;

/// Length of a reservation, recorded as `end_at` at creation. Not enforced.
pub const RESERVATION_DURATION_MS: Ms = 4 * 3_600_000;

/// Period of the seat map refresh.
pub const SEAT_REFRESH_INTERVAL: Duration = Duration::from_secs(10);

pub const MAX_EMAIL_LEN: usize = 254;

pub const MAX_MESSAGE_LEN: usize = 4_000;

/// Older turns beyond this are dropped before calling the model.
pub const MAX_HISTORY_TURNS: usize = 50;
