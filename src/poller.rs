use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::engine::{now_ms, Engine};
use crate::limits::SEAT_REFRESH_INTERVAL;
use crate::model::{Ms, SeatInfo};

/// Which floor the owning view shows. `generation` increases on every switch.
#[derive(Debug, Clone, Copy)]
struct Selection {
    generation: u64,
    floor: Option<u32>,
}

/// One refresh result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatSnapshot {
    pub generation: u64,
    pub floor: Option<u32>,
    pub seats: Vec<SeatInfo>,
    pub fetched_at: Ms,
}

/// Periodic seat map refresh owned by a view.
///
/// The background task stops when the handle is dropped or [`SeatPoller::stop`]
/// is called; after that the snapshot channel closes. A floor switch triggers
/// an immediate refresh, and a fetch still in flight for the previous floor is
/// discarded instead of published.
pub struct SeatPoller {
    selection: watch::Sender<Selection>,
    snapshots: watch::Receiver<Option<SeatSnapshot>>,
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl SeatPoller {
    pub fn spawn(engine: Arc<Engine>, floor: Option<u32>) -> Self {
        Self::spawn_with_period(engine, floor, SEAT_REFRESH_INTERVAL)
    }

    pub fn spawn_with_period(engine: Arc<Engine>, floor: Option<u32>, period: Duration) -> Self {
        let (selection, selection_rx) = watch::channel(Selection {
            generation: 0,
            floor,
        });
        let (snapshot_tx, snapshots) = watch::channel(None);
        let token = CancellationToken::new();
        let handle = tokio::spawn(run_poller(
            engine,
            period,
            selection_rx,
            snapshot_tx,
            token.clone(),
        ));
        Self {
            selection,
            snapshots,
            token,
            handle: Some(handle),
        }
    }

    /// Switch floors. Returns the generation future snapshots will carry.
    pub fn set_floor(&self, floor: Option<u32>) -> u64 {
        let mut generation = 0;
        self.selection.send_modify(|s| {
            s.generation += 1;
            s.floor = floor;
            generation = s.generation;
        });
        generation
    }

    pub fn floor(&self) -> Option<u32> {
        self.selection.borrow().floor
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<SeatSnapshot>> {
        self.snapshots.clone()
    }

    pub fn latest(&self) -> Option<SeatSnapshot> {
        self.snapshots.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancel and wait for the task to exit.
    pub async fn stop(mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for SeatPoller {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn run_poller(
    engine: Arc<Engine>,
    period: Duration,
    mut selection: watch::Receiver<Selection>,
    snapshots: watch::Sender<Option<SeatSnapshot>>,
    token: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = interval.tick() => {}
            changed = selection.changed() => {
                if changed.is_err() {
                    break;
                }
                interval.reset();
            }
        }

        let current = *selection.borrow_and_update();
        let seats = tokio::select! {
            _ = token.cancelled() => break,
            seats = engine.get_seats(current.floor) => seats,
        };

        if selection.borrow().generation != current.generation {
            debug!(generation = current.generation, "discarding stale seat snapshot");
            continue;
        }
        debug!(floor = ?current.floor, seats = seats.len(), "seat map refreshed");
        snapshots.send_replace(Some(SeatSnapshot {
            generation: current.generation,
            floor: current.floor,
            seats,
            fetched_at: now_ms(),
        }));
    }
    debug!("seat poller stopped");
}
