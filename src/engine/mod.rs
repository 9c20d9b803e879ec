mod conflict;
mod error;
mod mutations;
mod queries;
mod store;
#[cfg(test)]
mod tests;

pub use error::EngineError;
pub use store::{InMemoryStore, ReservationLog};

pub(crate) use conflict::{now_ms, validate_email};

use std::time::Duration;

/// Owns the seat map, users and reservation log.
///
/// Every operation first awaits the configured latency, which emulates the
/// round trip of the mock backend the front end was written against. Tests
/// construct engines with zero latency.
pub struct Engine {
    pub(crate) store: InMemoryStore,
    latency: Duration,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Default seat layout, no simulated latency.
    pub fn new() -> Self {
        Self::with_store(InMemoryStore::default())
    }

    pub fn with_store(store: InMemoryStore) -> Self {
        Self {
            store,
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub fn store(&self) -> &InMemoryStore {
        &self.store
    }

    pub(crate) async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}
