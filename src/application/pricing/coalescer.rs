//! In-flight request table.
//!
//! Concurrent lookups for the same key share one [`Flight`]. The table only
//! holds weak handles, so when every waiter drops its handle the flight
//! future is dropped too and its source calls are cancelled with it.

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt, Shared, WeakShared};
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::core::domain::{CardKey, PricePair};

/// Shared completion handle for one outstanding lookup.
pub type Flight = Shared<BoxFuture<'static, PricePair>>;

struct Pending {
    id: u64,
    flight: WeakShared<BoxFuture<'static, PricePair>>,
    started_at: Instant,
}

#[derive(Default)]
struct Table {
    pending: HashMap<CardKey, Pending>,
    next_id: u64,
}

/// Outcome of [`Coalescer::join_or_start`].
pub struct Joined {
    pub flight: Flight,
    /// True when this call started the flight.
    pub leader: bool,
}

/// `CardKey` to in-flight lookup mapping. At most one flight per key.
#[derive(Clone, Default)]
pub struct Coalescer {
    table: Arc<Mutex<Table>>,
}

impl Coalescer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach to the pending flight for `key`, or start one with `start`.
    ///
    /// `start` receives the [`FlightGuard`] for the new flight and must move
    /// it into the returned future; dropping the guard clears the slot.
    pub fn join_or_start<F>(&self, key: &CardKey, start: F) -> Joined
    where
        F: FnOnce(FlightGuard) -> BoxFuture<'static, PricePair>,
    {
        let mut table = self.table.lock();

        if let Some(pending) = table.pending.get(key) {
            if let Some(flight) = pending.flight.upgrade() {
                debug!(
                    key = %key,
                    running_ms = pending.started_at.elapsed().as_millis() as u64,
                    "Joining in-flight lookup"
                );
                return Joined {
                    flight,
                    leader: false,
                };
            }
        }

        table.next_id += 1;
        let id = table.next_id;
        let guard = FlightGuard {
            table: Arc::clone(&self.table),
            key: key.clone(),
            id,
        };
        let flight = start(guard).shared();

        // A flight that has never been polled cannot have completed, so the
        // downgrade always succeeds here.
        if let Some(weak) = flight.downgrade() {
            table.pending.insert(
                key.clone(),
                Pending {
                    id,
                    flight: weak,
                    started_at: Instant::now(),
                },
            );
        }

        Joined {
            flight,
            leader: true,
        }
    }

    /// Detach the flight for `key`: it keeps serving its waiters but will not
    /// commit, and the next lookup starts a fresh flight.
    pub fn detach(&self, key: &CardKey) {
        self.table.lock().pending.remove(key);
    }

    /// Detach every flight.
    pub fn detach_all(&self) {
        self.table.lock().pending.clear();
    }

    /// Number of registered flights.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.lock().pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ownership of one registered flight slot.
///
/// Dropping the guard (on completion or cancellation) removes the slot if
/// it still belongs to this flight.
pub struct FlightGuard {
    table: Arc<Mutex<Table>>,
    key: CardKey,
    id: u64,
}

impl FlightGuard {
    /// Run `commit` only if this flight is still registered for its key.
    ///
    /// The table lock is held while `commit` runs, so a concurrent
    /// [`Coalescer::detach`] either happens before (and `commit` is skipped)
    /// or after (and sees the committed state).
    pub fn commit_if_current(&self, commit: impl FnOnce()) -> bool {
        let table = self.table.lock();
        let current = table
            .pending
            .get(&self.key)
            .is_some_and(|p| p.id == self.id);
        if current {
            commit();
        }
        current
    }

    #[must_use]
    pub fn key(&self) -> &CardKey {
        &self.key
    }
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        let mut table = self.table.lock();
        if table.pending.get(&self.key).is_some_and(|p| p.id == self.id) {
            table.pending.remove(&self.key);
        }
    }
}
