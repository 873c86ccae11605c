//! Generation guard: at most one generation per cell.
//!
//! The in-flight set and the ledger are consulted while the set's lock is
//! held, so two concurrent callers can never both be told to generate the
//! same cell. Lock order is always in-flight set first, then the store.

use crate::store::DebateStore;
use debate_domain::CellKey;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Result of asking the guard whether a cell may be generated
#[derive(Debug)]
pub enum GuardDecision {
    /// The caller owns the cell until the permit is dropped
    Acquired(GenerationPermit),
    /// The ledger already holds a complete statement for the cell
    AlreadySpoken,
    /// Another caller is generating the cell right now
    InFlight,
}

impl GuardDecision {
    pub fn is_acquired(&self) -> bool {
        matches!(self, GuardDecision::Acquired(_))
    }
}

type InFlightSet = Arc<Mutex<HashSet<CellKey>>>;

fn lock_set(set: &InFlightSet) -> MutexGuard<'_, HashSet<CellKey>> {
    set.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Deduplicates generation requests per (expert, round) cell
#[derive(Debug, Clone)]
pub struct GenerationGuard {
    store: DebateStore,
    in_flight: InFlightSet,
}

impl GenerationGuard {
    pub fn new(store: DebateStore) -> Self {
        Self {
            store,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Check the cell and mark it in flight if it may be generated.
    ///
    /// A failed or orphaned streaming statement does not block a retry.
    pub fn try_acquire(&self, key: &CellKey) -> GuardDecision {
        let mut in_flight = lock_set(&self.in_flight);
        if in_flight.contains(key) {
            return GuardDecision::InFlight;
        }
        if self.store.is_filled(key) {
            return GuardDecision::AlreadySpoken;
        }
        in_flight.insert(key.clone());
        GuardDecision::Acquired(GenerationPermit {
            key: key.clone(),
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    pub fn is_in_flight(&self, key: &CellKey) -> bool {
        lock_set(&self.in_flight).contains(key)
    }

    pub fn in_flight_count(&self) -> usize {
        lock_set(&self.in_flight).len()
    }
}

/// Ownership of one cell's generation. Dropping it releases the cell on
/// every exit path, including errors and cancellation.
#[derive(Debug)]
pub struct GenerationPermit {
    key: CellKey,
    in_flight: InFlightSet,
}

impl GenerationPermit {
    pub fn key(&self) -> &CellKey {
        &self.key
    }
}

impl Drop for GenerationPermit {
    fn drop(&mut self) {
        lock_set(&self.in_flight).remove(&self.key);
    }
}
