//! Timed benchmark passes ("sweeps") over a store handle.
//!
//! A sweep applies one operation across the store's whole key domain and
//! reports the elapsed monotonic time around the loop. Key selection
//! depends on the variant:
//!
//! - **Array**: iterate indices `[0, capacity)` directly; the key domain is
//!   dense and known up front.
//! - **Hash**: lookup and delete sweeps walk the live key set through a
//!   fresh [`KeyCursor`]; the insert sweep draws keys from a seeded PRNG so
//!   runs are reproducible.
//!
//! Sweeps are all-or-nothing: the first failed operation aborts the pass.
//! The one exception is `NotFound` on a cursor-yielded key, which is a
//! benign race against the live producer and is skipped.

use crate::clock::{MonotonicClock, Timespec};
use crate::cursor::KeyCursor;
use crate::store::{MapKind, MapStore, StoreError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fixed seed for the hash insert sweep's key stream.
const INSERT_SWEEP_SEED: u64 = 0xC0FF_EE00_B00F_5EED;

/// The operation a sweep applies across the key domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepKind {
    Lookup,
    Insert,
    /// True deletion on the hash variant; a zero-sentinel overwrite on the
    /// array variant.
    DeleteOrReset,
}

impl std::fmt::Display for SweepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SweepKind::Lookup => write!(f, "lookup"),
            SweepKind::Insert => write!(f, "insert"),
            SweepKind::DeleteOrReset => write!(f, "delete"),
        }
    }
}

/// Deterministic value for a swept key, `2 * key`.
fn value_for(key: u32) -> u64 {
    u64::from(key) * 2
}

/// Run one timed pass of `kind` against `store`. Returns the elapsed time
/// around the operation loop, or the first non-benign operation failure.
pub fn run_sweep(
    store: &dyn MapStore,
    kind: SweepKind,
    clock: &MonotonicClock,
) -> Result<Timespec, StoreError> {
    let start = clock.now();
    match (store.kind(), kind) {
        (MapKind::Array, SweepKind::Lookup) => {
            for key in 0..store.capacity() {
                store.lookup(key)?;
            }
        }
        (MapKind::Array, SweepKind::Insert) => {
            for key in 0..store.capacity() {
                store.insert(key, value_for(key))?;
            }
        }
        (MapKind::Array, SweepKind::DeleteOrReset) => {
            for key in 0..store.capacity() {
                store.delete(key)?;
            }
        }
        (MapKind::Hash, SweepKind::Lookup) => {
            for key in KeyCursor::new(store) {
                match store.lookup(key) {
                    Ok(_) => {}
                    // Deleted between the successor call and the lookup.
                    Err(StoreError::NotFound { .. }) => {}
                    Err(e) => return Err(e),
                }
            }
        }
        (MapKind::Hash, SweepKind::Insert) => {
            let mut rng = StdRng::seed_from_u64(INSERT_SWEEP_SEED);
            let capacity = store.capacity();
            for _ in 0..capacity {
                let key = rng.gen_range(0..capacity);
                store.insert(key, value_for(key))?;
            }
        }
        (MapKind::Hash, SweepKind::DeleteOrReset) => {
            for key in KeyCursor::new(store) {
                match store.delete(key) {
                    Ok(_) => {}
                    // Already gone; the producer beat us to it.
                    Err(StoreError::NotFound { .. }) => {}
                    Err(e) => return Err(e),
                }
            }
        }
    }
    let end = clock.now();
    Ok(end - start)
}
