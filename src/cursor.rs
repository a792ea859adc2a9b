//! Cursor enumeration over a store's live key set.
//!
//! Wraps the backend's get-successor protocol (`first_key` / `next_key`) in
//! a one-shot `Iterator`. Construct a fresh cursor per sweep rather than
//! reusing one across sweeps.

use crate::store::MapStore;

/// Lazy, finite, non-restartable walk over all keys enumerable from a store
/// at the moment of each successor call.
///
/// Offers no snapshot isolation: a concurrent producer may delete a key
/// between successor calls, which can legitimately skip keys or end the
/// walk early. That is a tolerated race, not a failure — and a key this
/// cursor yields may already be gone by the time the caller touches it.
pub struct KeyCursor<'a> {
    store: &'a dyn MapStore,
    last: Option<u32>,
    started: bool,
}

impl<'a> KeyCursor<'a> {
    pub fn new(store: &'a dyn MapStore) -> Self {
        Self {
            store,
            last: None,
            started: false,
        }
    }
}

impl Iterator for KeyCursor<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let key = if self.started {
            // Exhausted stays exhausted.
            self.store.next_key(self.last?)
        } else {
            self.started = true;
            self.store.first_key()
        };
        self.last = key;
        key
    }
}
