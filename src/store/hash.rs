//! Sparse hash-indexed store.
//!
//! Entries live in an ordered index keyed by a scrambled form of the user
//! key, so enumeration walks the store in bucket-like order rather than
//! numeric key order — the same property callers see when walking a kernel
//! hash map with the get-next-key protocol.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Mutex;

use super::{MapKind, MapStore, StoreError};

/// Bijective key scramble (odd-constant multiply on u32). Determines the
/// enumeration order; deliberately unrelated to numeric key order.
fn slot(key: u32) -> u32 {
    key.wrapping_mul(0x9E37_79B1)
}

/// Sparse key-value store with true deletion.
///
/// Single-key operations lock the index for their duration only, so a
/// concurrent producer can interleave writes between any two operations of
/// a sweep.
pub struct HashMapStore {
    capacity: u32,
    // slot(key) -> (key, value)
    index: Mutex<BTreeMap<u32, (u32, u64)>>,
}

impl HashMapStore {
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            index: Mutex::new(BTreeMap::new()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<u32, (u32, u64)>> {
        // A poisoned index means a panic mid-operation; nothing to salvage.
        self.index.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl MapStore for HashMapStore {
    fn kind(&self) -> MapKind {
        MapKind::Hash
    }

    fn capacity(&self) -> u32 {
        self.capacity
    }

    fn len(&self) -> u32 {
        self.lock().len() as u32
    }

    fn lookup(&self, key: u32) -> Result<u64, StoreError> {
        self.lock()
            .get(&slot(key))
            .map(|&(_, value)| value)
            .ok_or(StoreError::NotFound { key })
    }

    fn insert(&self, key: u32, value: u64) -> Result<(), StoreError> {
        let mut index = self.lock();
        let entry = slot(key);
        if !index.contains_key(&entry) && index.len() as u32 >= self.capacity {
            return Err(StoreError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        index.insert(entry, (key, value));
        Ok(())
    }

    fn delete(&self, key: u32) -> Result<(), StoreError> {
        self.lock()
            .remove(&slot(key))
            .map(|_| ())
            .ok_or(StoreError::NotFound { key })
    }

    fn first_key(&self) -> Option<u32> {
        self.lock().values().next().map(|&(key, _)| key)
    }

    fn next_key(&self, prev: u32) -> Option<u32> {
        // Successor in slot order. Still well-defined when `prev` itself was
        // deleted since the last call: the scan resumes past its slot.
        self.lock()
            .range((Bound::Excluded(slot(prev)), Bound::Unbounded))
            .next()
            .map(|(_, &(key, _))| key)
    }
}
