//! Dense array-indexed store.
//!
//! Every index in `[0, capacity)` is always present; there is no notion of
//! absence, so deletion is modeled as overwriting the index with the zero
//! sentinel. Values are plain atomics, so single-key operations are
//! lock-free and safe against the concurrent producer.

use std::sync::atomic::{AtomicU64, Ordering};

use super::{MapKind, MapStore, StoreError};

/// Value written by [`MapStore::delete`]; the array variant cannot remove
/// an entry, only blank it.
pub const SENTINEL: u64 = 0;

pub struct ArrayMapStore {
    values: Box<[AtomicU64]>,
}

impl ArrayMapStore {
    pub fn new(capacity: u32) -> Self {
        let mut values = Vec::with_capacity(capacity as usize);
        values.resize_with(capacity as usize, AtomicU64::default);
        Self {
            values: values.into_boxed_slice(),
        }
    }
}

impl MapStore for ArrayMapStore {
    fn kind(&self) -> MapKind {
        MapKind::Array
    }

    fn capacity(&self) -> u32 {
        self.values.len() as u32
    }

    fn len(&self) -> u32 {
        // Dense: every index is live.
        self.capacity()
    }

    fn lookup(&self, key: u32) -> Result<u64, StoreError> {
        self.values
            .get(key as usize)
            .map(|v| v.load(Ordering::Relaxed))
            .ok_or(StoreError::NotFound { key })
    }

    fn insert(&self, key: u32, value: u64) -> Result<(), StoreError> {
        match self.values.get(key as usize) {
            Some(v) => {
                v.store(value, Ordering::Relaxed);
                Ok(())
            }
            None => Err(StoreError::OutOfRange {
                key,
                capacity: self.capacity(),
            }),
        }
    }

    fn delete(&self, key: u32) -> Result<(), StoreError> {
        // Reset: every valid index is always present, so this only fails
        // for an out-of-range index.
        self.insert(key, SENTINEL)
    }

    fn first_key(&self) -> Option<u32> {
        if self.values.is_empty() {
            None
        } else {
            Some(0)
        }
    }

    fn next_key(&self, prev: u32) -> Option<u32> {
        let next = prev.checked_add(1)?;
        if next < self.capacity() {
            Some(next)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_store_reads_sentinel_everywhere() {
        let store = ArrayMapStore::new(4);
        for idx in 0..4 {
            assert_eq!(store.lookup(idx), Ok(SENTINEL));
        }
    }

    #[test]
    fn insert_at_capacity_index_is_out_of_range() {
        let store = ArrayMapStore::new(16);
        assert_eq!(
            store.insert(16, 1),
            Err(StoreError::OutOfRange {
                key: 16,
                capacity: 16
            })
        );
    }

    #[test]
    fn lookup_past_capacity_is_not_found() {
        let store = ArrayMapStore::new(16);
        assert_eq!(store.lookup(16), Err(StoreError::NotFound { key: 16 }));
    }

    #[test]
    fn delete_overwrites_with_sentinel() {
        let store = ArrayMapStore::new(4);
        store.insert(2, 77).unwrap();
        store.delete(2).unwrap();
        assert_eq!(store.lookup(2), Ok(SENTINEL));
        // Reset of an already-reset index succeeds again.
        store.delete(2).unwrap();
        assert_eq!(store.lookup(2), Ok(SENTINEL));
    }

    #[test]
    fn enumeration_walks_the_full_index_range() {
        let store = ArrayMapStore::new(3);
        assert_eq!(store.first_key(), Some(0));
        assert_eq!(store.next_key(0), Some(1));
        assert_eq!(store.next_key(1), Some(2));
        assert_eq!(store.next_key(2), None);
    }

    #[test]
    fn empty_array_has_no_first_key() {
        let store = ArrayMapStore::new(0);
        assert_eq!(store.first_key(), None);
    }
}
