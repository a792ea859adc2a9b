//! Store handles and the common `MapStore` trait.
//!
//! Two implementations are provided, modeling the two kernel map types
//! under comparison:
//! - [`hash::HashMapStore`] — sparse keys, true deletion
//! - [`array::ArrayMapStore`] — dense indices, deletion as a zero overwrite

pub mod array;
pub mod hash;

use std::error::Error;
use std::fmt;

/// Default entry limit for both store variants, matching the kernel maps
/// under test (1024 * 1024).
pub const DEFAULT_CAPACITY: u32 = 1_048_576;

/// Which store variant a handle wraps. Used by the sweeps to pick the
/// matching key-selection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapKind {
    Hash,
    Array,
}

impl fmt::Display for MapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapKind::Hash => write!(f, "hash"),
            MapKind::Array => write!(f, "array"),
        }
    }
}

/// Errors surfaced by store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Key absent (hash) or index out of range on lookup (array). May be a
    /// benign race when enumeration runs against a live producer.
    NotFound { key: u32 },
    /// Array index at or past capacity on insert/reset. Caller bug.
    OutOfRange { key: u32, capacity: u32 },
    /// Insert would exceed the fixed entry limit.
    CapacityExceeded { capacity: u32 },
    /// The backend handle was unusable at startup.
    HandleInvalid,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound { key } => write!(f, "key {key} not found"),
            StoreError::OutOfRange { key, capacity } => {
                write!(f, "index {key} out of range (capacity {capacity})")
            }
            StoreError::CapacityExceeded { capacity } => {
                write!(f, "insert would exceed capacity {capacity}")
            }
            StoreError::HandleInvalid => write!(f, "map handle invalid"),
        }
    }
}

impl Error for StoreError {}

/// A bounded key-value store handle: 32-bit keys, 64-bit values, at most
/// `capacity()` live entries. Capacity is fixed at construction and never
/// grown; an insert that would exceed it fails.
///
/// Every operation is an atomic single-key access provided by the backend,
/// so handles may be shared with a concurrent producer thread. No multi-key
/// consistency is claimed across operations.
pub trait MapStore: Send + Sync {
    /// Which variant this handle wraps.
    fn kind(&self) -> MapKind;

    /// Fixed entry limit.
    fn capacity(&self) -> u32;

    /// Number of live entries. For the array variant every index is always
    /// live, so this equals the capacity.
    fn len(&self) -> u32;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read the value for `key`. Fails with [`StoreError::NotFound`] for an
    /// absent hash key or an out-of-range array index; an in-range array
    /// lookup always succeeds.
    fn lookup(&self, key: u32) -> Result<u64, StoreError>;

    /// Write `value` under `key`. The array variant requires `key` to be a
    /// valid index and reports [`StoreError::OutOfRange`] otherwise; the
    /// hash variant reports [`StoreError::CapacityExceeded`] when a new key
    /// would push the store past its entry limit.
    fn insert(&self, key: u32, value: u64) -> Result<(), StoreError>;

    /// Remove `key`. The hash variant truly removes the entry; the array
    /// variant overwrites the index with the zero sentinel instead (it has
    /// no notion of absence, so this cannot fail for a valid index).
    fn delete(&self, key: u32) -> Result<(), StoreError>;

    /// First key in backend-defined enumeration order, or `None` when no
    /// keys are enumerable. The order is backend-internal and not
    /// guaranteed to be numeric.
    fn first_key(&self) -> Option<u32>;

    /// Key following `prev` in backend-defined enumeration order, or `None`
    /// when no further keys exist past `prev` (which does not imply the
    /// store is empty).
    fn next_key(&self, prev: u32) -> Option<u32>;
}
