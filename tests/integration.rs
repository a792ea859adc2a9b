//! Integration tests: full sweep cycles, driver iterations, and the
//! benign-race tolerance against a live background producer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use map_bench::clock::{MonotonicClock, Timespec};
use map_bench::cursor::KeyCursor;
use map_bench::driver::{BenchDriver, DriverConfig, DriverState};
use map_bench::producer::{ProducerConfig, SyscallProducer};
use map_bench::report::Reporter;
use map_bench::store::array::{ArrayMapStore, SENTINEL};
use map_bench::store::hash::HashMapStore;
use map_bench::store::{MapStore, StoreError};
use map_bench::sweep::{run_sweep, SweepKind};

fn small_config() -> DriverConfig {
    DriverConfig {
        capacity: 16,
        interval: Duration::from_millis(1),
    }
}

fn driver_with_stores(config: &DriverConfig, cancel: Arc<AtomicBool>) -> BenchDriver {
    BenchDriver::new(
        Arc::new(HashMapStore::new(config.capacity)),
        Arc::new(ArrayMapStore::new(config.capacity)),
        config,
        cancel,
    )
}

// ── Array end-to-end ────────────────────────────────────────────────

#[test]
fn array_insert_sweep_populates_every_index() {
    let clock = MonotonicClock::new();
    let store = ArrayMapStore::new(16);

    let insert_elapsed = run_sweep(&store, SweepKind::Insert, &clock).unwrap();
    assert!(insert_elapsed >= Timespec::ZERO);

    for index in 0..16u32 {
        assert_eq!(store.lookup(index), Ok(u64::from(index) * 2));
    }

    let lookup_elapsed = run_sweep(&store, SweepKind::Lookup, &clock).unwrap();
    assert!(lookup_elapsed >= Timespec::ZERO);
}

#[test]
fn array_reset_sweep_twice_leaves_sentinels_both_times() {
    let clock = MonotonicClock::new();
    let store = ArrayMapStore::new(16);
    run_sweep(&store, SweepKind::Insert, &clock).unwrap();

    for _ in 0..2 {
        run_sweep(&store, SweepKind::DeleteOrReset, &clock).unwrap();
        for index in 0..16u32 {
            assert_eq!(store.lookup(index), Ok(SENTINEL));
        }
    }
}

#[test]
fn array_capacity_boundary() {
    let store = ArrayMapStore::new(16);
    assert_eq!(
        store.insert(16, 1),
        Err(StoreError::OutOfRange {
            key: 16,
            capacity: 16
        })
    );
}

// ── Hash end-to-end ─────────────────────────────────────────────────

#[test]
fn cursor_over_three_live_keys_is_a_permutation() {
    let store = HashMapStore::new(1_024);
    for key in [5u32, 9, 20] {
        store.insert(key, u64::from(key) * 2).unwrap();
    }

    let mut cursor = KeyCursor::new(&store as &dyn MapStore);
    let mut seen: Vec<u32> = cursor.by_ref().collect();
    assert_eq!(cursor.next(), None, "cursor must stay exhausted");

    seen.sort_unstable();
    assert_eq!(seen, vec![5, 9, 20]);
}

#[test]
fn hash_capacity_boundary() {
    let capacity = 16u32;
    let store = HashMapStore::new(capacity);
    for key in 0..capacity {
        store.insert(key, 0).unwrap();
    }
    assert_eq!(
        store.insert(capacity, 0),
        Err(StoreError::CapacityExceeded { capacity })
    );
}

#[test]
fn hash_sweep_cycle_lookup_insert_delete() {
    let clock = MonotonicClock::new();
    let store = HashMapStore::new(256);

    run_sweep(&store, SweepKind::Insert, &clock).unwrap();
    assert!(!store.is_empty());

    run_sweep(&store, SweepKind::Lookup, &clock).unwrap();
    run_sweep(&store, SweepKind::DeleteOrReset, &clock).unwrap();
    assert!(store.is_empty());
}

// ── Benign race against a live producer ─────────────────────────────

#[test]
fn cursor_sweeps_tolerate_a_live_producer() {
    let hash = Arc::new(HashMapStore::new(4_096));
    let clock = MonotonicClock::new();

    let producer = SyscallProducer::spawn(
        vec![hash.clone() as Arc<dyn MapStore>],
        ProducerConfig {
            write_interval: Duration::from_micros(20),
        },
    );

    // Sweep repeatedly while the producer inserts underneath us. Keys may
    // vanish between the successor call and the operation; none of that
    // may surface as an error.
    for _ in 0..20 {
        run_sweep(hash.as_ref(), SweepKind::Lookup, &clock).unwrap();
        run_sweep(hash.as_ref(), SweepKind::DeleteOrReset, &clock).unwrap();
    }

    producer.stop();
}

// ── Driver ──────────────────────────────────────────────────────────

#[test]
fn driver_iteration_formats_header_and_row() {
    let config = small_config();
    let driver = driver_with_stores(&config, Arc::new(AtomicBool::new(false)));

    let row = driver.run_once().unwrap();
    assert_eq!(row.cells.len(), 6);

    let mut reporter = Reporter::new(Vec::new());
    reporter.emit(&row);
    reporter.emit(&row);
    let text = String::from_utf8(reporter.into_inner()).unwrap();

    // Header exactly once, then one line per emitted row.
    let mut lines = text.lines();
    let header = lines.next().unwrap();
    for label in ["hash_look", "hash_ins", "hash_del", "arr_look", "arr_ins", "arr_clear"] {
        assert!(header.contains(label), "missing column {label}");
    }
    assert_eq!(lines.count(), 2);
}

#[test]
fn driver_cancels_cleanly_between_iterations() {
    let config = small_config();
    let cancel = Arc::new(AtomicBool::new(false));
    let mut driver = driver_with_stores(&config, cancel.clone());

    let handle = std::thread::spawn(move || {
        let mut reporter = Reporter::new(Vec::new());
        let result = driver.run(&mut reporter);
        (result.is_ok(), driver.state())
    });

    std::thread::sleep(Duration::from_millis(50));
    cancel.store(true, Ordering::SeqCst);

    let (clean, state) = handle.join().unwrap();
    assert!(clean);
    assert_eq!(state, DriverState::Cancelled);
}
