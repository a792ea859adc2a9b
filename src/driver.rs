//! Benchmark driver: sequences the timed passes across both stores, hands
//! each completed row to the reporter, and repeats on a fixed interval
//! until cancelled or failed.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::clock::MonotonicClock;
use crate::report::{Reporter, ResultRow};
use crate::store::array::ArrayMapStore;
use crate::store::hash::HashMapStore;
use crate::store::{MapKind, MapStore, DEFAULT_CAPACITY};
use crate::sweep::{run_sweep, SweepKind};

/// The fixed pass order of the hash-vs-array comparison. Also fixes the
/// report column order, so the header stays aligned with the data cells.
pub const PASS_SEQUENCE: [(&str, MapKind, SweepKind); 6] = [
    ("hash_look", MapKind::Hash, SweepKind::Lookup),
    ("hash_ins", MapKind::Hash, SweepKind::Insert),
    ("hash_del", MapKind::Hash, SweepKind::DeleteOrReset),
    ("arr_look", MapKind::Array, SweepKind::Lookup),
    ("arr_ins", MapKind::Array, SweepKind::Insert),
    ("arr_clear", MapKind::Array, SweepKind::DeleteOrReset),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running,
    /// Stopped cleanly after a cancellation request; no partial row emitted.
    Cancelled,
    /// Stopped on the first unrecoverable pass error; no retry.
    Failed,
}

#[derive(Debug, Clone, Copy)]
pub struct DriverConfig {
    /// Entry limit for both stores.
    pub capacity: u32,
    /// Sleep between iterations.
    pub interval: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            interval: Duration::from_secs(10),
        }
    }
}

/// Owns both store handles for the lifetime of the run and walks them
/// through [`PASS_SEQUENCE`] once per iteration.
///
/// Cancellation is cooperative: the flag is checked between iterations
/// only, so an in-flight pass always completes (or fails) first.
pub struct BenchDriver {
    hash: Arc<HashMapStore>,
    array: Arc<ArrayMapStore>,
    clock: MonotonicClock,
    interval: Duration,
    cancel: Arc<AtomicBool>,
    state: DriverState,
}

impl BenchDriver {
    pub fn new(
        hash: Arc<HashMapStore>,
        array: Arc<ArrayMapStore>,
        config: &DriverConfig,
        cancel: Arc<AtomicBool>,
    ) -> Self {
        Self {
            hash,
            array,
            clock: MonotonicClock::new(),
            interval: config.interval,
            cancel,
            state: DriverState::Idle,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    fn store_for(&self, kind: MapKind) -> &dyn MapStore {
        match kind {
            MapKind::Hash => self.hash.as_ref(),
            MapKind::Array => self.array.as_ref(),
        }
    }

    /// Execute one full iteration of the pass sequence, collecting one
    /// duration per pass. All-or-nothing: the first pass failure aborts the
    /// whole row.
    pub fn run_once(&self) -> Result<ResultRow> {
        let mut row = ResultRow::default();
        for (label, map, sweep) in PASS_SEQUENCE {
            let store = self.store_for(map);
            let elapsed = run_sweep(store, sweep, &self.clock)
                .with_context(|| format!("{sweep} sweep failed on the {map} store ({label})"))?;
            log::debug!("{label}: {elapsed}");
            row.push(label, elapsed);
        }
        Ok(row)
    }

    /// Run iterations until cancelled or a pass fails.
    pub fn run<W: Write>(&mut self, reporter: &mut Reporter<W>) -> Result<()> {
        self.state = DriverState::Running;
        loop {
            if self.cancel.load(Ordering::SeqCst) {
                self.state = DriverState::Cancelled;
                return Ok(());
            }

            match self.run_once() {
                Ok(row) => reporter.emit(&row),
                Err(e) => {
                    self.state = DriverState::Failed;
                    return Err(e);
                }
            }

            if self.cancel.load(Ordering::SeqCst) {
                self.state = DriverState::Cancelled;
                return Ok(());
            }
            thread::sleep(self.interval);
        }
    }
}
