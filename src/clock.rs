//! Monotonic clock readings and the borrow-correct duration arithmetic used
//! to time benchmark sweeps.

use std::fmt;
use std::ops::{Add, Sub};
use std::time::{Duration, Instant};

/// Nanoseconds per second; the nanosecond field of a [`Timespec`] is always
/// strictly below this.
pub const NANOS_PER_SEC: u32 = 1_000_000_000;

/// A monotonic clock reading split into whole seconds and nanoseconds,
/// mirroring the `(tv_sec, tv_nsec)` shape of a kernel timespec.
///
/// Only ever used for duration measurement, never for wall-clock dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Timespec {
    pub sec: u64,
    pub nsec: u32,
}

impl Timespec {
    pub fn new(sec: u64, nsec: u32) -> Self {
        debug_assert!(nsec < NANOS_PER_SEC);
        Self { sec, nsec }
    }

    /// Zero duration.
    pub const ZERO: Timespec = Timespec { sec: 0, nsec: 0 };

    pub fn as_duration(self) -> Duration {
        Duration::new(self.sec, self.nsec)
    }
}

impl From<Duration> for Timespec {
    fn from(d: Duration) -> Self {
        Self {
            sec: d.as_secs(),
            nsec: d.subsec_nanos(),
        }
    }
}

/// Elapsed time between two monotonic readings. The caller guarantees
/// `end >= start`; when the end nanosecond field is smaller than the start's,
/// one second is borrowed and a full second of nanoseconds is added before
/// subtracting, so the result always has `nsec` in `[0, 1e9)`.
impl Sub for Timespec {
    type Output = Timespec;

    fn sub(self, start: Timespec) -> Timespec {
        let end = self;
        if end.nsec < start.nsec {
            Timespec {
                sec: end.sec - start.sec - 1,
                nsec: NANOS_PER_SEC + end.nsec - start.nsec,
            }
        } else {
            Timespec {
                sec: end.sec - start.sec,
                nsec: end.nsec - start.nsec,
            }
        }
    }
}

impl Add for Timespec {
    type Output = Timespec;

    fn add(self, other: Timespec) -> Timespec {
        let mut sec = self.sec + other.sec;
        let mut nsec = self.nsec + other.nsec;
        if nsec >= NANOS_PER_SEC {
            sec += 1;
            nsec -= NANOS_PER_SEC;
        }
        Timespec { sec, nsec }
    }
}

/// Formats as `sec.nnnnnnnnn`, the cell format used by the reporter.
impl fmt::Display for Timespec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.sec, self.nsec)
    }
}

/// Monotonic time source. Readings are offsets from a process-local origin,
/// so they are only comparable against readings from the same clock.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    pub fn now(&self) -> Timespec {
        Timespec::from(self.origin.elapsed())
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}
