//! Model of the kernel syscall-entry hook.
//!
//! The real instrumentation runs on every traced syscall and stores a
//! `(monotonic timestamp, syscall id)` record into both maps. Here a
//! background thread plays that role at a configurable rate: it writes
//! timestamp-keyed records into every attached store until stopped, with
//! no coordination with the driver. Sweeps racing against it is the whole
//! point of the exercise.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::clock::MonotonicClock;
use crate::store::{MapStore, StoreError};

/// Spawn configuration: how often the producer fires and which stores it
/// writes into.
pub struct ProducerConfig {
    /// Delay between consecutive writes. `Duration::ZERO` fires as fast as
    /// the scheduler allows.
    pub write_interval: Duration,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            write_interval: Duration::from_micros(50),
        }
    }
}

/// Background writer owning its worker thread. Stops and joins on
/// [`SyscallProducer::stop`] or drop.
pub struct SyscallProducer {
    stop: Arc<AtomicBool>,
    writes: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl SyscallProducer {
    /// Start writing records into `stores` until stopped.
    pub fn spawn(stores: Vec<Arc<dyn MapStore>>, config: ProducerConfig) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let writes = Arc::new(AtomicU64::new(0));
        let thread_stop = stop.clone();
        let thread_writes = writes.clone();

        let handle = thread::Builder::new()
            .name("syscall-producer".into())
            .spawn(move || {
                let clock = MonotonicClock::new();
                let mut syscall_id: u64 = 0;
                while !thread_stop.load(Ordering::SeqCst) {
                    // The hook keys records by the low 32 bits of the
                    // nanosecond timestamp.
                    let now = clock.now();
                    let key = (u64::from(now.nsec) + now.sec.wrapping_mul(1_000_000_000)) as u32;
                    syscall_id = (syscall_id + 1) % 450;

                    for store in &stores {
                        match store.insert(key % store.capacity(), syscall_id) {
                            Ok(()) => {
                                thread_writes.fetch_add(1, Ordering::Relaxed);
                            }
                            // A full map drops the record, as the kernel
                            // side would.
                            Err(StoreError::CapacityExceeded { .. }) => {}
                            Err(e) => {
                                log::warn!("producer write dropped: {e}");
                            }
                        }
                    }

                    if !config.write_interval.is_zero() {
                        thread::sleep(config.write_interval);
                    }
                }
            })
            .expect("spawn syscall-producer thread");

        Self {
            stop,
            writes,
            handle: Some(handle),
        }
    }

    /// Total successful writes so far, across all attached stores.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    /// Signal the worker and wait for it to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for SyscallProducer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::array::ArrayMapStore;
    use crate::store::hash::HashMapStore;

    #[test]
    fn producer_populates_both_stores() {
        let hash = Arc::new(HashMapStore::new(1024));
        let array = Arc::new(ArrayMapStore::new(1024));

        let producer = SyscallProducer::spawn(
            vec![hash.clone() as Arc<dyn MapStore>, array.clone()],
            ProducerConfig {
                write_interval: Duration::ZERO,
            },
        );
        while producer.write_count() < 100 {
            thread::yield_now();
        }
        producer.stop();

        assert!(!hash.is_empty());
    }

    #[test]
    fn drop_stops_the_worker() {
        let hash: Arc<dyn MapStore> = Arc::new(HashMapStore::new(64));
        let producer = SyscallProducer::spawn(vec![hash], ProducerConfig::default());
        drop(producer); // must not hang
    }
}
