//! Kernel Map Latency Benchmark
//!
//! Measures and compares the operational latency of the two key-value map
//! models exposed by a kernel tracing subsystem: a hash-indexed store and a
//! dense array-indexed store. A background producer (modeling the kernel's
//! syscall-entry hook) writes timestamp-keyed records into both stores while
//! the driver times bulk lookup, insert, and delete/reset passes over each
//! and prints one fixed-width result row per iteration.
//!
//! Two store strategies are compared:
//! - **Hash store**: sparse key space, true deletion, cursor enumeration
//! - **Array store**: dense index space, deletion modeled as a zero overwrite
//!
//! Run the benchmark: `cargo run --release -- -a`
//! Run tests: `cargo test`

pub mod clock;
pub mod cursor;
pub mod driver;
pub mod producer;
pub mod report;
pub mod store;
pub mod sweep;
