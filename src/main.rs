//! Benchmark runner binary.
//!
//! Usage:
//!   map-bench -a          # run the hash-vs-array comparison
//!   map-bench -a -v       # same, with debug logging
//!
//! Prints one header line and then one fixed-width row of per-pass
//! durations every interval until interrupted. SIGINT/SIGTERM/SIGQUIT
//! request a clean stop between iterations.

use std::env;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::LevelFilter;
use signal_hook::consts::{SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::Signals;

use map_bench::driver::{BenchDriver, DriverConfig};
use map_bench::producer::{ProducerConfig, SyscallProducer};
use map_bench::report::Reporter;
use map_bench::store::array::ArrayMapStore;
use map_bench::store::hash::HashMapStore;
use map_bench::store::MapStore;

struct Options {
    hash_vs_array: bool,
    verbose: bool,
}

fn usage(program: &str) {
    eprintln!("Usage: {program} [OPTIONS]");
    eprintln!("  -a, --hash-vs-array   Compare hash and array map latency");
    eprintln!("  -v, --verbose         Verbose debug output");
    eprintln!("  -h, --help            Show this help");
}

fn parse_args() -> Result<Options, String> {
    let mut options = Options {
        hash_vs_array: false,
        verbose: false,
    };
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "-a" | "--hash-vs-array" => options.hash_vs_array = true,
            "-v" | "--verbose" => options.verbose = true,
            "-h" | "--help" => return Err(String::new()),
            other => return Err(format!("unknown option: {other}")),
        }
    }
    Ok(options)
}

fn main() {
    let program = env::args().next().unwrap_or_else(|| "map-bench".into());
    let options = match parse_args() {
        Ok(options) => options,
        Err(msg) => {
            if !msg.is_empty() {
                eprintln!("{msg}");
            }
            usage(&program);
            process::exit(if msg.is_empty() { 0 } else { 1 });
        }
    };

    env_logger::Builder::from_default_env()
        .filter_level(if options.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    if !options.hash_vs_array {
        eprintln!("Please select a comparison to run.");
        usage(&program);
        process::exit(1);
    }

    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_clone = cancel.clone();

    // Signal handling on a dedicated thread; first signal requests a clean
    // stop between iterations.
    let mut signals = Signals::new([SIGINT, SIGTERM, SIGQUIT]).unwrap_or_else(|e| {
        eprintln!("Failed to install signal handlers: {e}. Exiting.");
        process::exit(1);
    });
    std::thread::spawn(move || {
        for sig in signals.forever() {
            if cancel_clone.load(Ordering::SeqCst) {
                log::info!("Still finishing the current pass (signal {sig})...");
            } else {
                log::info!("Got signal {sig}. Stopping after the current iteration...");
            }
            cancel_clone.store(true, Ordering::SeqCst);
        }
    });

    let config = DriverConfig::default();
    let hash = Arc::new(HashMapStore::new(config.capacity));
    let array = Arc::new(ArrayMapStore::new(config.capacity));

    // The comparison selection doubles as the hook's autoload toggle: the
    // producer only runs while this benchmark is active.
    let producer = SyscallProducer::spawn(
        vec![hash.clone() as Arc<dyn MapStore>, array.clone()],
        ProducerConfig::default(),
    );

    log::info!(
        "Starting hash-vs-array comparison: capacity {} entries, {}s interval",
        config.capacity,
        config.interval.as_secs()
    );

    let mut driver = BenchDriver::new(hash, array, &config, cancel);
    let mut reporter = Reporter::stdout();
    let result = driver.run(&mut reporter);
    producer.stop();

    match result {
        Ok(()) => log::info!("Benchmark stopped cleanly."),
        Err(e) => {
            log::error!("Benchmark failed: {e:#}");
            process::exit(1);
        }
    }
}
