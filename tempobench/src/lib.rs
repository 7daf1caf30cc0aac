#![warn(missing_docs)]
//! # Tempobench
//!
//! Statistical benchmarking harness for Rust: turn "run this thing N times"
//! into trustworthy, comparable performance numbers.
//!
//! - **Warmup/measurement separation**: untimed stabilization runs before
//!   timed trials, with the counts under caller control
//! - **Iteration batching**: amortize timer resolution for sub-millisecond
//!   workloads by dividing a multi-iteration trial window
//! - **Summary statistics**: mean, median, min/max, population standard
//!   deviation, throughput, mean memory delta
//! - **Progress protocol**: synchronous per-trial progress and completion
//!   notifications via an observer or a channel
//! - **Stable export**: ranked terminal report, JSON document, CSV table
//! - **Injectable environment**: clock, memory probe, and allocator
//!   compaction behind a trait, so runs are deterministic under test
//! - **Sync/async duality**: one measurement path; async workload wait time
//!   is part of its measured cost
//!
//! ## Quick Start
//!
//! ```ignore
//! use tempobench::prelude::*;
//!
//! let mut harness = Harness::new();
//!
//! harness.run_sync("string concat", || {
//!     let mut s = String::new();
//!     for i in 0..1000 {
//!         s.push_str(&i.to_string());
//!     }
//!     s
//! })?;
//!
//! harness.run("async sleep", || async {
//!     tokio::time::sleep(std::time::Duration::from_millis(1)).await;
//! }).await?;
//!
//! println!("{}", harness.format_report());
//! let json = harness.export("json")?;
//! ```
//!
//! ## Hooks and Batching
//!
//! ```ignore
//! let options = RunOptions::new()
//!     .iterations_per_trial(1000)
//!     .setup_sync(|| seed_fixtures())
//!     .teardown(|| async { drop_fixtures().await });
//!
//! harness.run_sync_with("lookup", || table.get("key"), options)?;
//! ```

mod harness;

pub use harness::Harness;

// Re-export core types
pub use tempobench_core::{
    allocation_count, live_bytes, pin_to_cpu, AllocEnvironment, BenchError, BenchmarkResult,
    BoxError, ChannelObserver, Environment, HarnessConfig, HarnessEvent, Hook, HookFuture,
    ManualEnvironment, NullObserver, Observer, ProgressUpdate, RunOptions, RunPhase,
    SystemEnvironment, TrackingAllocator, DEFAULT_MEASUREMENT_RUNS, DEFAULT_WARMUP_RUNS,
};

// Re-export report surface
pub use tempobench_report::{
    format_human_report, generate_csv_export, generate_json_export, ExportDocument, ExportError,
    ExportFormat, HostInfo, CSV_HEADER,
};

// Re-export stats
pub use tempobench_stats::{mean, summarize, TrialSummary};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BenchError, BenchmarkResult, Environment, Harness, HarnessConfig, HarnessEvent, HostInfo,
        Observer, ProgressUpdate, RunOptions,
    };
}
