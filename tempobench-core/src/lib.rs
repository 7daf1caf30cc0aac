#![warn(missing_docs)]
//! Tempobench Core - Harness Building Blocks
//!
//! This crate provides the pieces the benchmark harness is assembled from:
//! - `Environment` capability trait (monotonic clock, memory probe,
//!   best-effort allocator compaction) with host, scripted, and
//!   allocation-counter implementations
//! - `BenchmarkResult` record and run configuration
//! - Observer/event types for progress and completion notifications
//! - Error taxonomy for failed runs
//! - `TrackingAllocator` global-allocator interceptor for heap tracking
//! - CPU affinity pinning for stable timing

mod alloc;
mod config;
mod env;
mod error;
mod event;
mod result;

pub use alloc::{allocation_count, live_bytes, AllocEnvironment, TrackingAllocator};
pub use config::{
    HarnessConfig, Hook, HookFuture, RunOptions, DEFAULT_MEASUREMENT_RUNS, DEFAULT_WARMUP_RUNS,
};
pub use env::{pin_to_cpu, Environment, ManualEnvironment, SystemEnvironment};
pub use error::{BenchError, BoxError, RunPhase};
pub use event::{ChannelObserver, HarnessEvent, NullObserver, Observer, ProgressUpdate};
pub use result::BenchmarkResult;
