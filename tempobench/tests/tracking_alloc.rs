//! Heap-delta measurement through the tracking allocator
//!
//! This suite installs `TrackingAllocator` as the global allocator (which is
//! why it lives in its own test binary) and measures workloads through
//! `AllocEnvironment`, so per-trial memory deltas are exact live-heap
//! changes rather than resident-set noise.

use tempobench::{allocation_count, AllocEnvironment, Harness, HarnessConfig, TrackingAllocator};

#[global_allocator]
static ALLOC: TrackingAllocator = TrackingAllocator;

fn alloc_harness(measurement_runs: usize) -> Harness<AllocEnvironment> {
    Harness::with_environment(
        HarnessConfig {
            warmup_runs: 0,
            measurement_runs,
        },
        AllocEnvironment::new(),
    )
}

#[test]
fn retained_allocations_show_positive_deltas() {
    let mut harness = alloc_harness(3);
    let mut retained: Vec<Vec<u8>> = Vec::with_capacity(8);

    let result = harness
        .run_sync("retain 4 MiB per trial", || {
            retained.push(vec![0u8; 4 * 1024 * 1024]);
        })
        .unwrap();

    // Each trial grew the live heap by ~4 MiB
    assert!(
        result.memory_used_mb > 3.9,
        "memory delta was {} MB",
        result.memory_used_mb
    );
    assert_eq!(retained.len(), 3);

    // Releasing in later trials yields negative deltas, unclamped
    let result = harness
        .run_sync("release 4 MiB per trial", || {
            retained.pop();
        })
        .unwrap();

    assert!(
        result.memory_used_mb < -3.9,
        "memory delta was {} MB",
        result.memory_used_mb
    );
}

#[test]
fn allocation_counter_advances() {
    let before = allocation_count();
    let boxed = Box::new([0u64; 32]);
    assert!(allocation_count() > before);
    drop(boxed);
}
