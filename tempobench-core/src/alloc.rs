//! Allocation Tracking
//!
//! A global-allocator interceptor that keeps a running count of live heap
//! bytes and total allocations. Opt-in: install it in the benchmark binary
//! with `#[global_allocator]`, then measure with [`AllocEnvironment`] to get
//! exact per-trial heap deltas instead of resident-set readings.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::env::Environment;

static LIVE_BYTES: AtomicU64 = AtomicU64::new(0);
static ALLOCATION_COUNT: AtomicU64 = AtomicU64::new(0);

/// Counting wrapper around the system allocator.
///
/// ```ignore
/// #[global_allocator]
/// static ALLOC: TrackingAllocator = TrackingAllocator;
/// ```
pub struct TrackingAllocator;

// SAFETY: delegates every operation to `System` unchanged; the counters are
// plain atomics updated after the fact.
unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            LIVE_BYTES.fetch_add(layout.size() as u64, Ordering::Relaxed);
            ALLOCATION_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        LIVE_BYTES.fetch_sub(layout.size() as u64, Ordering::Relaxed);
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            LIVE_BYTES.fetch_add(new_size as u64, Ordering::Relaxed);
            LIVE_BYTES.fetch_sub(layout.size() as u64, Ordering::Relaxed);
            ALLOCATION_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        new_ptr
    }
}

/// Heap bytes currently allocated and not yet freed.
///
/// Always 0 unless [`TrackingAllocator`] is installed as the global
/// allocator.
pub fn live_bytes() -> u64 {
    LIVE_BYTES.load(Ordering::Relaxed)
}

/// Total number of allocations performed since process start.
pub fn allocation_count() -> u64 {
    ALLOCATION_COUNT.load(Ordering::Relaxed)
}

/// Environment whose memory probe reads the live-heap counter.
///
/// Timing comes from `std::time::Instant` like the host environment;
/// compaction is a no-op because the counter already excludes freed memory.
#[derive(Debug)]
pub struct AllocEnvironment {
    origin: std::time::Instant,
}

impl AllocEnvironment {
    /// Create an environment anchored at the current instant.
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

impl Default for AllocEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for AllocEnvironment {
    #[inline]
    fn now(&mut self) -> Duration {
        self.origin.elapsed()
    }

    fn memory_used(&mut self) -> u64 {
        live_bytes()
    }

    fn try_compact(&mut self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The tracking allocator is not installed in this test binary, so the
    // counters stay at zero; the integration suite installs it for real.
    #[test]
    fn test_counters_default_to_zero_without_install() {
        let mut env = AllocEnvironment::new();
        assert_eq!(env.memory_used(), live_bytes());
        assert!(!env.try_compact());
    }

    #[test]
    fn test_alloc_environment_clock_advances() {
        let mut env = AllocEnvironment::new();
        let a = env.now();
        std::thread::sleep(Duration::from_millis(2));
        assert!(env.now() > a);
    }
}
