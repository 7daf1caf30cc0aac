//! Environment Capability
//!
//! Abstracts the ambient host services a benchmark run touches: a monotonic
//! clock, a memory-usage probe, and a best-effort allocator compaction hook.
//! The harness only talks to this trait, so trial timing is testable with a
//! scripted clock and the host paths degrade gracefully off Linux.

use std::collections::VecDeque;
use std::time::Duration;

/// Ambient host services consumed by the harness.
///
/// Methods take `&mut self` so deterministic implementations can consume
/// scripted readings without interior mutability.
pub trait Environment: Send {
    /// Monotonic reading; only differences between readings are meaningful.
    fn now(&mut self) -> Duration;

    /// Bytes of memory currently in use by the process, by whatever
    /// definition the implementation provides (resident set, live heap, ...).
    fn memory_used(&mut self) -> u64;

    /// Ask the allocator to release unused memory before a trial.
    ///
    /// Best-effort: returns `true` if anything was released, `false` when
    /// nothing happened or the platform has no such facility.
    fn try_compact(&mut self) -> bool;
}

// ─── Host environment ────────────────────────────────────────────────────────

/// Host-backed environment: `std::time::Instant` for timing, resident-set
/// size for memory, glibc `malloc_trim` for compaction.
#[derive(Debug)]
pub struct SystemEnvironment {
    origin: std::time::Instant,
}

impl SystemEnvironment {
    /// Create an environment anchored at the current instant.
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

impl Default for SystemEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for SystemEnvironment {
    #[inline]
    fn now(&mut self) -> Duration {
        self.origin.elapsed()
    }

    fn memory_used(&mut self) -> u64 {
        resident_bytes().unwrap_or(0)
    }

    fn try_compact(&mut self) -> bool {
        let released = malloc_trim();
        tracing::trace!(released, "allocator compaction requested");
        released
    }
}

/// Resident-set size of the current process from `/proc/self/statm`
/// (Linux only; `None` elsewhere).
#[cfg(target_os = "linux")]
fn resident_bytes() -> Option<u64> {
    let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if page_size <= 0 {
        return None;
    }

    std::fs::read_to_string("/proc/self/statm")
        .ok()
        .and_then(|content| {
            content
                .split_whitespace()
                .nth(1)
                .and_then(|s| s.parse::<u64>().ok())
        })
        .map(|pages| pages * page_size as u64)
}

#[cfg(not(target_os = "linux"))]
fn resident_bytes() -> Option<u64> {
    None
}

/// Return free heap pages to the OS via `malloc_trim(0)` (glibc only).
#[cfg(all(target_os = "linux", target_env = "gnu"))]
fn malloc_trim() -> bool {
    // SAFETY: malloc_trim takes no pointers and is callable at any time.
    unsafe { libc::malloc_trim(0) == 1 }
}

#[cfg(not(all(target_os = "linux", target_env = "gnu")))]
fn malloc_trim() -> bool {
    false
}

// ─── Scripted environment ────────────────────────────────────────────────────

/// Deterministic environment driven by scripted readings.
///
/// Each call to [`Environment::now`] / [`Environment::memory_used`] pops the
/// next queued reading; an exhausted queue repeats the last value. Compaction
/// requests are counted and answer with a configurable result.
#[derive(Debug, Default)]
pub struct ManualEnvironment {
    now_readings: VecDeque<Duration>,
    last_now: Duration,
    memory_readings: VecDeque<u64>,
    last_memory: u64,
    compactions: usize,
    compact_result: bool,
}

impl ManualEnvironment {
    /// Create an environment with empty queues (all readings zero).
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue clock readings, in milliseconds, in the order `now()` will
    /// observe them. The harness samples the clock twice per trial.
    pub fn push_now_ms(&mut self, readings: &[f64]) {
        self.now_readings
            .extend(readings.iter().map(|ms| Duration::from_secs_f64(ms / 1e3)));
    }

    /// Queue memory readings in bytes. The harness samples memory twice per
    /// trial (before and after).
    pub fn push_memory_bytes(&mut self, readings: &[u64]) {
        self.memory_readings.extend(readings.iter().copied());
    }

    /// Choose what `try_compact` reports (defaults to `false`).
    pub fn set_compact_result(&mut self, result: bool) {
        self.compact_result = result;
    }

    /// Number of compaction requests observed so far.
    pub fn compactions(&self) -> usize {
        self.compactions
    }
}

impl Environment for ManualEnvironment {
    fn now(&mut self) -> Duration {
        if let Some(reading) = self.now_readings.pop_front() {
            self.last_now = reading;
        }
        self.last_now
    }

    fn memory_used(&mut self) -> u64 {
        if let Some(reading) = self.memory_readings.pop_front() {
            self.last_memory = reading;
        }
        self.last_memory
    }

    fn try_compact(&mut self) -> bool {
        self.compactions += 1;
        self.compact_result
    }
}

// ─── CPU affinity ────────────────────────────────────────────────────────────

/// Pin the current thread to a specific CPU core.
///
/// Reduces scheduling jitter in trial timings by avoiding core migrations.
#[cfg(target_os = "linux")]
pub fn pin_to_cpu(cpu: usize) -> Result<(), std::io::Error> {
    use std::mem::MaybeUninit;

    unsafe {
        let mut set = MaybeUninit::<libc::cpu_set_t>::zeroed();
        let set_ref = set.assume_init_mut();

        libc::CPU_ZERO(set_ref);
        libc::CPU_SET(cpu, set_ref);

        let result = libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), set_ref);

        if result == 0 {
            Ok(())
        } else {
            Err(std::io::Error::last_os_error())
        }
    }
}

/// Pin the current thread to a specific CPU core.
///
/// CPU pinning is not supported on this platform; always succeeds.
#[cfg(not(target_os = "linux"))]
pub fn pin_to_cpu(_cpu: usize) -> Result<(), std::io::Error> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_now_is_monotonic() {
        let mut env = SystemEnvironment::new();
        let a = env.now();
        std::thread::sleep(Duration::from_millis(5));
        let b = env.now();

        assert!(b > a);
        assert!(b - a >= Duration::from_millis(2));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_system_memory_nonzero_on_linux() {
        let mut env = SystemEnvironment::new();
        assert!(env.memory_used() > 0);
    }

    #[test]
    fn test_manual_readings_pop_in_order() {
        let mut env = ManualEnvironment::new();
        env.push_now_ms(&[0.0, 5.0]);
        env.push_memory_bytes(&[100, 300]);

        assert_eq!(env.now(), Duration::ZERO);
        assert_eq!(env.now(), Duration::from_millis(5));
        assert_eq!(env.memory_used(), 100);
        assert_eq!(env.memory_used(), 300);
    }

    #[test]
    fn test_manual_exhausted_queue_repeats_last() {
        let mut env = ManualEnvironment::new();
        env.push_now_ms(&[2.0]);

        assert_eq!(env.now(), Duration::from_millis(2));
        assert_eq!(env.now(), Duration::from_millis(2));
        assert_eq!(env.memory_used(), 0);
    }

    #[test]
    fn test_manual_counts_compactions() {
        let mut env = ManualEnvironment::new();
        assert!(!env.try_compact());

        env.set_compact_result(true);
        assert!(env.try_compact());
        assert_eq!(env.compactions(), 2);
    }
}
