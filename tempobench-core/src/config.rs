//! Run Configuration
//!
//! Per-harness settings (`HarnessConfig`, fixed at construction) and
//! per-call settings (`RunOptions`: hooks and iteration batching).

use std::future::Future;
use std::pin::Pin;

use crate::error::BoxError;

/// Default number of untimed stabilization executions.
pub const DEFAULT_WARMUP_RUNS: usize = 3;

/// Default number of timed measurement trials.
pub const DEFAULT_MEASUREMENT_RUNS: usize = 7;

/// Per-harness run counts, set once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Untimed executions before measurement. Zero genuinely disables
    /// warmup; the harness never raises it silently.
    pub warmup_runs: usize,
    /// Timed measurement trials per run. Clamped to at least 1 by the
    /// harness constructor.
    pub measurement_runs: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            warmup_runs: DEFAULT_WARMUP_RUNS,
            measurement_runs: DEFAULT_MEASUREMENT_RUNS,
        }
    }
}

/// Boxed future returned by a setup/teardown hook.
pub type HookFuture = Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send>>;

/// A setup or teardown hook: invoked exactly once, outside the timed region.
pub type Hook = Box<dyn FnOnce() -> HookFuture + Send>;

/// Per-call options for a single benchmark run.
///
/// ```ignore
/// let options = RunOptions::new()
///     .iterations_per_trial(100)
///     .setup_sync(|| prepare_fixtures())
///     .teardown(|| async { cleanup().await });
/// ```
pub struct RunOptions {
    setup: Option<Hook>,
    teardown: Option<Hook>,
    iterations_per_trial: u64,
}

impl RunOptions {
    /// Options with no hooks and one workload execution per trial.
    pub fn new() -> Self {
        Self {
            setup: None,
            teardown: None,
            iterations_per_trial: 1,
        }
    }

    /// Execute the workload `iterations` times back-to-back inside each
    /// trial's timing window and divide the elapsed time by `iterations`.
    /// Amortizes timer resolution for sub-millisecond workloads. Clamped to
    /// at least 1.
    pub fn iterations_per_trial(mut self, iterations: u64) -> Self {
        self.iterations_per_trial = iterations.max(1);
        self
    }

    /// Asynchronous, fallible setup hook. Runs to completion before any
    /// timing begins; a failure aborts the run with no result recorded.
    pub fn setup<F, Fut, E>(mut self, hook: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<BoxError>,
    {
        self.setup = Some(Box::new(move || {
            Box::pin(async move { hook().await.map_err(Into::into) }) as HookFuture
        }));
        self
    }

    /// Synchronous, infallible setup hook.
    pub fn setup_sync<F>(self, hook: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.setup(move || async move {
            hook();
            Ok::<(), BoxError>(())
        })
    }

    /// Asynchronous, fallible teardown hook. Runs after all trials; a
    /// failure is reported but does not discard the collected measurements.
    pub fn teardown<F, Fut, E>(mut self, hook: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<BoxError>,
    {
        self.teardown = Some(Box::new(move || {
            Box::pin(async move { hook().await.map_err(Into::into) }) as HookFuture
        }));
        self
    }

    /// Synchronous, infallible teardown hook.
    pub fn teardown_sync<F>(self, hook: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.teardown(move || async move {
            hook();
            Ok::<(), BoxError>(())
        })
    }

    /// Decompose into `(setup, teardown, iterations_per_trial)` for the
    /// harness run loop.
    pub fn into_parts(self) -> (Option<Hook>, Option<Hook>, u64) {
        (self.setup, self.teardown, self.iterations_per_trial)
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RunOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunOptions")
            .field("setup", &self.setup.is_some())
            .field("teardown", &self.teardown.is_some())
            .field("iterations_per_trial", &self.iterations_per_trial)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HarnessConfig::default();
        assert_eq!(config.warmup_runs, 3);
        assert_eq!(config.measurement_runs, 7);

        let (setup, teardown, iterations) = RunOptions::new().into_parts();
        assert!(setup.is_none());
        assert!(teardown.is_none());
        assert_eq!(iterations, 1);
    }

    #[test]
    fn test_iterations_clamped_to_one() {
        let (_, _, iterations) = RunOptions::new().iterations_per_trial(0).into_parts();
        assert_eq!(iterations, 1);
    }

    #[test]
    fn test_sync_hooks_wrap_to_async() {
        let options = RunOptions::new()
            .setup_sync(|| {})
            .teardown_sync(|| {});
        let (setup, teardown, _) = options.into_parts();

        assert!(setup.is_some());
        assert!(teardown.is_some());
    }
}
