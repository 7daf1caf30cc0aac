//! Benchmark Harness
//!
//! Owns the full lifecycle of a named benchmark run: setup, warmup,
//! measurement trials, teardown, statistics, result storage, and the
//! progress/completion notification stream.
//!
//! ## Pipeline Overview
//!
//! ```text
//! workload (sync or async closure)
//!       │
//!       ▼
//! ┌─────────────┐
//! │   warmup    │  untimed executions, timing discarded
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ measurement │  compact → memory → time → workload×k → time → memory
//! └──────┬──────┘  one progress notification per trial
//!        │
//!        ▼
//! ┌─────────────┐
//! │  finalize   │  summary statistics, store, completion notification
//! └─────────────┘
//! ```
//!
//! Trials run strictly sequentially; `run*` takes `&mut self`, so two runs
//! can never overlap on one harness. There is no watchdog: a hung workload
//! hangs the run, and callers needing a bound must wrap the workload
//! themselves.

use std::convert::Infallible;
use std::future::Future;
use std::hint::black_box;
use std::sync::mpsc;

use fxhash::FxHashMap;
use tempobench_core::{
    BenchError, BenchmarkResult, BoxError, ChannelObserver, Environment, HarnessConfig,
    HarnessEvent, NullObserver, Observer, ProgressUpdate, RunOptions, RunPhase, SystemEnvironment,
};
use tempobench_report::{
    format_human_report, generate_csv_export, generate_json_export, ExportDocument, ExportError,
    ExportFormat, HostInfo,
};
use tempobench_stats::{mean, summarize};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Statistical benchmarking harness.
///
/// Generic over the [`Environment`] supplying the clock, memory probe, and
/// compaction hook; defaults to the host-backed [`SystemEnvironment`].
/// Results are retained by name until the harness is dropped; re-running a
/// name overwrites the prior entry in place.
pub struct Harness<E: Environment = SystemEnvironment> {
    config: HarnessConfig,
    env: E,
    observer: Box<dyn Observer>,
    host: HostInfo,
    results: Vec<BenchmarkResult>,
    index: FxHashMap<String, usize>,
}

impl Harness<SystemEnvironment> {
    /// Harness with default configuration (3 warmup runs, 7 measurement
    /// trials) on the host environment.
    pub fn new() -> Self {
        Self::with_config(HarnessConfig::default())
    }

    /// Harness with the given run counts on the host environment.
    pub fn with_config(config: HarnessConfig) -> Self {
        Self::with_environment(config, SystemEnvironment::new())
    }
}

impl Default for Harness<SystemEnvironment> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Environment> Harness<E> {
    /// Harness on a caller-supplied environment (scripted clocks for tests,
    /// [`AllocEnvironment`](tempobench_core::AllocEnvironment) for heap
    /// deltas, ...).
    ///
    /// `measurement_runs` is clamped to at least 1; `warmup_runs` of 0 is
    /// honored as-is.
    pub fn with_environment(mut config: HarnessConfig, env: E) -> Self {
        config.measurement_runs = config.measurement_runs.max(1);
        Self {
            config,
            env,
            observer: Box::new(NullObserver),
            host: HostInfo::default(),
            results: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// The run counts this harness was built with.
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Replace the notification observer.
    pub fn set_observer<O: Observer + 'static>(&mut self, observer: O) {
        self.observer = Box::new(observer);
    }

    /// Install a channel-backed observer and return the receiver to drain.
    ///
    /// Replaces any previously set observer. Sends are unbounded and never
    /// delay a trial.
    pub fn subscribe(&mut self) -> mpsc::Receiver<HarnessEvent> {
        let (observer, rx) = ChannelObserver::channel();
        self.set_observer(observer);
        rx
    }

    /// Set the opaque host descriptors embedded in the JSON export.
    pub fn set_host_info(&mut self, host: HostInfo) {
        self.host = host;
    }

    // ─── Run surface ─────────────────────────────────────────────────────────

    /// Benchmark an infallible async workload with default options.
    pub async fn run<W, Fut, T>(
        &mut self,
        name: &str,
        workload: W,
    ) -> Result<BenchmarkResult, BenchError>
    where
        W: FnMut() -> Fut,
        Fut: Future<Output = T>,
    {
        self.run_with(name, workload, RunOptions::new()).await
    }

    /// Benchmark an infallible async workload.
    pub async fn run_with<W, Fut, T>(
        &mut self,
        name: &str,
        mut workload: W,
        options: RunOptions,
    ) -> Result<BenchmarkResult, BenchError>
    where
        W: FnMut() -> Fut,
        Fut: Future<Output = T>,
    {
        self.try_run_with(
            name,
            move || {
                let fut = workload();
                async move { Ok::<T, Infallible>(fut.await) }
            },
            options,
        )
        .await
    }

    /// Benchmark a fallible async workload with default options.
    pub async fn try_run<W, Fut, T, Err>(
        &mut self,
        name: &str,
        workload: W,
    ) -> Result<BenchmarkResult, BenchError>
    where
        W: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Err>>,
        Err: Into<BoxError>,
    {
        self.try_run_with(name, workload, RunOptions::new()).await
    }

    /// Benchmark a fallible async workload. This is the full execution path;
    /// every other `run*` variant is an adapter onto it.
    ///
    /// The workload's output value is discarded through
    /// [`std::hint::black_box`]; only side effects and timing matter. An
    /// `Err` during warmup or any trial aborts the run, discards all partial
    /// trial data, and leaves the result store untouched.
    ///
    /// `name` must be non-empty; it is the store key.
    pub async fn try_run_with<W, Fut, T, Err>(
        &mut self,
        name: &str,
        mut workload: W,
        options: RunOptions,
    ) -> Result<BenchmarkResult, BenchError>
    where
        W: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Err>>,
        Err: Into<BoxError>,
    {
        debug_assert!(!name.is_empty(), "benchmark name must be non-empty");

        let (setup, teardown, iterations) = options.into_parts();
        let total_trials = self.config.measurement_runs;

        tracing::debug!(
            name,
            warmup_runs = self.config.warmup_runs,
            measurement_runs = total_trials,
            iterations_per_trial = iterations,
            "starting benchmark run"
        );

        if let Some(setup) = setup {
            setup().await.map_err(|source| BenchError::SetupFailed {
                name: name.to_string(),
                source,
            })?;
        }

        for _ in 0..self.config.warmup_runs {
            let value = workload()
                .await
                .map_err(|source| BenchError::WorkloadFailed {
                    name: name.to_string(),
                    phase: RunPhase::Warmup,
                    source: source.into(),
                })?;
            black_box(value);
        }

        let mut times = Vec::with_capacity(total_trials);
        let mut memory_deltas = Vec::with_capacity(total_trials);

        for trial in 1..=total_trials {
            self.env.try_compact();

            let memory_before = self.env.memory_used();
            let start = self.env.now();

            for _ in 0..iterations {
                let value = workload()
                    .await
                    .map_err(|source| BenchError::WorkloadFailed {
                        name: name.to_string(),
                        phase: RunPhase::Measurement { trial },
                        source: source.into(),
                    })?;
                black_box(value);
            }

            let end = self.env.now();
            let trial_time_ms =
                end.saturating_sub(start).as_secs_f64() * 1000.0 / iterations as f64;
            times.push(trial_time_ms);

            let memory_after = self.env.memory_used();
            memory_deltas.push((memory_after as f64 - memory_before as f64) / BYTES_PER_MB);

            self.observer.on_progress(&ProgressUpdate {
                name: name.to_string(),
                trial,
                total_trials,
                trial_time_ms,
            });
        }

        // Teardown runs after data collection is logically complete, so its
        // failure is reported alongside the finished result, never instead
        // of it.
        let teardown_failure = match teardown {
            Some(teardown) => teardown().await.err(),
            None => None,
        };

        let summary = summarize(&times);
        let result = BenchmarkResult {
            name: name.to_string(),
            times,
            average: summary.average,
            median: summary.median,
            min: summary.min,
            max: summary.max,
            standard_deviation: summary.std_dev,
            ops_per_second: summary.ops_per_second,
            memory_used_mb: mean(&memory_deltas),
        };

        self.store(result.clone());
        self.observer.on_complete(&result);

        tracing::debug!(name, average_ms = result.average, "benchmark complete");

        match teardown_failure {
            Some(source) => Err(BenchError::TeardownFailed {
                name: name.to_string(),
                result: Box::new(result),
                source,
            }),
            None => Ok(result),
        }
    }

    /// Benchmark a plain closure with default options.
    ///
    /// Drives the shared async path on a freshly built current-thread tokio
    /// runtime, so sync and async workloads measure identically.
    pub fn run_sync<W, T>(&mut self, name: &str, workload: W) -> Result<BenchmarkResult, BenchError>
    where
        W: FnMut() -> T,
    {
        self.run_sync_with(name, workload, RunOptions::new())
    }

    /// Benchmark a plain closure.
    pub fn run_sync_with<W, T>(
        &mut self,
        name: &str,
        mut workload: W,
        options: RunOptions,
    ) -> Result<BenchmarkResult, BenchError>
    where
        W: FnMut() -> T,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to create tokio runtime");

        runtime.block_on(self.try_run_with(
            name,
            move || {
                let value = workload();
                async move { Ok::<T, Infallible>(value) }
            },
            options,
        ))
    }

    // ─── Result store ────────────────────────────────────────────────────────

    fn store(&mut self, result: BenchmarkResult) {
        match self.index.get(&result.name) {
            // Last write wins; the original insertion position is kept
            Some(&slot) => self.results[slot] = result,
            None => {
                self.index.insert(result.name.clone(), self.results.len());
                self.results.push(result);
            }
        }
    }

    /// All stored results in insertion order.
    pub fn results(&self) -> &[BenchmarkResult] {
        &self.results
    }

    /// Look up the latest result stored under `name`.
    pub fn get(&self, name: &str) -> Option<&BenchmarkResult> {
        self.index.get(name).map(|&slot| &self.results[slot])
    }

    /// Number of stored results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether any results are stored.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    // ─── Reporting & export ──────────────────────────────────────────────────

    /// All stored results sorted ascending by average time (fastest first).
    pub fn report(&self) -> Vec<&BenchmarkResult> {
        let mut ranked: Vec<&BenchmarkResult> = self.results.iter().collect();
        ranked.sort_by(|a, b| {
            a.average
                .partial_cmp(&b.average)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }

    /// `slowest.average / fastest.average` across the store.
    ///
    /// `None` with fewer than two results, or when the fastest average is 0
    /// and the ratio is undefined.
    pub fn speedup_factor(&self) -> Option<f64> {
        let ranked = self.report();
        if ranked.len() < 2 {
            return None;
        }
        let fastest = ranked[0];
        let slowest = ranked[ranked.len() - 1];
        (fastest.average > 0.0).then(|| slowest.average / fastest.average)
    }

    /// Ranked human-readable report of everything stored.
    pub fn format_report(&self) -> String {
        format_human_report(&self.report())
    }

    /// Serialize all stored results.
    ///
    /// `format` is `"json"` (document with timestamp, host descriptors, and
    /// results in insertion order) or `"csv"` (fixed header plus one row per
    /// result); anything else fails with
    /// [`ExportError::UnsupportedFormat`] and produces no output. An empty
    /// store exports successfully.
    pub fn export(&self, format: &str) -> Result<Vec<u8>, ExportError> {
        match format.parse::<ExportFormat>()? {
            ExportFormat::Json => {
                let document = ExportDocument::new(self.host.clone(), self.results.clone());
                generate_json_export(&document)
            }
            ExportFormat::Csv => generate_csv_export(&self.results),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempobench_core::ManualEnvironment;

    fn manual_harness(
        warmup_runs: usize,
        measurement_runs: usize,
        env: ManualEnvironment,
    ) -> Harness<ManualEnvironment> {
        Harness::with_environment(
            HarnessConfig {
                warmup_runs,
                measurement_runs,
            },
            env,
        )
    }

    /// Environment scripted so every trial takes `trial_ms` milliseconds.
    fn constant_trial_env(trials: usize, trial_ms: f64) -> ManualEnvironment {
        let mut env = ManualEnvironment::new();
        let mut readings = Vec::with_capacity(trials * 2);
        let mut clock = 0.0;
        for _ in 0..trials {
            readings.push(clock);
            clock += trial_ms;
            readings.push(clock);
        }
        env.push_now_ms(&readings);
        env
    }

    #[test]
    fn test_measurement_runs_clamped_to_one() {
        let harness = manual_harness(0, 0, ManualEnvironment::new());
        assert_eq!(harness.config().measurement_runs, 1);
    }

    #[test]
    fn test_times_length_matches_measurement_runs() {
        let mut harness = manual_harness(2, 5, constant_trial_env(5, 3.0));

        let result = harness.run_sync("fixed", || ()).unwrap();

        assert_eq!(result.times.len(), 5);
        for time in &result.times {
            assert!((time - 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_constant_trials_have_zero_std_dev() {
        let mut harness = manual_harness(0, 7, constant_trial_env(7, 5.0));

        let result = harness.run_sync("steady", || ()).unwrap();

        assert!((result.standard_deviation - 0.0).abs() < 1e-9);
        assert!((result.average - 5.0).abs() < 1e-9);
        assert!((result.ops_per_second - 200.0).abs() < 1e-6);
    }

    #[test]
    fn test_times_preserve_execution_order() {
        let mut env = ManualEnvironment::new();
        // Trials of 5 ms, 2 ms, 9 ms, in that order
        env.push_now_ms(&[0.0, 5.0, 5.0, 7.0, 7.0, 16.0]);
        let mut harness = manual_harness(0, 3, env);

        let result = harness.run_sync("ordered", || ()).unwrap();

        assert!((result.times[0] - 5.0).abs() < 1e-9);
        assert!((result.times[1] - 2.0).abs() < 1e-9);
        assert!((result.times[2] - 9.0).abs() < 1e-9);
        // Order statistics come from the sorted view
        assert!((result.min - 2.0).abs() < 1e-9);
        assert!((result.median - 5.0).abs() < 1e-9);
        assert!((result.max - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_iterations_per_trial_divides_window() {
        let mut harness = manual_harness(0, 2, constant_trial_env(2, 10.0));
        let mut calls = 0usize;

        let result = harness
            .run_sync_with(
                "batched",
                || calls += 1,
                RunOptions::new().iterations_per_trial(4),
            )
            .unwrap();

        assert_eq!(calls, 8);
        assert!((result.average - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_warmup_zero_is_honored() {
        let mut harness = manual_harness(0, 3, constant_trial_env(3, 1.0));
        let mut calls = 0usize;

        harness.run_sync("no warmup", || calls += 1).unwrap();

        assert_eq!(calls, 3);
    }

    #[test]
    fn test_warmup_executions_are_untimed() {
        // Only measurement trials consume clock readings
        let mut harness = manual_harness(4, 2, constant_trial_env(2, 6.0));
        let mut calls = 0usize;

        let result = harness.run_sync("warmed", || calls += 1).unwrap();

        assert_eq!(calls, 6);
        assert_eq!(result.times.len(), 2);
        assert!((result.average - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_compaction_attempted_once_per_trial() {
        let mut harness = manual_harness(3, 5, constant_trial_env(5, 1.0));

        harness.run_sync("compacted", || ()).unwrap();

        assert_eq!(harness.env.compactions(), 5);
    }

    #[test]
    fn test_memory_deltas_average_unclamped() {
        let mut env = constant_trial_env(2, 1.0);
        // Trial 1 grows by 2 MiB, trial 2 shrinks by 1 MiB
        let mib = 1024 * 1024;
        env.push_memory_bytes(&[mib, 3 * mib, 3 * mib, 2 * mib]);
        let mut harness = manual_harness(0, 2, env);

        let result = harness.run_sync("memory", || ()).unwrap();

        assert!((result.memory_used_mb - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_rerun_overwrites_in_place() {
        let mut harness = manual_harness(0, 1, {
            let mut env = ManualEnvironment::new();
            env.push_now_ms(&[0.0, 4.0, 4.0, 6.0, 6.0, 7.0]);
            env
        });

        harness.run_sync("first", || ()).unwrap();
        harness.run_sync("second", || ()).unwrap();
        harness.run_sync("first", || ()).unwrap();

        assert_eq!(harness.len(), 2);
        // Overwrite keeps the original insertion position
        assert_eq!(harness.results()[0].name, "first");
        assert_eq!(harness.results()[1].name, "second");
        // ...but carries the latest measurement
        assert!((harness.get("first").unwrap().average - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_report_ranks_ascending_by_average() {
        let mut env = ManualEnvironment::new();
        env.push_now_ms(&[0.0, 10.0, 10.0, 11.0]);
        let mut harness = manual_harness(0, 1, env);

        harness.run_sync("slow", || ()).unwrap();
        harness.run_sync("fast", || ()).unwrap();

        let report = harness.report();
        assert_eq!(report[0].name, "fast");
        assert_eq!(report[1].name, "slow");
        assert!((harness.speedup_factor().unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_speedup_needs_two_results() {
        let mut harness = manual_harness(0, 1, constant_trial_env(1, 2.0));
        assert!(harness.speedup_factor().is_none());

        harness.run_sync("only", || ()).unwrap();
        assert!(harness.speedup_factor().is_none());
    }

    #[test]
    fn test_unsupported_export_format() {
        let harness = manual_harness(0, 1, ManualEnvironment::new());

        let err = harness.export("xml").unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedFormat(ref f) if f == "xml"));
    }

    #[test]
    fn test_export_empty_store() {
        let harness = manual_harness(0, 1, ManualEnvironment::new());

        let csv = String::from_utf8(harness.export("csv").unwrap()).unwrap();
        assert_eq!(csv.lines().count(), 1);

        let json: serde_json::Value =
            serde_json::from_slice(&harness.export("json").unwrap()).unwrap();
        assert!(json["results"].as_array().unwrap().is_empty());
    }
}
