//! Benchmark Result Record

use serde::{Deserialize, Serialize};

/// The finished record of one named benchmark run.
///
/// Immutable once produced; every aggregate field is derived from `times`
/// (milliseconds, in execution order) except `memory_used_mb`, which is the
/// mean of per-trial memory deltas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Unique label the result is stored under
    pub name: String,
    /// One entry per measurement trial, in execution order (ms)
    pub times: Vec<f64>,
    /// Arithmetic mean of `times` (ms)
    pub average: f64,
    /// Median of `times` (ms)
    pub median: f64,
    /// Fastest trial (ms)
    pub min: f64,
    /// Slowest trial (ms)
    pub max: f64,
    /// Population standard deviation of `times` (ms)
    pub standard_deviation: f64,
    /// Throughput: `1000 / average`
    pub ops_per_second: f64,
    /// Mean of per-trial memory deltas (MB); negative when the host
    /// reclaimed memory during trials
    pub memory_used_mb: f64,
}

impl BenchmarkResult {
    /// Number of measurement trials behind this result.
    pub fn trial_count(&self) -> usize {
        self.times.len()
    }
}
