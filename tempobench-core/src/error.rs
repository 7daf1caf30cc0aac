//! Error Taxonomy
//!
//! Every failure mode of a benchmark run, one variant each. Nothing is
//! retried and nothing is swallowed; hook and workload errors are carried
//! as sources.

use thiserror::Error;

use crate::result::BenchmarkResult;

/// Boxed error type accepted from workloads and hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Which part of the run a workload failure occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Untimed stabilization executions before measurement
    Warmup,
    /// A timed measurement trial (1-based index)
    Measurement {
        /// Trial number, 1-based
        trial: usize,
    },
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunPhase::Warmup => write!(f, "warmup"),
            RunPhase::Measurement { trial } => write!(f, "measurement trial {}", trial),
        }
    }
}

/// Errors produced by a benchmark run.
#[derive(Debug, Error)]
pub enum BenchError {
    /// The setup hook failed; no trials ran and nothing was recorded.
    #[error("setup hook failed for '{name}': {source}")]
    SetupFailed {
        /// Benchmark name the run was registered under
        name: String,
        /// The hook's error
        #[source]
        source: BoxError,
    },

    /// The workload failed during warmup or a measurement trial; all partial
    /// trial data was discarded and the result store is untouched.
    #[error("workload failed for '{name}' during {phase}: {source}")]
    WorkloadFailed {
        /// Benchmark name the run was registered under
        name: String,
        /// Phase the failure occurred in
        phase: RunPhase,
        /// The workload's error
        #[source]
        source: BoxError,
    },

    /// The teardown hook failed after measurement completed.
    ///
    /// Measurement data was already consistent at that point, so the
    /// computed result is stored, the completion event fires, and the same
    /// result rides along here for the caller.
    #[error("teardown hook failed for '{name}' (result retained): {source}")]
    TeardownFailed {
        /// Benchmark name the run was registered under
        name: String,
        /// The fully computed, stored result
        result: Box<BenchmarkResult>,
        /// The hook's error
        #[source]
        source: BoxError,
    },
}

impl BenchError {
    /// Benchmark name the failed run was registered under.
    pub fn name(&self) -> &str {
        match self {
            BenchError::SetupFailed { name, .. }
            | BenchError::WorkloadFailed { name, .. }
            | BenchError::TeardownFailed { name, .. } => name,
        }
    }
}
