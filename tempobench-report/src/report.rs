//! Export Document Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempobench_core::BenchmarkResult;

/// Opaque host/platform descriptors supplied by the caller.
///
/// The harness embeds these verbatim in the JSON export and never computes
/// them itself; fill them from `std::env::consts` or wherever suits the
/// embedding application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostInfo {
    /// Operating system / platform label
    pub platform: String,
    /// CPU architecture label
    pub architecture: String,
    /// Runtime or toolchain version label
    pub runtime: String,
}

/// Complete JSON export payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDocument {
    /// When the export was produced (UTC)
    pub timestamp: DateTime<Utc>,
    /// Caller-supplied host descriptors
    pub host: HostInfo,
    /// All stored results, in the store's insertion order (not re-sorted)
    pub results: Vec<BenchmarkResult>,
}

impl ExportDocument {
    /// Build a document stamped with the current time.
    pub fn new(host: HostInfo, results: Vec<BenchmarkResult>) -> Self {
        Self {
            timestamp: Utc::now(),
            host,
            results,
        }
    }
}
