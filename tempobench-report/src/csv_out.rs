//! CSV Output
//!
//! One fixed header row, one row per result. Numeric values are written at
//! full floating-point precision (shortest round-trip form); string fields
//! are double-quoted.

use serde::Serialize;
use tempobench_core::BenchmarkResult;

use crate::ExportError;

/// Fixed CSV column names, written even when no results are stored.
pub const CSV_HEADER: &str =
    "Benchmark,Average(ms),Median(ms),Min(ms),Max(ms),StdDev(ms),Ops/sec,Memory(MB)";

#[derive(Serialize)]
struct CsvRow<'a> {
    benchmark: &'a str,
    average: f64,
    median: f64,
    min: f64,
    max: f64,
    std_dev: f64,
    ops_per_second: f64,
    memory_mb: f64,
}

impl<'a> From<&'a BenchmarkResult> for CsvRow<'a> {
    fn from(result: &'a BenchmarkResult) -> Self {
        Self {
            benchmark: &result.name,
            average: result.average,
            median: result.median,
            min: result.min,
            max: result.max,
            std_dev: result.standard_deviation,
            ops_per_second: result.ops_per_second,
            memory_mb: result.memory_used_mb,
        }
    }
}

/// Generate the CSV export for the given results (store insertion order).
pub fn generate_csv_export(results: &[BenchmarkResult]) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::with_capacity(CSV_HEADER.len() + 1 + results.len() * 96);
    buf.extend_from_slice(CSV_HEADER.as_bytes());
    buf.push(b'\n');

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::NonNumeric)
        .from_writer(&mut buf);

    for result in results {
        writer.serialize(CsvRow::from(result))?;
    }
    writer.flush()?;
    drop(writer);

    Ok(buf)
}
