//! Terminal Report Formatting
//!
//! Ranked table for human consumption: fastest first, with a speedup line
//! comparing the extremes when at least two results exist.

use tempobench_core::BenchmarkResult;

/// Format a ranked report for terminal display.
///
/// Results are ordered ascending by average time regardless of input order.
pub fn format_human_report(results: &[&BenchmarkResult]) -> String {
    let mut ranked: Vec<&BenchmarkResult> = results.to_vec();
    ranked.sort_by(|a, b| {
        a.average
            .partial_cmp(&b.average)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut output = String::new();

    output.push('\n');
    output.push_str("Benchmark Report\n");
    output.push_str(&"=".repeat(80));
    output.push_str("\n\n");

    output.push_str(
        "Rank | Benchmark                   | Avg (ms) | Median   | Ops/sec  | Memory (MB)\n",
    );
    output.push_str(&"-".repeat(80));
    output.push('\n');

    for (index, result) in ranked.iter().enumerate() {
        output.push_str(&format!(
            "{:>4} | {:<27} | {:>8.3} | {:>8.3} | {:>8.0} | {:>10.2}\n",
            index + 1,
            result.name,
            result.average,
            result.median,
            result.ops_per_second,
            result.memory_used_mb,
        ));
    }

    if ranked.len() >= 2 {
        let fastest = ranked[0];
        let slowest = ranked[ranked.len() - 1];
        if fastest.average > 0.0 {
            let speedup = slowest.average / fastest.average;
            output.push('\n');
            output.push_str(&"=".repeat(80));
            output.push('\n');
            output.push_str(&format!(
                "{} is {:.1}x faster than {}\n",
                fastest.name, speedup, slowest.name
            ));
        }
    }

    output
}
