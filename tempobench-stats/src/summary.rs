//! Summary Statistics
//!
//! Order statistics (median, min, max) are computed from a sorted copy;
//! the caller's slice is left in execution order.

/// Aggregate measures derived from one benchmark's trial times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialSummary {
    /// Arithmetic mean of all trial times (ms)
    pub average: f64,
    /// Middle sorted value; mean of the two middle values for even counts (ms)
    pub median: f64,
    /// Fastest trial (ms)
    pub min: f64,
    /// Slowest trial (ms)
    pub max: f64,
    /// Population standard deviation (divides by `n`, not `n - 1`) (ms)
    pub std_dev: f64,
    /// Throughput: `1000 / average`, or 0 when the average is 0
    pub ops_per_second: f64,
}

impl TrialSummary {
    fn zero() -> Self {
        Self {
            average: 0.0,
            median: 0.0,
            min: 0.0,
            max: 0.0,
            std_dev: 0.0,
            ops_per_second: 0.0,
        }
    }
}

/// Arithmetic mean of a sample set. Returns 0 for an empty slice.
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Compute the full summary for a set of trial times in milliseconds.
///
/// Empty input yields the all-zero summary.
pub fn summarize(times: &[f64]) -> TrialSummary {
    if times.is_empty() {
        return TrialSummary::zero();
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let average = mean(times);

    let n = sorted.len();
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };

    let min = sorted[0];
    let max = sorted[n - 1];

    // Population variance: divide by n, not n - 1.
    let variance = times.iter().map(|t| (t - average).powi(2)).sum::<f64>() / n as f64;
    let std_dev = variance.sqrt();

    let ops_per_second = if average > 0.0 { 1000.0 / average } else { 0.0 };

    TrialSummary {
        average,
        median,
        min,
        max,
        std_dev,
        ops_per_second,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_summary() {
        let times = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let summary = summarize(&times);

        assert!((summary.average - 3.0).abs() < f64::EPSILON);
        assert!((summary.median - 3.0).abs() < f64::EPSILON);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 5.0);
    }

    #[test]
    fn test_even_length_median() {
        let times = vec![1.0, 2.0, 3.0, 4.0];
        let summary = summarize(&times);

        assert!((summary.median - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_odd_length_median() {
        let times = vec![1.0, 2.0, 3.0];
        let summary = summarize(&times);

        assert!((summary.median - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_median_uses_sorted_order() {
        // Execution order is not sorted order
        let times = vec![5.0, 1.0, 3.0];
        let summary = summarize(&times);

        assert!((summary.median - 3.0).abs() < f64::EPSILON);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 5.0);
    }

    #[test]
    fn test_population_std_dev() {
        // Population std-dev of [2, 4, 4, 4, 5, 5, 7, 9] is exactly 2
        let times = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let summary = summarize(&times);

        assert!((summary.std_dev - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_times_zero_std_dev() {
        let times = vec![5.0; 7];
        let summary = summarize(&times);

        assert!((summary.std_dev - 0.0).abs() < f64::EPSILON);
        assert!((summary.average - 5.0).abs() < f64::EPSILON);
        assert!((summary.ops_per_second - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ops_per_second_is_reciprocal_of_average() {
        let times = vec![0.25, 0.25, 0.5, 1.0];
        let summary = summarize(&times);

        assert!((summary.ops_per_second - 1000.0 / summary.average).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_average_zero_throughput() {
        let times = vec![0.0, 0.0, 0.0];
        let summary = summarize(&times);

        assert_eq!(summary.ops_per_second, 0.0);
    }

    #[test]
    fn test_extrema_bound_central_tendency() {
        let times = vec![3.2, 1.7, 9.4, 2.2, 4.0, 4.1, 2.9];
        let summary = summarize(&times);

        assert!(summary.min <= summary.median && summary.median <= summary.max);
        assert!(summary.min <= summary.average && summary.average <= summary.max);
        assert!(summary.std_dev >= 0.0);
    }

    #[test]
    fn test_empty_samples() {
        let summary = summarize(&[]);

        assert_eq!(summary.average, 0.0);
        assert_eq!(summary.median, 0.0);
        assert_eq!(summary.ops_per_second, 0.0);
    }

    #[test]
    fn test_mean_of_memory_deltas_may_be_negative() {
        // Host reclaimed memory during two trials
        let deltas = vec![1.5, -0.5, -2.0];
        assert!((mean(&deltas) - (-1.0 / 3.0)).abs() < 1e-12);
    }

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), 0.0);
    }
}
