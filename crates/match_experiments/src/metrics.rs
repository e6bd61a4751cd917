//! Metrics extracted from an experiment run.

use std::time::Duration;

use serde::Serialize;

/// Per-request outcome reported by a rider worker.
#[derive(Debug, Clone, Copy)]
pub struct Outcome {
    pub matched: bool,
    pub completed: bool,
    pub allocation_us: u64,
}

/// Aggregated metrics from a single experiment run.
#[derive(Debug, Clone, Serialize)]
pub struct RunMetrics {
    /// Number of drivers registered before the load was released.
    pub drivers: usize,
    /// Total concurrent ride requests issued.
    pub requests: usize,
    /// Requests that were bound to a driver.
    pub matched: usize,
    /// Requests rejected because every claim was lost or the pool was empty.
    pub rejected: usize,
    /// Matched rides that were also completed during the run.
    pub completed: usize,
    /// Matched / requests.
    pub match_rate: f64,
    /// Average request latency in microseconds.
    pub avg_allocation_us: f64,
    /// Median request latency in microseconds.
    pub median_allocation_us: f64,
    /// P90 request latency in microseconds.
    pub p90_allocation_us: f64,
    /// Wall-clock time for the whole run.
    pub elapsed_ms: u64,
}

impl RunMetrics {
    pub fn from_outcomes(drivers: usize, outcomes: &[Outcome], elapsed: Duration) -> Self {
        let requests = outcomes.len();
        let matched = outcomes.iter().filter(|o| o.matched).count();
        let completed = outcomes.iter().filter(|o| o.completed).count();
        let latencies: Vec<u64> = outcomes.iter().map(|o| o.allocation_us).collect();
        let (avg, median, p90) = calculate_stats(&latencies);

        Self {
            drivers,
            requests,
            matched,
            rejected: requests - matched,
            completed,
            match_rate: if requests == 0 {
                0.0
            } else {
                matched as f64 / requests as f64
            },
            avg_allocation_us: avg,
            median_allocation_us: median,
            p90_allocation_us: p90,
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }
}

/// (avg, median, p90) of a sample; zeros for an empty sample.
fn calculate_stats(values: &[u64]) -> (f64, f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let avg = sorted.iter().sum::<u64>() as f64 / sorted.len() as f64;
    let median = sorted[sorted.len() / 2] as f64;
    let p90 = sorted[(sorted.len() * 9 / 10).min(sorted.len() - 1)] as f64;
    (avg, median, p90)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_of_a_known_sample() {
        let values: Vec<u64> = (1..=10).collect();
        let (avg, median, p90) = calculate_stats(&values);
        assert_eq!(avg, 5.5);
        assert_eq!(median, 6.0);
        assert_eq!(p90, 10.0);
    }

    #[test]
    fn empty_sample_yields_zeros() {
        assert_eq!(calculate_stats(&[]), (0.0, 0.0, 0.0));
    }

    #[test]
    fn outcomes_are_counted() {
        let outcomes = [
            Outcome {
                matched: true,
                completed: true,
                allocation_us: 10,
            },
            Outcome {
                matched: true,
                completed: false,
                allocation_us: 20,
            },
            Outcome {
                matched: false,
                completed: false,
                allocation_us: 5,
            },
        ];
        let metrics = RunMetrics::from_outcomes(2, &outcomes, Duration::from_millis(7));

        assert_eq!(metrics.requests, 3);
        assert_eq!(metrics.matched, 2);
        assert_eq!(metrics.rejected, 1);
        assert_eq!(metrics.completed, 1);
        assert_eq!(metrics.elapsed_ms, 7);
    }
}
