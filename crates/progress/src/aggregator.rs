//! Reduces a goal's metrics to one overall percentage.

use goaltrack_core::Metric;

/// Averages metric progress into the goal's overall progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressAggregator;

impl ProgressAggregator {
    /// Rounded mean of every metric's progress, or 0 without metrics.
    ///
    /// Pure: identical metrics always give identical output.
    pub fn overall_progress(&self, metrics: &[Metric]) -> u8 {
        if metrics.is_empty() {
            return 0;
        }
        let total: f64 = metrics.iter().map(Metric::progress).sum();
        let mean = total / metrics.len() as f64;
        // Non-negative, so f64::round is half-up here
        mean.round().clamp(0.0, 100.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goaltrack_core::NewMetric;

    fn metric(target: f64, current: f64) -> Metric {
        Metric::new(NewMetric {
            name: "m".to_string(),
            target,
            unit: "u".to_string(),
            current_value: current,
        })
        .unwrap()
    }

    #[test]
    fn test_empty_metrics_is_zero() {
        assert_eq!(ProgressAggregator.overall_progress(&[]), 0);
    }

    #[test]
    fn test_average_of_metrics() {
        let metrics = vec![metric(10.0, 5.0), metric(4.0, 4.0)];
        assert_eq!(ProgressAggregator.overall_progress(&metrics), 75);
    }

    #[test]
    fn test_rounds_half_up() {
        // 12.5 and 100 -> 56.25; 25 and 0 -> 12.5 -> 13
        assert_eq!(ProgressAggregator.overall_progress(&[metric(8.0, 1.0), metric(1.0, 1.0)]), 56);
        assert_eq!(ProgressAggregator.overall_progress(&[metric(4.0, 1.0), metric(1.0, 0.0)]), 13);
    }

    #[test]
    fn test_overachieving_metric_is_capped() {
        let metrics = vec![metric(2.0, 10.0), metric(10.0, 0.0)];
        assert_eq!(ProgressAggregator.overall_progress(&metrics), 50);
    }

    #[test]
    fn test_recomputation_is_idempotent() {
        let metrics = vec![metric(3.0, 1.0), metric(7.0, 2.0), metric(9.0, 9.0)];
        let first = ProgressAggregator.overall_progress(&metrics);
        let second = ProgressAggregator.overall_progress(&metrics);
        assert_eq!(first, second);
    }
}
