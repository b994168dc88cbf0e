use abtest_core::{DescriptiveSummary, Quantile, Sample, SUMMARY_QUANTILES};
use statrs::statistics::Statistics;

use crate::statistical::StatisticalAnalyzer;

const SUMMARY_CONFIDENCE: f64 = 0.95;

pub struct SampleAggregator;

impl SampleAggregator {
    /// Descriptive statistics for one group; `missing` is the number of
    /// cells the data source skipped for this group.
    pub fn summarize(sample: &Sample, missing: usize) -> DescriptiveSummary {
        let values = sample.values();

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let std_dev = if values.len() > 1 { values.std_dev() } else { 0.0 };

        DescriptiveSummary {
            label: sample.label().to_string(),
            count: values.len(),
            missing,
            mean: sample.mean(),
            std_dev,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            quantiles: SUMMARY_QUANTILES
                .iter()
                .map(|&level| Quantile {
                    level,
                    value: Self::percentile(&sorted, level),
                })
                .collect(),
            mean_confidence_interval: StatisticalAnalyzer::confidence_interval(
                values,
                SUMMARY_CONFIDENCE,
            ),
        }
    }

    /// Quantile of already sorted values at `level` in [0, 1], interpolating
    /// linearly between the two nearest order statistics.
    pub fn percentile(sorted_values: &[f64], level: f64) -> f64 {
        if sorted_values.is_empty() {
            return 0.0;
        }

        let position = level.clamp(0.0, 1.0) * (sorted_values.len() - 1) as f64;
        let lower = position.floor() as usize;
        let upper = position.ceil() as usize;
        let fraction = position - lower as f64;

        sorted_values[lower] + (sorted_values[upper] - sorted_values[lower]) * fraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(SampleAggregator::percentile(&sorted, 0.5), 2.5);
        assert_eq!(SampleAggregator::percentile(&sorted, 0.0), 1.0);
        assert_eq!(SampleAggregator::percentile(&sorted, 1.0), 4.0);
    }

    #[test]
    fn test_percentile_empty() {
        assert_eq!(SampleAggregator::percentile(&[], 0.5), 0.0);
    }
}
