use serde::{Deserialize, Serialize};

/// Quantile levels reported for every group.
pub const SUMMARY_QUANTILES: [f64; 6] = [0.0, 0.05, 0.50, 0.95, 0.99, 1.0];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Quantile {
    pub level: f64,
    pub value: f64,
}

/// Descriptive statistics for one group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DescriptiveSummary {
    pub label: String,
    pub count: usize,
    pub missing: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub quantiles: Vec<Quantile>,
    /// 95% t-interval for the mean; absent below two observations.
    pub mean_confidence_interval: Option<(f64, f64)>,
}

impl DescriptiveSummary {
    pub fn quantile(&self, level: f64) -> Option<f64> {
        self.quantiles
            .iter()
            .find(|q| (q.level - level).abs() < f64::EPSILON)
            .map(|q| q.value)
    }

    pub fn median(&self) -> Option<f64> {
        self.quantile(0.50)
    }
}
