use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Observed outcomes for one experimental group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSample")]
pub struct Sample {
    label: String,
    values: Vec<f64>,
}

/// Wire form of [`Sample`], validated on the way in.
#[derive(Deserialize)]
struct RawSample {
    label: String,
    values: Vec<f64>,
}

impl TryFrom<RawSample> for Sample {
    type Error = CoreError;

    fn try_from(raw: RawSample) -> Result<Self> {
        Sample::new(raw.label, raw.values)
    }
}

impl Sample {
    /// Build a sample, rejecting empty or non-finite data.
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        let label = label.into();

        if values.is_empty() {
            return Err(CoreError::Validation(format!(
                "sample '{}' contains no observations",
                label
            )));
        }

        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(CoreError::Validation(format!(
                "sample '{}' has a non-finite value at position {}",
                label, pos
            )));
        }

        Ok(Self { label, values })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a constructed sample; kept for slice-like ergonomics.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn mean(&self) -> f64 {
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// True when every observation equals the first one.
    pub fn is_constant(&self) -> bool {
        let first = self.values[0];
        self.values.iter().all(|&v| v == first)
    }
}

/// Control and test samples handed over by a data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplePair {
    pub control: Sample,
    pub test: Sample,
    /// Cells skipped while loading (empty, NA, NaN), per group.
    #[serde(default)]
    pub missing: MissingCounts,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingCounts {
    pub control: usize,
    pub test: usize,
}

impl SamplePair {
    pub fn new(control: Sample, test: Sample) -> Self {
        Self {
            control,
            test,
            missing: MissingCounts::default(),
        }
    }

    pub fn with_missing(mut self, missing: MissingCounts) -> Self {
        self.missing = missing;
        self
    }
}
