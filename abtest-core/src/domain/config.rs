use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{CoreError, Result};

pub const DEFAULT_ALPHA: f64 = 0.05;

/// Smallest sample the normality check accepts.
pub const MIN_SAMPLE_SIZE: usize = 3;

/// Centre used when computing absolute deviations in Levene's test.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LeveneCenter {
    /// Brown-Forsythe variant.
    #[default]
    Median,
    Mean,
}

impl std::fmt::Display for LeveneCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Median => write!(f, "median"),
            Self::Mean => write!(f, "mean"),
        }
    }
}

impl std::str::FromStr for LeveneCenter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "median" => Ok(Self::Median),
            "mean" => Ok(Self::Mean),
            other => Err(CoreError::Validation(format!(
                "unknown Levene centre '{}', expected 'median' or 'mean'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Validate)]
pub struct ComparisonConfig {
    #[serde(default = "default_alpha")]
    #[validate(range(exclusive_min = 0.0, exclusive_max = 1.0))]
    pub alpha: f64,
    #[serde(default)]
    pub levene_center: LeveneCenter,
}

fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            levene_center: LeveneCenter::default(),
        }
    }
}

impl ComparisonConfig {
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_levene_center(mut self, center: LeveneCenter) -> Self {
        self.levene_center = center;
        self
    }

    /// Check field rules, reporting a bad alpha as `InvalidAlpha`.
    pub fn validate(&self) -> Result<()> {
        // Range rules let NaN through.
        if self.alpha.is_nan() {
            return Err(CoreError::InvalidAlpha(self.alpha));
        }
        Validate::validate(self).map_err(|_| CoreError::InvalidAlpha(self.alpha))
    }
}

/// Alpha must lie in the open interval (0, 1).
pub fn validate_alpha(alpha: f64) -> Result<()> {
    ComparisonConfig::default().with_alpha(alpha).validate()
}
