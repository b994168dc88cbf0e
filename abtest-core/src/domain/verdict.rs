use serde::{Deserialize, Serialize};

use super::assumption::AssumptionResult;
use super::summary::DescriptiveSummary;

// ===== Chosen Test =====

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ChosenTest {
    /// Student's t-test with pooled variance.
    ParametricEqualVar,
    /// Welch's t-test.
    ParametricUnequalVar,
    /// Mann-Whitney U rank-sum test.
    NonParametric,
}

impl ChosenTest {
    pub fn is_parametric(&self) -> bool {
        !matches!(self, ChosenTest::NonParametric)
    }

    pub fn method_name(&self) -> &'static str {
        match self {
            Self::ParametricEqualVar => "Student's t-test",
            Self::ParametricUnequalVar => "Welch's t-test",
            Self::NonParametric => "Mann-Whitney U test",
        }
    }
}

impl std::fmt::Display for ChosenTest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParametricEqualVar => write!(f, "parametric-equal-var"),
            Self::ParametricUnequalVar => write!(f, "parametric-unequal-var"),
            Self::NonParametric => write!(f, "non-parametric"),
        }
    }
}

// ===== Test Verdict =====

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestVerdict {
    pub test: ChosenTest,
    pub statistic: f64,
    pub p_value: f64,
    /// Absent for the rank-based test.
    pub degrees_of_freedom: Option<f64>,
    pub alpha: f64,
    pub null_rejected: bool,
}

impl TestVerdict {
    pub fn new(
        test: ChosenTest,
        statistic: f64,
        p_value: f64,
        degrees_of_freedom: Option<f64>,
        alpha: f64,
    ) -> Self {
        Self {
            test,
            statistic,
            p_value,
            degrees_of_freedom,
            alpha,
            null_rejected: p_value < alpha,
        }
    }
}

// ===== Comparison Outcome =====

/// Verdict together with every intermediate result that led to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparisonOutcome {
    pub control_label: String,
    pub test_label: String,
    /// One entry per sample, control first.
    pub normality: [AssumptionResult; 2],
    /// `None` when normality failed and the rank-based test was used.
    pub homogeneity: Option<AssumptionResult>,
    pub verdict: TestVerdict,
    /// Mean of control minus mean of test.
    pub mean_difference: f64,
    /// Cohen's d.
    pub effect_size: f64,
}

impl ComparisonOutcome {
    pub fn normality_holds(&self) -> bool {
        self.normality.iter().all(|r| r.holds)
    }

    pub fn homogeneity_holds(&self) -> Option<bool> {
        self.homogeneity.as_ref().map(|r| r.holds)
    }

    pub fn assumptions(&self) -> impl Iterator<Item = &AssumptionResult> {
        self.normality.iter().chain(self.homogeneity.iter())
    }
}

/// Everything handed to a report sink for one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisReport {
    pub metric: String,
    pub summaries: Vec<DescriptiveSummary>,
    pub outcome: Option<ComparisonOutcome>,
}
