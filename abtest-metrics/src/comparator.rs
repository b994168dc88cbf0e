//! Assumption-driven two-sample comparison.
//!
//! Normality of both samples is checked first; only when it holds is the
//! variance-homogeneity check run. The outcome of those checks selects
//! between Student's t, Welch's t and Mann-Whitney U.

use abtest_core::{
    AssumptionCheck, AssumptionResult, ChosenTest, ComparisonConfig,
    ComparisonOutcome, CoreError, Result, Sample, TestVerdict, MIN_SAMPLE_SIZE,
};

use crate::statistical::{StatisticalAnalyzer, StatisticalResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct AssumptionDrivenComparator {
    config: ComparisonConfig,
}

impl AssumptionDrivenComparator {
    pub fn new(config: ComparisonConfig) -> Self {
        Self { config }
    }

    pub fn with_alpha(alpha: f64) -> Self {
        Self::new(ComparisonConfig::default().with_alpha(alpha))
    }

    pub fn config(&self) -> &ComparisonConfig {
        &self.config
    }

    /// Run the decision procedure and return only the final verdict.
    pub fn compare(&self, sample_a: &Sample, sample_b: &Sample) -> Result<TestVerdict> {
        self.compare_detailed(sample_a, sample_b)
            .map(|outcome| outcome.verdict)
    }

    /// Run the decision procedure, keeping every assumption result.
    pub fn compare_detailed(&self, sample_a: &Sample, sample_b: &Sample) -> Result<ComparisonOutcome> {
        let alpha = self.config.alpha;
        self.config.validate()?;
        for sample in [sample_a, sample_b] {
            check_sample(sample)?;
        }

        let a = sample_a.values();
        let b = sample_b.values();

        let normality = [
            self.normality(sample_a)?,
            self.normality(sample_b)?,
        ];
        let normal = normality.iter().all(|r| r.holds);

        let homogeneity = if normal {
            let result = StatisticalAnalyzer::levene(a, b, self.config.levene_center)?;
            Some(AssumptionResult::new(
                AssumptionCheck::VarianceHomogeneity,
                result.statistic,
                finite_p(result, "Levene")?,
                alpha,
            ))
        } else {
            None
        };

        let test = select_test(normal, homogeneity.as_ref().map(|r| r.holds));
        let result = match test {
            ChosenTest::ParametricEqualVar => StatisticalAnalyzer::t_test(a, b)?,
            ChosenTest::ParametricUnequalVar => StatisticalAnalyzer::welch_t_test(a, b)?,
            ChosenTest::NonParametric => StatisticalAnalyzer::mann_whitney_u(a, b)?,
        };
        let p_value = finite_p(result, test.method_name())?;

        Ok(ComparisonOutcome {
            control_label: sample_a.label().to_string(),
            test_label: sample_b.label().to_string(),
            normality,
            homogeneity,
            verdict: TestVerdict::new(test, result.statistic, p_value, result.degrees_of_freedom, alpha),
            mean_difference: sample_a.mean() - sample_b.mean(),
            effect_size: StatisticalAnalyzer::cohens_d(a, b),
        })
    }

    fn normality(&self, sample: &Sample) -> Result<AssumptionResult> {
        let result = StatisticalAnalyzer::shapiro_wilk(sample.values())?;
        Ok(AssumptionResult::new(
            AssumptionCheck::Normality {
                label: sample.label().to_string(),
            },
            result.statistic,
            finite_p(result, "Shapiro-Wilk")?,
            self.config.alpha,
        ))
    }
}

/// Pure selection policy.
///
/// `homogeneous` is only consulted when the samples are normal.
pub fn select_test(normal: bool, homogeneous: Option<bool>) -> ChosenTest {
    match (normal, homogeneous) {
        (false, _) => ChosenTest::NonParametric,
        (true, Some(false)) => ChosenTest::ParametricUnequalVar,
        (true, _) => ChosenTest::ParametricEqualVar,
    }
}

fn check_sample(sample: &Sample) -> Result<()> {
    if sample.len() < MIN_SAMPLE_SIZE {
        return Err(CoreError::InsufficientData {
            label: sample.label().to_string(),
            actual: sample.len(),
            required: MIN_SAMPLE_SIZE,
        });
    }
    if sample.is_constant() {
        return Err(CoreError::DegenerateSample(format!(
            "sample '{}' has zero variance",
            sample.label()
        )));
    }
    Ok(())
}

fn finite_p(result: StatisticalResult, test_name: &str) -> Result<f64> {
    if result.p_value.is_finite() && !result.statistic.is_nan() {
        Ok(result.p_value)
    } else {
        Err(CoreError::DegenerateSample(format!(
            "{} produced an undefined result (statistic {}, p-value {})",
            test_name, result.statistic, result.p_value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_test_policy() {
        assert_eq!(select_test(true, Some(true)), ChosenTest::ParametricEqualVar);
        assert_eq!(select_test(true, Some(false)), ChosenTest::ParametricUnequalVar);
        assert_eq!(select_test(false, None), ChosenTest::NonParametric);
        assert_eq!(select_test(false, Some(true)), ChosenTest::NonParametric);
    }

    #[test]
    fn test_check_sample_reports_label() {
        let sample = Sample::new("test", vec![1.0, 2.0]).unwrap();
        match check_sample(&sample) {
            Err(CoreError::InsufficientData { label, actual, required }) => {
                assert_eq!(label, "test");
                assert_eq!(actual, 2);
                assert_eq!(required, 3);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
