use abtest_core::{ChosenTest, ComparisonConfig, CoreError, LeveneCenter, Sample};
use abtest_metrics::comparator::AssumptionDrivenComparator;
use abtest_metrics::statistical::StatisticalAnalyzer;
use approx::assert_relative_eq;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

fn sample(label: &str, values: &[f64]) -> Sample {
    Sample::new(label, values.to_vec()).unwrap()
}

fn control() -> Sample {
    sample("control", &[10.0, 12.0, 11.0, 13.0, 12.0, 11.0, 14.0])
}

fn test_group() -> Sample {
    sample("test", &[11.0, 13.0, 12.0, 14.0, 13.0, 12.0, 15.0])
}

// ===== Selection Policy =====

#[test]
fn test_normal_homogeneous_selects_equal_var() {
    let comparator = AssumptionDrivenComparator::default();

    let outcome = comparator.compare_detailed(&control(), &test_group()).unwrap();

    assert!(outcome.normality_holds());
    assert_eq!(outcome.homogeneity_holds(), Some(true));
    assert_eq!(outcome.verdict.test, ChosenTest::ParametricEqualVar);
    assert_eq!(outcome.verdict.degrees_of_freedom, Some(12.0));
    assert_eq!(outcome.verdict.alpha, 0.05);
    assert_eq!(outcome.verdict.null_rejected, outcome.verdict.p_value < 0.05);
    assert!(!outcome.verdict.null_rejected);
    assert_relative_eq!(outcome.mean_difference, -1.0, epsilon = 1e-12);
}

#[test]
fn test_equal_var_verdict_matches_student_t() {
    let a = control();
    let b = test_group();

    let verdict = AssumptionDrivenComparator::default().compare(&a, &b).unwrap();
    let direct = StatisticalAnalyzer::t_test(a.values(), b.values()).unwrap();

    assert_eq!(verdict.statistic.to_bits(), direct.statistic.to_bits());
    assert_eq!(verdict.p_value.to_bits(), direct.p_value.to_bits());
}

#[test]
fn test_normal_heterogeneous_selects_unequal_var() {
    let tight: Vec<f64> = (0..12).map(|k| 10.0 + 0.1 * (k as f64 - 5.5)).collect();
    let wide: Vec<f64> = (0..12).map(|k| 10.0 + 5.0 * (k as f64 - 5.5)).collect();

    let outcome = AssumptionDrivenComparator::default()
        .compare_detailed(&sample("control", &tight), &sample("test", &wide))
        .unwrap();

    assert!(outcome.normality_holds());
    assert_eq!(outcome.homogeneity_holds(), Some(false));
    assert_eq!(outcome.verdict.test, ChosenTest::ParametricUnequalVar);

    let df = outcome.verdict.degrees_of_freedom.unwrap();
    assert!(df < 22.0);
}

#[test]
fn test_outlier_selects_non_parametric_without_homogeneity_check() {
    let with_outlier = sample("control", &[10.0, 12.0, 11.0, 13.0, 12.0, 11.0, 100.0]);

    let outcome = AssumptionDrivenComparator::default()
        .compare_detailed(&with_outlier, &test_group())
        .unwrap();

    assert!(!outcome.normality[0].holds);
    assert!(outcome.normality[1].holds);
    assert!(outcome.homogeneity.is_none());
    assert_eq!(outcome.verdict.test, ChosenTest::NonParametric);
    assert!(outcome.verdict.degrees_of_freedom.is_none());
}

#[rstest]
#[case(vec![11.0, 13.0, 12.0, 14.0, 13.0, 12.0, 15.0])]
#[case(vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 50.0])]
#[case(vec![-3.0, 0.5, 7.0])]
fn test_outlier_non_parametric_regardless_of_other_sample(#[case] other: Vec<f64>) {
    let with_outlier = sample("control", &[10.0, 12.0, 11.0, 13.0, 12.0, 11.0, 100.0]);

    let verdict = AssumptionDrivenComparator::default()
        .compare(&with_outlier, &sample("test", &other))
        .unwrap();

    assert_eq!(verdict.test, ChosenTest::NonParametric);
}

#[test]
fn test_alpha_drives_assumption_decisions() {
    // Normality p-values are about 0.87; alpha above that fails the check.
    let comparator = AssumptionDrivenComparator::with_alpha(0.9);

    let outcome = comparator.compare_detailed(&control(), &test_group()).unwrap();

    assert!(!outcome.normality_holds());
    assert_eq!(outcome.verdict.test, ChosenTest::NonParametric);
    assert_eq!(outcome.verdict.alpha, 0.9);
    assert!(outcome.normality.iter().all(|r| r.alpha == 0.9));
}

#[test]
fn test_mean_centered_levene_config() {
    let config = ComparisonConfig::default().with_levene_center(LeveneCenter::Mean);
    let comparator = AssumptionDrivenComparator::new(config);

    let outcome = comparator.compare_detailed(&control(), &test_group()).unwrap();

    assert_eq!(outcome.verdict.test, ChosenTest::ParametricEqualVar);
    assert_eq!(comparator.config().levene_center, LeveneCenter::Mean);
}

// ===== Error Conditions =====

#[test]
fn test_sample_of_two_is_insufficient() {
    let small = sample("test", &[1.0, 2.0]);

    let result = AssumptionDrivenComparator::default().compare(&control(), &small);

    match result {
        Err(CoreError::InsufficientData { label, actual, required }) => {
            assert_eq!(label, "test");
            assert_eq!(actual, 2);
            assert_eq!(required, 3);
        }
        other => panic!("expected InsufficientData, got {:?}", other),
    }
}

#[rstest]
#[case(0.0)]
#[case(1.0)]
#[case(-0.1)]
#[case(f64::NAN)]
fn test_invalid_alpha(#[case] alpha: f64) {
    let result = AssumptionDrivenComparator::with_alpha(alpha).compare(&control(), &test_group());
    assert!(matches!(result, Err(CoreError::InvalidAlpha(_))));
}

#[test]
fn test_invalid_alpha_reported_before_sample_size() {
    let small = sample("test", &[1.0, 2.0]);
    let result = AssumptionDrivenComparator::with_alpha(1.0).compare(&control(), &small);
    assert!(matches!(result, Err(CoreError::InvalidAlpha(_))));
}

#[test]
fn test_constant_sample_is_degenerate() {
    let flat = sample("test", &[4.0, 4.0, 4.0, 4.0]);

    let result = AssumptionDrivenComparator::default().compare(&control(), &flat);

    match result {
        Err(CoreError::DegenerateSample(msg)) => assert!(msg.contains("'test'")),
        other => panic!("expected DegenerateSample, got {:?}", other),
    }
}

// ===== Determinism =====

#[test]
fn test_repeat_comparison_is_bit_identical() {
    let comparator = AssumptionDrivenComparator::default();
    let with_outlier = sample("control", &[10.0, 12.0, 11.0, 13.0, 12.0, 11.0, 100.0]);

    for (a, b) in [(control(), test_group()), (with_outlier, test_group())] {
        let first = comparator.compare_detailed(&a, &b).unwrap();
        let second = comparator.compare_detailed(&a, &b).unwrap();

        assert_eq!(first.verdict.test, second.verdict.test);
        assert_eq!(first.verdict.statistic.to_bits(), second.verdict.statistic.to_bits());
        assert_eq!(first.verdict.p_value.to_bits(), second.verdict.p_value.to_bits());
        for (x, y) in first.normality.iter().zip(second.normality.iter()) {
            assert_eq!(x.p_value.to_bits(), y.p_value.to_bits());
        }
    }
}

// ===== Properties =====

fn sample_values() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-100.0f64..100.0, 3..25)
}

proptest! {
    #[test]
    fn prop_selection_follows_assumptions(a in sample_values(), b in sample_values(), alpha in 0.01f64..0.5) {
        let sa = Sample::new("control", a).unwrap();
        let sb = Sample::new("test", b).unwrap();
        prop_assume!(!sa.is_constant() && !sb.is_constant());

        let outcome = AssumptionDrivenComparator::with_alpha(alpha)
            .compare_detailed(&sa, &sb)
            .unwrap();

        let normal = outcome.normality.iter().all(|r| r.p_value >= alpha);
        match outcome.verdict.test {
            ChosenTest::NonParametric => {
                prop_assert!(!normal);
                prop_assert!(outcome.homogeneity.is_none());
            }
            ChosenTest::ParametricEqualVar => {
                prop_assert!(normal);
                prop_assert!(outcome.homogeneity.as_ref().unwrap().p_value >= alpha);
            }
            ChosenTest::ParametricUnequalVar => {
                prop_assert!(normal);
                prop_assert!(outcome.homogeneity.as_ref().unwrap().p_value < alpha);
            }
        }
    }

    #[test]
    fn prop_rejection_flag_is_p_below_alpha(a in sample_values(), b in sample_values(), alpha in 0.01f64..0.5) {
        let sa = Sample::new("control", a).unwrap();
        let sb = Sample::new("test", b).unwrap();
        prop_assume!(!sa.is_constant() && !sb.is_constant());

        let verdict = AssumptionDrivenComparator::with_alpha(alpha).compare(&sa, &sb).unwrap();

        prop_assert_eq!(verdict.null_rejected, verdict.p_value < alpha);
        prop_assert!((0.0..=1.0).contains(&verdict.p_value));
    }
}
