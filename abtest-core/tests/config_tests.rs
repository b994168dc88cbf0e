use abtest_core::domain::*;
use abtest_core::CoreError;
use rstest::rstest;
use test_case::test_case;

#[test]
fn test_comparison_config_default() {
    let config = ComparisonConfig::default();

    assert_eq!(config.alpha, 0.05);
    assert_eq!(config.levene_center, LeveneCenter::Median);
    assert!(config.validate().is_ok());
}

#[test]
fn test_comparison_config_deserialize_partial() {
    let config: ComparisonConfig = serde_json::from_str(r#"{"alpha": 0.01}"#).unwrap();

    assert_eq!(config.alpha, 0.01);
    assert_eq!(config.levene_center, LeveneCenter::Median);
}

#[test]
fn test_comparison_config_builders() {
    let config = ComparisonConfig::default()
        .with_alpha(0.1)
        .with_levene_center(LeveneCenter::Mean);

    assert_eq!(config.alpha, 0.1);
    assert_eq!(config.levene_center, LeveneCenter::Mean);
}

#[rstest]
#[case(0.0)]
#[case(1.0)]
#[case(-0.05)]
#[case(1.5)]
#[case(f64::NAN)]
#[case(f64::INFINITY)]
fn test_invalid_alpha(#[case] alpha: f64) {
    let result = validate_alpha(alpha);
    assert!(matches!(result, Err(CoreError::InvalidAlpha(_))));
}

#[test]
fn test_deserialized_config_out_of_range_alpha() {
    let config: ComparisonConfig = serde_json::from_str(r#"{"alpha": 1.5}"#).unwrap();

    match config.validate() {
        Err(CoreError::InvalidAlpha(alpha)) => assert_eq!(alpha, 1.5),
        other => panic!("expected InvalidAlpha, got {:?}", other),
    }
}

#[rstest]
#[case(0.001)]
#[case(0.05)]
#[case(0.999)]
fn test_valid_alpha(#[case] alpha: f64) {
    assert!(validate_alpha(alpha).is_ok());
}

#[test_case("median" => LeveneCenter::Median)]
#[test_case("MEAN" => LeveneCenter::Mean)]
fn test_levene_center_from_str(input: &str) -> LeveneCenter {
    input.parse().unwrap()
}

#[test]
fn test_levene_center_from_str_unknown() {
    let result: Result<LeveneCenter, _> = "trimmed".parse();
    assert!(matches!(result, Err(CoreError::Validation(_))));
}
