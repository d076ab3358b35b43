mod common;

use approx::assert_relative_eq;
use key_events::{Dataset, Feature, FeatureRow, FittedModel, Horizon, ImpactError, LinearRegression, Scenario};
use rstest::rstest;
use tempfile::NamedTempFile;

fn fitted() -> (Dataset, FittedModel) {
    let data = Dataset::from_reader(common::ga4_csv(40).as_bytes()).unwrap();
    let model = LinearRegression::new().fit_dataset(&data).unwrap();
    (data, model)
}

#[test]
fn test_fit_recovers_generating_coefficients() {
    let (_, model) = fitted();

    assert_relative_eq!(model.coefficient(Feature::Sessions).unwrap(), 0.1, epsilon = 0.01);
    assert_relative_eq!(model.coefficient(Feature::TotalUsers).unwrap(), 0.02, epsilon = 0.01);
    assert!(model.summary().r_squared > 0.99);
    assert!(model.summary().inference.is_some());
}

#[test]
fn test_too_few_rows() {
    let data = Dataset::from_reader(common::ga4_csv(4).as_bytes()).unwrap();
    let err = LinearRegression::new().fit_dataset(&data).unwrap_err();
    assert!(matches!(
        err,
        ImpactError::IllConditionedFit {
            observations: 4,
            parameters: 5
        }
    ));
}

#[rstest]
fn test_linearity_identity(
    #[values(Feature::TotalUsers, Feature::NewUsers, Feature::Sessions, Feature::BounceRate)] feature: Feature,
    #[values(Horizon::Week, Horizon::Month, Horizon::Quarter)] horizon: Horizon,
    #[values(-25.0, -0.5, 0.0, 3.0, 120.0)] delta: f64,
) {
    let (data, model) = fitted();
    let baseline = data.baseline().unwrap();

    let impact = Scenario::new(feature, delta, horizon)
        .unwrap()
        .evaluate(&model, &baseline)
        .unwrap();

    let coefficient = model.coefficient(feature).unwrap();
    let expected = coefficient * delta * f64::from(horizon.multiplier());
    assert_relative_eq!(impact.delta_events, expected, epsilon = 1e-9, max_relative = 1e-12);
    assert_relative_eq!(
        impact.predicted_after - impact.predicted_before,
        expected,
        epsilon = 1e-6
    );
    if delta == 0.0 {
        assert_eq!(impact.delta_events, 0.0);
    }
}

#[test]
fn test_documented_sessions_example() {
    let model = FittedModel::from_parts(Feature::ALL.to_vec(), vec![0.015, 0.04, 0.1, -9.0], 2.0).unwrap();
    let baseline = FeatureRow::new([1000.0, 400.0, 1200.0, 0.5]);

    let impact = Scenario::new(Feature::Sessions, 10.0, Horizon::Week)
        .unwrap()
        .evaluate(&model, &baseline)
        .unwrap();

    assert_relative_eq!(impact.delta_events, 7.0, epsilon = 1e-12);
    assert_eq!(impact.direction(), key_events::Direction::Increase);
}

#[test]
fn test_save_and_load_round_trip() {
    let (data, model) = fitted();
    let file = NamedTempFile::new().unwrap();

    model.save(file.path()).unwrap();
    let restored = FittedModel::load(file.path()).unwrap();

    assert_eq!(restored, model);
    for row in data.features() {
        assert_eq!(restored.predict(row).to_bits(), model.predict(row).to_bits());
    }
}

#[test]
fn test_load_rejects_garbage() {
    let file = common::write_temp("not json");
    assert!(matches!(FittedModel::load(file.path()), Err(ImpactError::JsonError(_))));
}
