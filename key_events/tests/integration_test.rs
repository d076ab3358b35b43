mod common;

use key_events::{Config, Feature, FeatureSet, ImpactError, Lifecycle, Session};
use tempfile::TempDir;

fn config(dir: &TempDir, lifecycle: Lifecycle) -> Config {
    Config {
        lifecycle,
        model_path: dir.path().join("model.json"),
        ..Config::default()
    }
}

#[test]
fn test_fit_on_upload_workflow() {
    let dir = TempDir::new().unwrap();
    let csv = common::write_temp(&common::ga4_csv(60));

    // 1. Upload fits immediately
    let mut session = Session::new(config(&dir, Lifecycle::FitOnUpload)).unwrap();
    session.upload_csv(csv.path()).unwrap();
    let model = session.model().unwrap();
    assert_eq!(model.summary().n_observations, 48);
    assert_eq!(model.summary().holdout.unwrap().n, 12);
    assert_eq!(model.summary().holdout_predictions.len(), 12);
    assert!(model.summary().holdout_predictions.iter().all(|p| p.date.is_some()));

    // 2. Insights
    let drivers = session.insights().unwrap();
    assert_eq!(drivers.strongest_positive.0, Feature::Sessions);
    assert_eq!(drivers.strongest_negative.0, Feature::BounceRate);

    // 3. Scenario
    let impact = session.scenario("Sessions", 10.0, Some("week")).unwrap();
    let coefficient = session.model().unwrap().coefficient(Feature::Sessions).unwrap();
    assert!((impact.delta_events - coefficient * 70.0).abs() < 1e-9);

    // 4. Usage errors surface without touching state
    let err = session.scenario("Revenue", 10.0, Some("week")).unwrap_err();
    assert!(matches!(err, ImpactError::UnknownFeature(_)));
    assert!(session.model().is_some());
}

#[test]
fn test_persisted_workflow() {
    let dir = TempDir::new().unwrap();
    let training = common::write_temp(&common::ga4_csv(60));

    // Training session: fit once and persist
    let mut trainer = Session::new(config(&dir, Lifecycle::Persisted)).unwrap();
    trainer.upload_csv(training.path()).unwrap();
    assert!(trainer.model().is_none());
    trainer.fit().unwrap();
    trainer.save_model().unwrap();
    assert!(trainer.config().model_path.exists());

    // Prediction session: load the model and score rows without a target
    let new_rows = "Date,Total users,New users,Sessions,Bounce rate\n\
                    20240401,1200,410,1400,0.44\n\
                    20240402,1250,430,1390,0.46\n";
    let inputs = FeatureSet::from_reader(new_rows.as_bytes()).unwrap();

    let mut predictor = Session::new(config(&dir, Lifecycle::Persisted)).unwrap();
    predictor.load_model().unwrap();
    let predictions = predictor.predict(&inputs).unwrap();

    let expected = trainer.predict(&inputs).unwrap();
    assert_eq!(predictions, expected);
    assert_eq!(predictions.len(), 2);
}

#[test]
fn test_missing_model_file() {
    let dir = TempDir::new().unwrap();
    let mut session = Session::new(config(&dir, Lifecycle::Persisted)).unwrap();
    assert!(matches!(session.load_model(), Err(ImpactError::IoError(_))));
    assert!(matches!(session.save_model(), Err(ImpactError::DataError(_))));
}
