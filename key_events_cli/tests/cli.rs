use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn ga4_csv(rows: usize) -> String {
    ga4_csv_with_sessions_effect(rows, 0.1)
}

fn ga4_csv_with_sessions_effect(rows: usize, sessions_coefficient: f64) -> String {
    let mut csv = String::from("Date,Total users , New users,Sessions, Bounce rate,Key events\n");
    for i in 0..rows {
        let x = i as f64;
        let total = 900.0 + 14.0 * x + ((i * 37) % 53) as f64;
        let new = 300.0 + ((i * 29) % 41) as f64 + 3.0 * x;
        let sessions = 1100.0 + 20.0 * x + ((i * 17) % 31) as f64;
        let bounce = 0.42 + 0.015 * ((i * 7) % 9) as f64;
        let events = 4.0 + 0.02 * total + 0.05 * new + sessions_coefficient * sessions - 30.0 * bounce;
        csv.push_str(&format!(
            "2024{:02}{:02},{},{},{},{},{}\n",
            3 + i / 28,
            1 + i % 28,
            total,
            new,
            sessions,
            bounce,
            events
        ));
    }
    csv
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn key_events(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_key-events"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

#[test]
fn test_analyze_with_scenario() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "ga4.csv", &ga4_csv(40));

    let output = key_events(&[
        "analyze",
        "-i",
        input.to_str().unwrap(),
        "--feature",
        "Sessions",
        "--delta",
        "10",
        "--horizon",
        "week",
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Model Coefficients:"));
    assert!(stdout.contains("Held-out evaluation:"));
    assert!(stdout.contains("Sessions is the strongest positive driver"));
    assert!(stdout.contains("increase key events by 7.00"));
}

#[test]
fn test_missing_columns_fail() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "bad.csv", "Date,Sessions,Key events\n20240301,10,1\n");

    let output = key_events(&["analyze", "-i", input.to_str().unwrap()]);
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Missing required columns: Total users, New users, Bounce rate"));
}

#[test]
fn test_train_then_predict() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "ga4.csv", &ga4_csv(30));
    let model = dir.path().join("model.json");
    let model = model.to_str().unwrap();

    let output = key_events(&["train", "-i", input.to_str().unwrap(), "--model", model]);
    assert!(output.status.success());
    assert!(Path::new(model).exists());

    let future = write(
        dir.path(),
        "future.csv",
        "Date,Total users,New users,Sessions,Bounce rate\n20240501,1000,400,1200,0.5\n",
    );
    let predictions = dir.path().join("predictions.csv");
    let output = key_events(&[
        "predict",
        "-i",
        future.to_str().unwrap(),
        "-o",
        predictions.to_str().unwrap(),
        "--model",
        model,
    ]);
    assert!(output.status.success());

    let written = std::fs::read_to_string(&predictions).unwrap();
    let mut lines = written.lines();
    assert_eq!(lines.next(), Some("Date,Predicted key events"));

    let (date, value) = lines.next().unwrap().split_once(',').unwrap();
    assert_eq!(date, "20240501");
    let value: f64 = value.parse().unwrap();
    assert!((value - 149.0).abs() < 1e-6);
}

#[test]
fn test_scenario_with_persisted_model() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "ga4.csv", &ga4_csv(30));
    let model = dir.path().join("model.json");
    let model = model.to_str().unwrap();

    assert!(key_events(&["train", "-i", input.to_str().unwrap(), "--model", model])
        .status
        .success());

    let output = key_events(&[
        "--lifecycle",
        "persisted",
        "--model",
        model,
        "scenario",
        "-i",
        input.to_str().unwrap(),
        "-f",
        "bounce_rate",
        "-d",
        "-0.01",
        "--horizon",
        "month",
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("increase key events by 9.00"));
}

#[test]
fn test_scenario_uses_saved_model_by_default() {
    let dir = TempDir::new().unwrap();
    let training = write(dir.path(), "training.csv", &ga4_csv(30));
    let baseline = write(
        dir.path(),
        "baseline.csv",
        &ga4_csv_with_sessions_effect(30, 0.5),
    );
    let model = dir.path().join("model.json");
    let model = model.to_str().unwrap();

    assert!(key_events(&["train", "-i", training.to_str().unwrap(), "--model", model])
        .status
        .success());

    let output = key_events(&[
        "--model",
        model,
        "scenario",
        "-i",
        baseline.to_str().unwrap(),
        "-f",
        "Sessions",
        "-d",
        "10",
        "--horizon",
        "week",
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("increase key events by 7.00"));
}

#[test]
fn test_unknown_feature_reported_before_loading() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "bad.csv", "Sessions,Key events\n10,1\n");

    for command in ["scenario", "analyze"] {
        let output = key_events(&[
            command,
            "-i",
            input.to_str().unwrap(),
            "-f",
            "Revenue",
            "-d",
            "1",
        ]);
        assert!(!output.status.success());

        let stderr = String::from_utf8(output.stderr).unwrap();
        assert!(stderr.contains("Unknown feature: 'Revenue'"));
        assert!(!stderr.contains("Missing required columns"));
    }
}

#[test]
fn test_analyze_lists_held_out_predictions() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "ga4.csv", &ga4_csv(20));

    let output = key_events(&["analyze", "-i", input.to_str().unwrap()]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let listed = stdout
        .lines()
        .skip_while(|line| *line != "Held-out predictions:")
        .skip(2)
        .take_while(|line| line.starts_with("  2024"))
        .count();
    assert_eq!(listed, 4);
}

#[test]
fn test_unknown_horizon_fails() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "ga4.csv", &ga4_csv(30));

    let output = key_events(&[
        "scenario",
        "-i",
        input.to_str().unwrap(),
        "-f",
        "Sessions",
        "-d",
        "5",
        "--horizon",
        "year",
    ]);
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("horizon must be week, month or quarter"));
}
