//! Sub-command implementations and report rendering

use anyhow::{Context, Result};
use chrono::NaiveDate;
use key_events::{
    Config, Drivers, Feature, FeatureSet, FittedModel, HeldOutPrediction, Lifecycle, ScenarioImpact, Session,
};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

/// Build a session for `input` according to the configured lifecycle
///
/// Fit-on-upload fits the CSV directly; persisted loads the saved model and
/// only uses the CSV for the scenario baseline.
fn open_session(config: Config, input: &Path) -> Result<Session> {
    let lifecycle = config.lifecycle;
    let mut session = Session::new(config)?;

    if lifecycle == Lifecycle::Persisted {
        let model_path = session.config().model_path.clone();
        session
            .load_model()
            .with_context(|| format!("failed to load model from {}", model_path.display()))?;
    }

    session
        .upload_csv(input)
        .with_context(|| format!("failed to load {}", input.display()))?;
    Ok(session)
}

pub fn run_analyze(
    config: Config,
    input: &Path,
    scenario: Option<(String, f64)>,
    horizon: Option<&str>,
) -> Result<()> {
    let scenario = scenario
        .map(|(feature, delta)| config.scenario(&feature, delta, horizon))
        .transpose()?;

    let session = open_session(config, input)?;
    let model = session.model().context("no model available")?;

    let mut out = render_model(model);
    if let Ok(drivers) = session.insights() {
        out.push_str(&render_insights(&drivers));
    }

    if let Some(scenario) = scenario {
        let impact = session.evaluate(&scenario)?;
        out.push_str(&render_scenario(&impact));
    }

    print!("{}", out);
    Ok(())
}

pub fn run_train(config: Config, input: &Path) -> Result<()> {
    let config = Config {
        lifecycle: Lifecycle::Persisted,
        ..config
    };
    let mut session = Session::new(config)?;
    session
        .upload_csv(input)
        .with_context(|| format!("failed to load {}", input.display()))?;
    session.fit()?;
    session.save_model()?;

    let model = session.model().context("no model available")?;
    print!("{}", render_model(model));
    println!("Model saved to {}", session.config().model_path.display());
    Ok(())
}

pub fn run_predict(config: Config, input: &Path, output: Option<&Path>) -> Result<()> {
    let model_path = config.model_path.clone();
    let mut session = Session::new(config)?;
    session
        .load_model()
        .with_context(|| format!("failed to load model from {}", model_path.display()))?;

    let inputs = FeatureSet::from_csv(input)
        .with_context(|| format!("failed to load {}", input.display()))?;
    let predictions = session.predict(&inputs)?;
    info!(rows = predictions.len(), "predicted key events");

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_predictions(file, inputs.dates(), &predictions)?;
            println!("Predictions written to {}", path.display());
        }
        None => write_predictions(io::stdout().lock(), inputs.dates(), &predictions)?,
    }
    Ok(())
}

/// Evaluate a scenario against the saved model, whatever the configured lifecycle
pub fn run_scenario(
    config: Config,
    input: &Path,
    feature: &str,
    delta: f64,
    horizon: Option<&str>,
) -> Result<()> {
    let scenario = config.scenario(feature, delta, horizon)?;
    let config = Config {
        lifecycle: Lifecycle::Persisted,
        ..config
    };

    let session = open_session(config, input)?;
    let impact = session.evaluate(&scenario)?;
    print!("{}", render_scenario(&impact));
    Ok(())
}

/// Write predictions as CSV, with the date index when the input had one
pub fn write_predictions<W: Write>(
    writer: W,
    dates: Option<&[NaiveDate]>,
    predictions: &[f64],
) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);

    match dates {
        Some(dates) => {
            writer.write_record(["Date", "Predicted key events"])?;
            for (date, prediction) in dates.iter().zip(predictions) {
                writer.write_record([date.format("%Y%m%d").to_string(), prediction.to_string()])?;
            }
        }
        None => {
            writer.write_record(["Predicted key events"])?;
            for prediction in predictions {
                writer.write_record([prediction.to_string()])?;
            }
        }
    }

    writer.flush()?;
    Ok(())
}

pub fn render_model(model: &FittedModel) -> String {
    let summary = model.summary();
    let p_values = summary.inference.as_ref().map(|inf| &inf.p_values);

    let mut out = String::new();
    let _ = writeln!(out, "Model Coefficients:");
    for (i, (feature, coef)) in model.coefficients().into_iter().enumerate() {
        match p_values {
            Some(p) => {
                let _ = writeln!(out, "  {:<12} {:>12.6}  (p = {:.4})", feature, coef, p[i]);
            }
            None => {
                let _ = writeln!(out, "  {:<12} {:>12.6}", feature, coef);
            }
        }
    }
    let _ = writeln!(out, "  {:<12} {:>12.6}", "Intercept", model.intercept());

    let _ = writeln!(out, "Fit ({} observations):", summary.n_observations);
    let _ = writeln!(out, "  R²:          {:.4}", summary.r_squared);
    if let Some(adj) = summary.adj_r_squared {
        let _ = writeln!(out, "  Adjusted R²: {:.4}", adj);
    }
    if let Some(holdout) = &summary.holdout {
        let _ = writeln!(out, "Held-out evaluation:");
        out.push_str(&holdout.to_string());
    }
    if !summary.holdout_predictions.is_empty() {
        out.push_str(&render_holdout_predictions(&summary.holdout_predictions));
    }
    out
}

/// Actual against predicted key events for each held-out row
pub fn render_holdout_predictions(predictions: &[HeldOutPrediction]) -> String {
    let mut out = String::from("Held-out predictions:\n");
    let _ = writeln!(out, "  {:<10} {:>12} {:>12}", "Date", "Actual", "Predicted");
    for p in predictions {
        let date = p
            .date
            .map(|d| d.format("%Y%m%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(out, "  {:<10} {:>12.2} {:>12.2}", date, p.actual, p.predicted);
    }
    out
}

pub fn render_insights(drivers: &Drivers<Feature>) -> String {
    let mut out = String::from("Insights:\n");
    for line in drivers.narrate() {
        let _ = writeln!(out, "  {}", line);
    }
    out
}

pub fn render_scenario(impact: &ScenarioImpact) -> String {
    let mut out = String::from("Scenario:\n");
    let _ = writeln!(out, "  {}", impact);
    let _ = writeln!(
        out,
        "  Predicted key events: {:.2} -> {:.2}",
        impact.predicted_before, impact.predicted_after
    );
    out
}
