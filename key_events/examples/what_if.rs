use key_events::{Config, Horizon, Session};
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let csv_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("examples")
        .join("csv")
        .join("ga4_daily.csv");

    println!("Loading data from: {}", csv_path.display());
    let mut session = Session::new(Config::default())?;
    session.upload_csv(&csv_path)?;

    let model = session.model().ok_or("no model was fit")?;
    println!("Coefficients:");
    for (feature, coef) in model.coefficients() {
        println!("  {:<12} {:>10.4}", feature, coef);
    }
    println!("  {:<12} {:>10.4}", "Intercept", model.intercept());

    if let Some(holdout) = &model.summary().holdout {
        println!("\nHeld-out evaluation:\n{}", holdout);
    }

    println!("\nInsights:");
    for line in session.insights()?.narrate() {
        println!("  {}", line);
    }

    // Same change per day, over each horizon
    println!("\nScenarios:");
    for horizon in [Horizon::Week, Horizon::Month, Horizon::Quarter] {
        let impact = session.scenario("Sessions", 25.0, Some(horizon.name()))?;
        println!("  {}", impact);
    }

    let impact = session.scenario("Bounce rate", 0.01, None)?;
    println!("  {}", impact);

    Ok(())
}
