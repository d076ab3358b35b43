//! # key-events
//!
//! Command-line front end for key events impact analysis.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use key_events::{Config, Lifecycle};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "key-events")]
#[command(about = "Key events impact analysis for GA4 traffic exports", long_about = None)]
struct Cli {
    /// JSON config file (missing keys take defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Model lifecycle (fit-on-upload, persisted)
    #[arg(long, global = true)]
    lifecycle: Option<Lifecycle>,

    /// Persisted model path
    #[arg(short, long, global = true)]
    model: Option<PathBuf>,

    /// Fraction of rows held out for evaluation
    #[arg(long, global = true)]
    test_ratio: Option<f64>,

    /// Seed of the held-out shuffle
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit (or load) a model for a CSV and print coefficients and insights
    Analyze {
        /// GA4 export with Total users, New users, Sessions, Bounce rate, Key events
        #[arg(short, long)]
        input: PathBuf,

        /// Feature to simulate a change for
        #[arg(short, long, requires = "delta")]
        feature: Option<String>,

        /// Change per day of the simulated feature
        #[arg(short, long, allow_hyphen_values = true, requires = "feature")]
        delta: Option<f64>,

        /// Horizon of the simulation (week, month, quarter)
        #[arg(long)]
        horizon: Option<String>,
    },

    /// Fit a model and save it for later predictions
    Train {
        /// GA4 export with Total users, New users, Sessions, Bounce rate, Key events
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Predict key events for rows without a target using a saved model
    Predict {
        /// CSV with Total users, New users, Sessions, Bounce rate
        #[arg(short, long)]
        input: PathBuf,

        /// Output CSV (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Simulate a sustained daily change in one feature
    Scenario {
        /// CSV whose feature means form the baseline
        #[arg(short, long)]
        input: PathBuf,

        /// Feature to change
        #[arg(short, long)]
        feature: String,

        /// Change per day
        #[arg(short, long, allow_hyphen_values = true)]
        delta: f64,

        /// Horizon (week, month, quarter)
        #[arg(long)]
        horizon: Option<String>,
    },
}

impl Cli {
    /// Config file (or defaults) with command-line overrides applied
    fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(lifecycle) = self.lifecycle {
            config.lifecycle = lifecycle;
        }
        if let Some(model) = &self.model {
            config.model_path = model.clone();
        }
        if let Some(test_ratio) = self.test_ratio {
            config.test_ratio = test_ratio;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "key_events=warn,key_events_cli=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    match cli.command {
        Commands::Analyze {
            input,
            feature,
            delta,
            horizon,
        } => {
            let scenario = feature.zip(delta);
            commands::run_analyze(config, &input, scenario, horizon.as_deref())
        }
        Commands::Train { input } => commands::run_train(config, &input),
        Commands::Predict { input, output } => commands::run_predict(config, &input, output.as_deref()),
        Commands::Scenario {
            input,
            feature,
            delta,
            horizon,
        } => commands::run_scenario(config, &input, &feature, delta, horizon.as_deref()),
    }
}
