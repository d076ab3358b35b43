//! Runtime configuration

use crate::error::{ImpactError, Result};
use crate::model::LinearRegression;
use crate::features::Feature;
use crate::scenario::{Horizon, Scenario};
use crate::utils::validate_test_ratio;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// How a fitted model relates to the data it is used with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Lifecycle {
    /// Refit every time a dataset is loaded
    #[default]
    FitOnUpload,
    /// Fit once, save to `model_path`, and reuse it for later predictions
    Persisted,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifecycle::FitOnUpload => f.write_str("fit-on-upload"),
            Lifecycle::Persisted => f.write_str("persisted"),
        }
    }
}

impl FromStr for Lifecycle {
    type Err = ImpactError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "fit-on-upload" => Ok(Lifecycle::FitOnUpload),
            "persisted" => Ok(Lifecycle::Persisted),
            other => Err(ImpactError::ConfigError(format!(
                "unknown lifecycle '{}' (expected fit-on-upload or persisted)",
                other
            ))),
        }
    }
}

/// Settings shared by every session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub lifecycle: Lifecycle,
    /// Where the persisted lifecycle reads and writes the model
    pub model_path: PathBuf,
    /// Fraction of rows held out when fitting
    pub test_ratio: f64,
    /// Seed of the held-out shuffle
    pub seed: u64,
    /// Horizon used when a scenario does not name one
    pub default_horizon: Horizon,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lifecycle: Lifecycle::default(),
            model_path: PathBuf::from("key_events_model.json"),
            test_ratio: 0.2,
            seed: 42,
            default_horizon: Horizon::Week,
        }
    }
}

impl Config {
    /// Load and validate a JSON config file; missing keys take defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse and validate JSON config from any source
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let config: Config = serde_json::from_reader(reader)
            .map_err(|e| ImpactError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_test_ratio(self.test_ratio).map_err(|e| ImpactError::ConfigError(e.to_string()))
    }

    /// Fitter configured with this split
    pub fn regression(&self) -> Result<LinearRegression> {
        Ok(LinearRegression::new()
            .with_test_ratio(self.test_ratio)?
            .with_seed(self.seed))
    }

    /// Parse a scenario from user-supplied names, falling back to the
    /// default horizon when none is given
    pub fn scenario(&self, feature: &str, daily_delta: f64, horizon: Option<&str>) -> Result<Scenario> {
        let feature: Feature = feature.parse()?;
        let horizon = match horizon {
            Some(name) => name.parse::<Horizon>()?,
            None => self.default_horizon,
        };
        Scenario::new(feature, daily_delta, horizon)
    }
}
