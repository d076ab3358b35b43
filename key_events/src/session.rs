//! State of one interactive analysis session

use crate::config::{Config, Lifecycle};
use crate::data::{Dataset, FeatureSet};
use crate::error::{ImpactError, Result};
use crate::features::{Feature, FeatureRow};
use crate::insight::Drivers;
use crate::model::FittedModel;
use crate::scenario::{Scenario, ScenarioImpact};
use std::path::Path;
use tracing::{info, warn};

/// Dataset and model owned by a single user session
#[derive(Debug, Clone)]
pub struct Session {
    config: Config,
    dataset: Option<Dataset>,
    model: Option<FittedModel>,
}

impl Session {
    /// Start an empty session
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            dataset: None,
            model: None,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Currently loaded dataset
    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// Currently fitted or attached model
    pub fn model(&self) -> Option<&FittedModel> {
        self.model.as_ref()
    }

    /// Replace the dataset
    ///
    /// In the fit-on-upload lifecycle the previous model is discarded and a
    /// new one is fit; if that fit fails the session keeps the dataset but
    /// has no model.
    pub fn load_dataset(&mut self, dataset: Dataset) -> Result<()> {
        info!(rows = dataset.len(), lifecycle = %self.config.lifecycle, "dataset loaded into session");
        self.dataset = Some(dataset);

        if self.config.lifecycle == Lifecycle::FitOnUpload {
            self.model = None;
            self.fit()?;
        }
        Ok(())
    }

    /// Read a CSV file and load it as the session dataset
    pub fn upload_csv<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let dataset = Dataset::from_csv(path)?;
        self.load_dataset(dataset)
    }

    /// Fit a model to the loaded dataset using the configured split
    pub fn fit(&mut self) -> Result<&FittedModel> {
        let dataset = self.require_dataset()?;
        let model = self.config.regression()?.fit_dataset(dataset)?;
        Ok(self.model.insert(model))
    }

    /// Use an existing model
    pub fn attach_model(&mut self, model: FittedModel) {
        self.model = Some(model);
    }

    /// Load the model stored at the configured path
    pub fn load_model(&mut self) -> Result<&FittedModel> {
        if self.config.lifecycle != Lifecycle::Persisted {
            warn!(lifecycle = %self.config.lifecycle, "loading a persisted model outside the persisted lifecycle");
        }
        let model = FittedModel::load(&self.config.model_path)?;
        Ok(self.model.insert(model))
    }

    /// Save the current model to the configured path
    pub fn save_model(&self) -> Result<()> {
        let model = self.require_model()?;
        model.save(&self.config.model_path)?;
        info!(path = %self.config.model_path.display(), "model persisted");
        Ok(())
    }

    /// Mean of every feature over the loaded dataset
    pub fn baseline(&self) -> Result<FeatureRow> {
        self.require_dataset()?.baseline()
    }

    /// Evaluate a "what if" scenario against the dataset baseline
    ///
    /// The feature and horizon names are validated before the session state
    /// is consulted. Without a horizon the configured default is used.
    pub fn scenario(&self, feature: &str, daily_delta: f64, horizon: Option<&str>) -> Result<ScenarioImpact> {
        let scenario = self.config.scenario(feature, daily_delta, horizon)?;
        self.evaluate(&scenario)
    }

    /// Evaluate an already parsed scenario against the dataset baseline
    pub fn evaluate(&self, scenario: &Scenario) -> Result<ScenarioImpact> {
        let model = self.require_model()?;
        let baseline = self.baseline()?;
        scenario.evaluate(model, &baseline)
    }

    /// Strongest positive and negative drivers of the current model
    pub fn insights(&self) -> Result<Drivers<Feature>> {
        self.require_model()?
            .insights()
            .ok_or_else(|| ImpactError::DataError("Model has no coefficients".to_string()))
    }

    /// Predict key events for rows that have no target
    pub fn predict(&self, inputs: &FeatureSet) -> Result<Vec<f64>> {
        Ok(self.require_model()?.predict_many(inputs.rows()))
    }

    /// Drop the dataset and model
    pub fn clear(&mut self) {
        self.dataset = None;
        self.model = None;
    }

    fn require_dataset(&self) -> Result<&Dataset> {
        self.dataset
            .as_ref()
            .ok_or_else(|| ImpactError::DataError("No dataset loaded in this session".to_string()))
    }

    fn require_model(&self) -> Result<&FittedModel> {
        self.model
            .as_ref()
            .ok_or_else(|| ImpactError::DataError("No model fitted in this session".to_string()))
    }
}
