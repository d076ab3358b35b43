//! Fitted linear models of key events

use crate::error::{ImpactError, Result};
use crate::features::{Feature, FeatureRow};
use crate::metrics::RegressionMetrics;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod ols;
pub mod persist;

pub use ols::LinearRegression;

/// Number of estimated parameters: one coefficient per feature plus intercept
pub const PARAMETER_COUNT: usize = Feature::COUNT + 1;

/// Per-coefficient inference statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoefficientInference {
    /// Standard errors, in feature order
    pub std_errors: Vec<f64>,
    /// t-statistics, in feature order
    pub t_values: Vec<f64>,
    /// Two-sided p-values, in feature order
    pub p_values: Vec<f64>,
    /// Residual degrees of freedom
    pub degrees_of_freedom: usize,
}

/// Observed and predicted key events for one held-out observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeldOutPrediction {
    pub date: Option<NaiveDate>,
    pub actual: f64,
    pub predicted: f64,
}

/// Goodness-of-fit details recorded when a model is fit
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FitSummary {
    /// Observations used to estimate the coefficients
    pub n_observations: usize,
    /// R² on the training observations
    pub r_squared: f64,
    /// Adjusted R², when there are residual degrees of freedom
    pub adj_r_squared: Option<f64>,
    /// Residual standard error, when there are residual degrees of freedom
    pub residual_std_error: Option<f64>,
    /// Coefficient inference, when the design has full rank and nonzero residuals
    pub inference: Option<CoefficientInference>,
    /// Scores on held-out observations, when a test split was requested
    pub holdout: Option<RegressionMetrics>,
    /// Per-row predictions on the held-out observations
    #[serde(default)]
    pub holdout_predictions: Vec<HeldOutPrediction>,
}

/// Immutable linear model: `key events = intercept + Σ coefficient × feature`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedModel {
    features: Vec<Feature>,
    coefficients: Vec<f64>,
    intercept: f64,
    #[serde(default)]
    summary: FitSummary,
}

impl FittedModel {
    /// Assemble a model from known coefficients
    ///
    /// `features` must name each of the four predictors exactly once, and
    /// `coefficients` must follow the same order.
    pub fn from_parts(features: Vec<Feature>, coefficients: Vec<f64>, intercept: f64) -> Result<Self> {
        let model = Self {
            features,
            coefficients,
            intercept,
            summary: FitSummary::default(),
        };
        model.validate()?;
        Ok(model)
    }

    /// Check the structural invariants of a model
    pub(crate) fn validate(&self) -> Result<()> {
        if self.features.len() != self.coefficients.len() {
            return Err(ImpactError::DimensionMismatch {
                expected: self.features.len(),
                actual: self.coefficients.len(),
            });
        }

        let covers_all = self.features.len() == Feature::COUNT
            && Feature::ALL.iter().all(|f| self.features.contains(f));
        if !covers_all {
            return Err(ImpactError::ModelFormat(format!(
                "model must name each predictor exactly once, got {:?}",
                self.features
            )));
        }

        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ImpactError::ModelFormat(
                "model parameters must be finite".to_string(),
            ));
        }

        Ok(())
    }

    /// Feature order of the coefficients
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Pairs of (feature, coefficient), in feature order
    pub fn coefficients(&self) -> Vec<(Feature, f64)> {
        self.features
            .iter()
            .copied()
            .zip(self.coefficients.iter().copied())
            .collect()
    }

    /// Coefficient of a single feature
    pub fn coefficient(&self, feature: Feature) -> Option<f64> {
        self.features
            .iter()
            .position(|&f| f == feature)
            .map(|i| self.coefficients[i])
    }

    /// Intercept term
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Fit details
    pub fn summary(&self) -> &FitSummary {
        &self.summary
    }

    pub(crate) fn set_summary(&mut self, summary: FitSummary) {
        self.summary = summary;
    }

    pub(crate) fn set_holdout(&mut self, holdout: RegressionMetrics, predictions: Vec<HeldOutPrediction>) {
        self.summary.holdout = Some(holdout);
        self.summary.holdout_predictions = predictions;
    }

    /// Predicted key events for one row
    pub fn predict(&self, row: &FeatureRow) -> f64 {
        self.features
            .iter()
            .zip(&self.coefficients)
            .fold(self.intercept, |acc, (&feature, coef)| acc + coef * row[feature])
    }

    /// Predicted key events for many rows
    pub fn predict_many(&self, rows: &[FeatureRow]) -> Vec<f64> {
        rows.iter().map(|row| self.predict(row)).collect()
    }
}
