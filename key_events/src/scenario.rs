//! "What if" simulation of a sustained daily change in one traffic metric

use crate::error::{ImpactError, Result};
use crate::features::{Feature, FeatureRow};
use crate::model::FittedModel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Window over which a daily change accumulates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Horizon {
    Week,
    Month,
    Quarter,
}

impl Horizon {
    /// Number of days in the window
    pub fn multiplier(self) -> u32 {
        match self {
            Horizon::Week => 7,
            Horizon::Month => 30,
            Horizon::Quarter => 90,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Horizon::Week => "week",
            Horizon::Month => "month",
            Horizon::Quarter => "quarter",
        }
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Horizon {
    type Err = ImpactError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "week" => Ok(Horizon::Week),
            "month" => Ok(Horizon::Month),
            "quarter" => Ok(Horizon::Quarter),
            other => Err(ImpactError::InvalidParameter(format!(
                "horizon must be week, month or quarter, got '{}'",
                other
            ))),
        }
    }
}

/// Whether a scenario raises or lowers predicted key events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increase,
    Decrease,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Increase => f.write_str("increase"),
            Direction::Decrease => f.write_str("decrease"),
        }
    }
}

/// A sustained daily change in one feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    feature: Feature,
    daily_delta: f64,
    horizon: Horizon,
}

impl Scenario {
    /// Create a scenario; the delta may be zero or negative but must be finite
    pub fn new(feature: Feature, daily_delta: f64, horizon: Horizon) -> Result<Self> {
        if !daily_delta.is_finite() {
            return Err(ImpactError::InvalidParameter(format!(
                "daily delta must be a finite number, got {}",
                daily_delta
            )));
        }

        Ok(Self {
            feature,
            daily_delta,
            horizon,
        })
    }

    /// Create a scenario from user-supplied names
    pub fn parse(feature: &str, daily_delta: f64, horizon: &str) -> Result<Self> {
        let feature: Feature = feature.parse()?;
        let horizon: Horizon = horizon.parse()?;
        Self::new(feature, daily_delta, horizon)
    }

    pub fn feature(&self) -> Feature {
        self.feature
    }

    pub fn daily_delta(&self) -> f64 {
        self.daily_delta
    }

    pub fn horizon(&self) -> Horizon {
        self.horizon
    }

    /// Accumulated change over the horizon
    pub fn total_change(&self) -> f64 {
        self.daily_delta * f64::from(self.horizon.multiplier())
    }

    /// Predict the effect of this scenario against a baseline row
    ///
    /// The reported delta is `coefficient × total_change`, which is exactly
    /// the difference of the two predictions for a linear model. A zero delta
    /// therefore always yields zero.
    pub fn evaluate(&self, model: &FittedModel, baseline: &FeatureRow) -> Result<ScenarioImpact> {
        let coefficient = model
            .coefficient(self.feature)
            .ok_or_else(|| ImpactError::UnknownFeature(self.feature.to_string()))?;

        let total_change = self.total_change();
        let perturbed = baseline.shifted(self.feature, total_change);

        let predicted_before = model.predict(baseline);
        let predicted_after = model.predict(&perturbed);
        let delta_events = coefficient * total_change;

        debug!(
            feature = %self.feature,
            total_change,
            delta_events,
            predicted_difference = predicted_after - predicted_before,
            "evaluated scenario"
        );

        Ok(ScenarioImpact {
            scenario: *self,
            coefficient,
            total_change,
            predicted_before,
            predicted_after,
            delta_events,
        })
    }
}

/// Result of evaluating a [`Scenario`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioImpact {
    pub scenario: Scenario,
    /// Coefficient of the perturbed feature
    pub coefficient: f64,
    /// `daily_delta × horizon multiplier`
    pub total_change: f64,
    /// Prediction at the baseline
    pub predicted_before: f64,
    /// Prediction with the feature shifted by `total_change`
    pub predicted_after: f64,
    /// Signed change in predicted key events
    pub delta_events: f64,
}

impl ScenarioImpact {
    pub fn direction(&self) -> Direction {
        if self.delta_events > 0.0 {
            Direction::Increase
        } else {
            Direction::Decrease
        }
    }

    /// Unsigned size of the change
    pub fn magnitude(&self) -> f64 {
        self.delta_events.abs()
    }
}

impl fmt::Display for ScenarioImpact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Changing {} by {} per day over a {} ({} total) is predicted to {} key events by {:.2}",
            self.scenario.feature,
            self.scenario.daily_delta,
            self.scenario.horizon,
            self.total_change,
            self.direction(),
            self.magnitude()
        )
    }
}

/// Parse a scenario from user input and evaluate it
///
/// An unknown feature or horizon is reported before anything is computed.
pub fn simulate(
    model: &FittedModel,
    baseline: &FeatureRow,
    feature: &str,
    daily_delta: f64,
    horizon: &str,
) -> Result<ScenarioImpact> {
    Scenario::parse(feature, daily_delta, horizon)?.evaluate(model, baseline)
}
