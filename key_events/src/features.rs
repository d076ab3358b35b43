//! Predictor columns and the fixed-width rows built from them

use crate::error::{ImpactError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// Name of the target column
pub const TARGET_COLUMN: &str = "Key events";

/// Name of the optional date index column
pub const DATE_COLUMN: &str = "Date";

/// One of the four traffic metrics used to explain key events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    #[serde(rename = "Total users")]
    TotalUsers,
    #[serde(rename = "New users")]
    NewUsers,
    #[serde(rename = "Sessions")]
    Sessions,
    #[serde(rename = "Bounce rate")]
    BounceRate,
}

impl Feature {
    /// All predictors, in column order
    pub const ALL: [Feature; 4] = [
        Feature::TotalUsers,
        Feature::NewUsers,
        Feature::Sessions,
        Feature::BounceRate,
    ];

    /// Number of predictors
    pub const COUNT: usize = Self::ALL.len();

    /// The CSV column name of this feature
    pub fn column_name(self) -> &'static str {
        match self {
            Feature::TotalUsers => "Total users",
            Feature::NewUsers => "New users",
            Feature::Sessions => "Sessions",
            Feature::BounceRate => "Bounce rate",
        }
    }

    /// Position of this feature within a [`FeatureRow`]
    pub fn index(self) -> usize {
        match self {
            Feature::TotalUsers => 0,
            Feature::NewUsers => 1,
            Feature::Sessions => 2,
            Feature::BounceRate => 3,
        }
    }

    /// Column names of all predictors
    pub fn column_names() -> [&'static str; 4] {
        Self::ALL.map(Feature::column_name)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.column_name())
    }
}

impl FromStr for Feature {
    type Err = ImpactError;

    /// Accepts the column name in any case, with `_` or `-` in place of spaces.
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| if c == '_' || c == '-' { ' ' } else { c })
            .collect::<String>()
            .to_lowercase();

        Feature::ALL
            .into_iter()
            .find(|feature| feature.column_name().to_lowercase() == normalized)
            .ok_or_else(|| ImpactError::UnknownFeature(s.to_string()))
    }
}

/// One observation of the four predictors
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureRow([f64; Feature::COUNT]);

impl FeatureRow {
    /// Create a row from values given in [`Feature::ALL`] order
    pub fn new(values: [f64; Feature::COUNT]) -> Self {
        Self(values)
    }

    /// Values in [`Feature::ALL`] order
    pub fn values(&self) -> &[f64; Feature::COUNT] {
        &self.0
    }

    /// Copy of this row with one feature shifted by `amount`
    pub fn shifted(&self, feature: Feature, amount: f64) -> Self {
        let mut row = *self;
        row[feature] += amount;
        row
    }

    /// Pairs of (feature, value)
    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL.into_iter().zip(self.0.iter().copied())
    }
}

impl Index<Feature> for FeatureRow {
    type Output = f64;

    fn index(&self, feature: Feature) -> &f64 {
        &self.0[feature.index()]
    }
}

impl IndexMut<Feature> for FeatureRow {
    fn index_mut(&mut self, feature: Feature) -> &mut f64 {
        &mut self.0[feature.index()]
    }
}
