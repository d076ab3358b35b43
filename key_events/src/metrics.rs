//! Metrics for evaluating regression fits

use crate::error::{ImpactError, Result};
use crate::utils::mean;
use serde::{Deserialize, Serialize};

/// Accuracy of predicted key events against observed ones
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    /// Number of scored observations
    pub n: usize,
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Coefficient of determination
    pub r_squared: f64,
}

impl std::fmt::Display for RegressionMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "  Observations: {}", self.n)?;
        writeln!(f, "  MAE:  {:.4}", self.mae)?;
        writeln!(f, "  MSE:  {:.4}", self.mse)?;
        writeln!(f, "  RMSE: {:.4}", self.rmse)?;
        writeln!(f, "  R²:   {:.4}", self.r_squared)?;
        Ok(())
    }
}

/// Score predictions against actual values
pub fn evaluate(actual: &[f64], predicted: &[f64]) -> Result<RegressionMetrics> {
    check_lengths(actual, predicted)?;

    let mse = mean_squared_error(actual, predicted);
    Ok(RegressionMetrics {
        n: actual.len(),
        mae: mean_absolute_error(actual, predicted),
        mse,
        rmse: mse.sqrt(),
        r_squared: r_squared(actual, predicted),
    })
}

fn check_lengths(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.is_empty() {
        return Err(ImpactError::DataError(
            "Cannot evaluate an empty set of predictions".to_string(),
        ));
    }
    if actual.len() != predicted.len() {
        return Err(ImpactError::DimensionMismatch {
            expected: actual.len(),
            actual: predicted.len(),
        });
    }
    Ok(())
}

/// Mean absolute error; zero for empty input
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> f64 {
    let errors: Vec<f64> = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .collect();
    mean(&errors).unwrap_or(0.0)
}

/// Mean squared error; zero for empty input
pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    let errors: Vec<f64> = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .collect();
    mean(&errors).unwrap_or(0.0)
}

/// Root mean squared error
pub fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    mean_squared_error(actual, predicted).sqrt()
}

/// Sum of squared residuals
pub fn residual_sum_of_squares(actual: &[f64], predicted: &[f64]) -> f64 {
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum()
}

/// Coefficient of determination, 1 - SS_res / SS_tot
///
/// A constant target yields 1.0 for a perfect fit and 0.0 otherwise.
pub fn r_squared(actual: &[f64], predicted: &[f64]) -> f64 {
    let Some(mean_actual) = mean(actual) else {
        return 0.0;
    };

    let ss_res = residual_sum_of_squares(actual, predicted);
    let ss_tot: f64 = actual.iter().map(|a| (a - mean_actual).powi(2)).sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

/// R² adjusted for the number of predictors
///
/// `None` when there are no residual degrees of freedom.
pub fn adjusted_r_squared(r_squared: f64, n: usize, predictors: usize) -> Option<f64> {
    if n <= predictors + 1 {
        return None;
    }
    let n = n as f64;
    let p = predictors as f64;
    Some(1.0 - (1.0 - r_squared) * (n - 1.0) / (n - p - 1.0))
}
