//! Ordinary least squares fitting
//!
//! The predictors and the target are centered, the centered system is solved
//! with an SVD least-squares solve, and the intercept is recovered from the
//! column means. Collinear predictors therefore get the minimum-norm
//! solution instead of a failed factorization.

use crate::data::Dataset;
use crate::error::{ImpactError, Result};
use crate::features::{Feature, FeatureRow};
use crate::metrics::{adjusted_r_squared, evaluate, r_squared, residual_sum_of_squares};
use crate::model::{CoefficientInference, FitSummary, FittedModel, HeldOutPrediction, PARAMETER_COUNT};
use crate::utils::{mean, train_test_split, validate_test_ratio};
use nalgebra::{DMatrix, DVector, SVD};
use statrs::distribution::{ContinuousCDF, StudentsT};
use tracing::{debug, info};

/// Singular values below this fraction of the largest are treated as zero
const RANK_TOLERANCE: f64 = 1e-10;

/// Plain linear model fitter with an optional held-out split
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegression {
    test_ratio: f64,
    seed: u64,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    /// Fitter that uses every observation for training
    pub fn new() -> Self {
        Self {
            test_ratio: 0.0,
            seed: 42,
        }
    }

    /// Hold out a fraction of observations for evaluation
    pub fn with_test_ratio(mut self, test_ratio: f64) -> Result<Self> {
        validate_test_ratio(test_ratio)?;
        self.test_ratio = test_ratio;
        Ok(self)
    }

    /// Seed of the shuffle that picks held-out observations
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Fraction of observations held out
    pub fn test_ratio(&self) -> f64 {
        self.test_ratio
    }

    /// Fit a dataset, scoring the held-out split when one is configured
    pub fn fit_dataset(&self, data: &Dataset) -> Result<FittedModel> {
        let (train_idx, test_idx) = train_test_split(data.len(), self.test_ratio, self.seed)?;

        if test_idx.is_empty() {
            return self.fit(data.features(), data.target());
        }

        let train = data.select(&train_idx);
        let test = data.select(&test_idx);
        debug!(train = train.len(), test = test.len(), seed = self.seed, "split dataset");

        let mut model = self.fit(train.features(), train.target())?;
        let predicted = model.predict_many(test.features());
        let holdout = evaluate(test.target(), &predicted)?;
        info!(rmse = holdout.rmse, r_squared = holdout.r_squared, "held-out evaluation");

        let predictions = test
            .target()
            .iter()
            .zip(&predicted)
            .enumerate()
            .map(|(i, (&actual, &predicted))| HeldOutPrediction {
                date: test.dates().map(|dates| dates[i]),
                actual,
                predicted,
            })
            .collect();
        model.set_holdout(holdout, predictions);

        Ok(model)
    }

    /// Fit coefficients and intercept to rows of predictors and key events
    pub fn fit(&self, features: &[FeatureRow], target: &[f64]) -> Result<FittedModel> {
        let n = target.len();
        if features.len() != n {
            return Err(ImpactError::DimensionMismatch {
                expected: features.len(),
                actual: n,
            });
        }

        if n < PARAMETER_COUNT {
            return Err(ImpactError::IllConditionedFit {
                observations: n,
                parameters: PARAMETER_COUNT,
            });
        }

        let all_finite = target.iter().all(|y| y.is_finite())
            && features.iter().all(|row| row.values().iter().all(|v| v.is_finite()));
        if !all_finite {
            return Err(ImpactError::DataError(
                "Training data contains NaN or infinite values".to_string(),
            ));
        }

        let x_means: Vec<f64> = Feature::ALL
            .iter()
            .map(|&f| features.iter().map(|row| row[f]).sum::<f64>() / n as f64)
            .collect();
        let y_mean = mean(target).unwrap_or(0.0);

        let x = DMatrix::from_fn(n, Feature::COUNT, |i, j| features[i].values()[j] - x_means[j]);
        let y = DVector::from_fn(n, |i, _| target[i] - y_mean);

        let svd = x.svd(true, true);
        let eps = svd.singular_values.max() * RANK_TOLERANCE;
        let rank = svd.rank(eps);

        let beta = svd
            .solve(&y, eps)
            .map_err(|e| ImpactError::DataError(format!("least squares solve failed: {}", e)))?;

        if beta.iter().any(|b| !b.is_finite()) {
            return Err(ImpactError::IllConditionedFit {
                observations: n,
                parameters: PARAMETER_COUNT,
            });
        }

        let coefficients: Vec<f64> = beta.iter().copied().collect();
        let intercept = y_mean
            - coefficients
                .iter()
                .zip(&x_means)
                .map(|(b, m)| b * m)
                .sum::<f64>();

        let mut model = FittedModel::from_parts(Feature::ALL.to_vec(), coefficients, intercept)?;
        let predicted = model.predict_many(features);
        let summary = summarize(&svd, rank, &model, target, &predicted);

        info!(
            observations = n,
            rank,
            r_squared = summary.r_squared,
            "fitted linear model"
        );

        model.set_summary(summary);
        Ok(model)
    }
}

fn summarize(
    svd: &SVD<f64, nalgebra::Dyn, nalgebra::Dyn>,
    rank: usize,
    model: &FittedModel,
    target: &[f64],
    predicted: &[f64],
) -> FitSummary {
    let n = target.len();
    let r2 = r_squared(target, predicted);
    let dof = n.saturating_sub(PARAMETER_COUNT);

    let residual_std_error = (dof > 0)
        .then(|| (residual_sum_of_squares(target, predicted) / dof as f64).sqrt());

    let inference = match residual_std_error {
        Some(sigma) if sigma > 0.0 && rank == Feature::COUNT => {
            coefficient_inference(svd, model, sigma, dof)
        }
        _ => None,
    };

    FitSummary {
        n_observations: n,
        r_squared: r2,
        adj_r_squared: adjusted_r_squared(r2, n, Feature::COUNT),
        residual_std_error,
        inference,
        holdout: None,
        holdout_predictions: Vec::new(),
    }
}

/// Standard errors from `(XᵀX)⁻¹ = V Σ⁻² Vᵀ` of the centered design
fn coefficient_inference(
    svd: &SVD<f64, nalgebra::Dyn, nalgebra::Dyn>,
    model: &FittedModel,
    sigma: f64,
    dof: usize,
) -> Option<CoefficientInference> {
    let v_t = svd.v_t.as_ref()?;
    let t_dist = StudentsT::new(0.0, 1.0, dof as f64).ok()?;

    let std_errors: Vec<f64> = (0..Feature::COUNT)
        .map(|j| {
            let variance: f64 = svd
                .singular_values
                .iter()
                .enumerate()
                .map(|(k, s)| v_t[(k, j)].powi(2) / s.powi(2))
                .sum();
            sigma * variance.sqrt()
        })
        .collect();

    let t_values: Vec<f64> = model
        .coefficients()
        .iter()
        .zip(&std_errors)
        .map(|((_, coef), se)| coef / se)
        .collect();

    let p_values: Vec<f64> = t_values
        .iter()
        .map(|t| 2.0 * (1.0 - t_dist.cdf(t.abs())))
        .collect();

    let all_finite = std_errors
        .iter()
        .chain(&t_values)
        .chain(&p_values)
        .all(|v| v.is_finite());

    all_finite.then_some(CoefficientInference {
        std_errors,
        t_values,
        p_values,
        degrees_of_freedom: dof,
    })
}
