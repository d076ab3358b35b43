//! Utility functions for the key_events crate

use crate::error::{ImpactError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Split row positions into shuffled training and test sets
///
/// The test set holds `ceil(n * test_ratio)` rows. A ratio of zero keeps every
/// row for training, in the original order. The same seed always yields the
/// same split.
pub fn train_test_split(n: usize, test_ratio: f64, seed: u64) -> Result<(Vec<usize>, Vec<usize>)> {
    validate_test_ratio(test_ratio)?;

    let mut indices: Vec<usize> = (0..n).collect();
    if test_ratio == 0.0 || n == 0 {
        return Ok((indices, Vec::new()));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test_size = (n as f64 * test_ratio).ceil() as usize;
    let train = indices.split_off(test_size);

    Ok((train, indices))
}

/// Check that a held-out fraction lies in `[0, 1)`
pub fn validate_test_ratio(test_ratio: f64) -> Result<()> {
    if !(0.0..1.0).contains(&test_ratio) {
        return Err(ImpactError::InvalidParameter(format!(
            "test ratio must be in [0, 1), got {}",
            test_ratio
        )));
    }
    Ok(())
}

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
