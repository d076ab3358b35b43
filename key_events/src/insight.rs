//! Narration of the strongest drivers in a set of coefficients

use crate::model::FittedModel;
use std::fmt;

/// Features with the largest and smallest coefficients
#[derive(Debug, Clone, PartialEq)]
pub struct Drivers<K> {
    /// Feature with the maximum coefficient, and that coefficient
    pub strongest_positive: (K, f64),
    /// Feature with the minimum coefficient, and that coefficient
    pub strongest_negative: (K, f64),
}

/// Pick the maximum and minimum coefficients
///
/// Comparisons are strict, so on ties the first pair encountered wins.
/// Returns `None` for empty input.
pub fn strongest_drivers<K, I>(coefficients: I) -> Option<Drivers<K>>
where
    K: Clone,
    I: IntoIterator<Item = (K, f64)>,
{
    let mut iter = coefficients.into_iter();
    let first = iter.next()?;

    let mut max = first.clone();
    let mut min = first;
    for (key, coef) in iter {
        if coef > max.1 {
            max = (key.clone(), coef);
        }
        if coef < min.1 {
            min = (key, coef);
        }
    }

    Some(Drivers {
        strongest_positive: max,
        strongest_negative: min,
    })
}

impl<K: fmt::Display> Drivers<K> {
    /// Plain-language summary for a marketer
    pub fn narrate(&self) -> Vec<String> {
        let (pos, pos_coef) = &self.strongest_positive;
        let (neg, neg_coef) = &self.strongest_negative;
        vec![
            format!(
                "{} is the strongest positive driver: each additional unit adds {:.4} key events.",
                pos, pos_coef
            ),
            format!(
                "{} is the strongest negative driver: each additional unit changes key events by {:.4}.",
                neg, neg_coef
            ),
        ]
    }
}

impl FittedModel {
    /// Strongest drivers of this model, in its feature order
    pub fn insights(&self) -> Option<Drivers<crate::features::Feature>> {
        strongest_drivers(self.coefficients())
    }
}
