//! Input validation and voting helpers shared by the classifiers.
use std::collections::BTreeMap;

use crate::error::{ClassifierError, Result};
use crate::math::Array2;

/// Check a training set: non-empty, aligned, finite features, binary labels.
pub(crate) fn validate_training_data(x: &Array2<f64>, y: &[i32]) -> Result<()> {
    if x.is_empty() || y.is_empty() {
        return Err(ClassifierError::invalid("Training data is empty"));
    }
    if x.nrows() != y.len() {
        return Err(ClassifierError::invalid(format!(
            "X and y must have the same size (X has {} rows, y has {} labels)",
            x.nrows(),
            y.len()
        )));
    }
    if x.ncols() == 0 {
        return Err(ClassifierError::invalid(
            "Samples must have at least one feature",
        ));
    }
    if let Some(pos) = x.as_slice().iter().position(|v| !v.is_finite()) {
        return Err(ClassifierError::invalid(format!(
            "Non-finite feature value at row {}",
            pos / x.ncols()
        )));
    }
    validate_binary_labels(y)
}

/// Labels must be 0 or 1.
pub(crate) fn validate_binary_labels(y: &[i32]) -> Result<()> {
    match y.iter().position(|&label| label != 0 && label != 1) {
        Some(idx) => Err(ClassifierError::invalid(format!(
            "Labels must be 0 or 1, found {} at index {}",
            y[idx], idx
        ))),
        None => Ok(()),
    }
}

pub(crate) fn check_feature_count(expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(ClassifierError::invalid(format!(
            "Feature size mismatch: model was fitted with {} features, got {}",
            expected, found
        )));
    }
    Ok(())
}

/// Most frequent label. Count ties resolve to the smallest label because the
/// counts are walked in ascending key order and only a strictly larger count
/// replaces the current winner. Empty input yields 0.
pub fn majority_class<I>(labels: I) -> i32
where
    I: IntoIterator<Item = i32>,
{
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }

    let mut max_count = 0;
    let mut majority = 0;
    for (&label, &count) in &counts {
        if count > max_count {
            max_count = count;
            majority = label;
        }
    }
    majority
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_majority_class_tie_goes_to_smallest_label() {
        assert_eq!(majority_class(vec![1, 0, 1, 0]), 0);
        assert_eq!(majority_class(vec![1, 1, 0]), 1);
        assert_eq!(majority_class(Vec::new()), 0);
    }

    #[test]
    fn test_validate_training_data_rejects_bad_input() {
        let x = Array2::from_rows(&[[1.0], [2.0]]).unwrap();
        assert!(validate_training_data(&x, &[0, 1]).is_ok());
        assert!(validate_training_data(&x, &[0]).is_err());
        assert!(validate_training_data(&x, &[0, 2]).is_err());

        let nan = Array2::from_rows(&[[f64::NAN], [2.0]]).unwrap();
        assert!(validate_training_data(&nan, &[0, 1]).is_err());
    }
}
