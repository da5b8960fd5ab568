//! Scalar feature preprocessing.
//!
//! `Preprocessor` fits mean, population standard deviation, min and max over
//! a reference sample and then standardizes or min-max scales new values with
//! those statistics. It operates on plain slices so it can be applied to a
//! single feature column of any matrix.

use crate::error::{ClassifierError, Result};

/// Statistics captured by [`Preprocessor::fit`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScalarStats {
    pub mean: f64,
    /// Population standard deviation (divisor `n`).
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// Standard / min-max scaler over one scalar feature.
#[derive(Clone, Debug, Default)]
pub struct Preprocessor {
    stats: Option<ScalarStats>,
}

impl Preprocessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit the statistics over `data`. Refitting overwrites previous values.
    pub fn fit(&mut self, data: &[f64]) -> Result<()> {
        if data.is_empty() {
            return Err(ClassifierError::invalid(
                "Cannot fit preprocessor on empty data",
            ));
        }

        let n = data.len() as f64;
        let mean = data.iter().sum::<f64>() / n;
        let variance = data.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
        let min = data.iter().copied().fold(f64::INFINITY, f64::min);
        let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        self.stats = Some(ScalarStats {
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
        });
        log::debug!(
            "Fitted preprocessor on {} values: mean={:.4}, std={:.4}",
            data.len(),
            mean,
            variance.sqrt()
        );
        Ok(())
    }

    /// `(x - mean) / std_dev` element-wise, or all zeros for a constant sample.
    pub fn standardize(&self, data: &[f64]) -> Result<Vec<f64>> {
        let stats = self.stats.ok_or(ClassifierError::NotFitted)?;
        if stats.std_dev == 0.0 {
            return Ok(vec![0.0; data.len()]);
        }
        Ok(data
            .iter()
            .map(|v| (v - stats.mean) / stats.std_dev)
            .collect())
    }

    /// Alias of [`Preprocessor::standardize`].
    pub fn normalize(&self, data: &[f64]) -> Result<Vec<f64>> {
        self.standardize(data)
    }

    /// `(x - min) / (max - min)` element-wise, or a constant 0.5 when `max == min`.
    pub fn min_max_scale(&self, data: &[f64]) -> Result<Vec<f64>> {
        let stats = self.stats.ok_or(ClassifierError::NotFitted)?;
        if stats.max == stats.min {
            return Ok(vec![0.5; data.len()]);
        }
        let range = stats.max - stats.min;
        Ok(data.iter().map(|v| (v - stats.min) / range).collect())
    }

    /// Fit on `data` and return it standardized.
    pub fn fit_transform(&mut self, data: &[f64]) -> Result<Vec<f64>> {
        self.fit(data)?;
        self.standardize(data)
    }

    pub fn reset(&mut self) {
        self.stats = None;
    }

    pub fn is_fitted(&self) -> bool {
        self.stats.is_some()
    }

    pub fn stats(&self) -> Option<&ScalarStats> {
        self.stats.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_max_scale_spans_unit_interval() {
        let mut pre = Preprocessor::new();
        pre.fit(&[2.0, 4.0, 6.0]).unwrap();
        let scaled = pre.min_max_scale(&[2.0, 4.0, 6.0, 8.0]).unwrap();
        assert_eq!(scaled, vec![0.0, 0.5, 1.0, 1.5]);
    }

    #[test]
    fn test_constant_sample_fallbacks() {
        let mut pre = Preprocessor::new();
        pre.fit(&[3.0, 3.0, 3.0]).unwrap();
        assert_eq!(pre.standardize(&[1.0, 3.0]).unwrap(), vec![0.0, 0.0]);
        assert_eq!(pre.min_max_scale(&[1.0, 3.0]).unwrap(), vec![0.5, 0.5]);
    }
}
