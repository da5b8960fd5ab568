//! Gaussian naive Bayes classifier.
//!
//! Each feature is modelled as an independent normal distribution per class.
//! Scores are accumulated in log space and turned into probabilities with a
//! max-shifted softmax.
use std::any::Any;
use std::collections::BTreeMap;

use statrs::distribution::{Continuous, Normal};

use crate::error::{ClassifierError, Result};
use crate::math::Array2;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::utils::{check_feature_count, validate_training_data};

/// Added to priors and densities before taking logarithms.
const LOG_SMOOTHING: f64 = 1e-10;
/// Standard deviations below this are replaced by 1.0.
const MIN_STD: f64 = 1e-10;

/// Per-class parameters learned by `fit`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassStatistics {
    pub prior: f64,
    pub mean: Vec<f64>,
    pub std_dev: Vec<f64>,
    densities: Vec<Normal>,
}

impl ClassStatistics {
    fn log_score(&self, features: &[f64]) -> f64 {
        let likelihood: f64 = self
            .densities
            .iter()
            .zip(features.iter())
            .map(|(density, &x)| (density.pdf(x) + LOG_SMOOTHING).ln())
            .sum();
        (self.prior + LOG_SMOOTHING).ln() + likelihood
    }
}

#[derive(Debug, Clone)]
pub struct NaiveBayesClassifier {
    /// Keyed by label; iteration order is ascending label order.
    stats: Option<BTreeMap<i32, ClassStatistics>>,
    n_features: usize,
}

impl Default for NaiveBayesClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl NaiveBayesClassifier {
    pub fn new() -> Self {
        NaiveBayesClassifier {
            stats: None,
            n_features: 0,
        }
    }

    fn fitted(&self) -> Result<&BTreeMap<i32, ClassStatistics>> {
        self.stats.as_ref().ok_or(ClassifierError::NotTrained)
    }

    /// Observed classes in ascending order.
    pub fn classes(&self) -> Result<Vec<i32>> {
        Ok(self.fitted()?.keys().copied().collect())
    }

    pub fn class_statistics(&self, class: i32) -> Result<&ClassStatistics> {
        self.fitted()?
            .get(&class)
            .ok_or_else(|| ClassifierError::invalid(format!("Class {} was not observed", class)))
    }

    pub fn class_prior(&self, class: i32) -> Result<f64> {
        Ok(self.class_statistics(class)?.prior)
    }

    /// Unnormalized log posterior of `class`: log prior plus the sum of the
    /// per-feature log densities.
    pub fn class_log_score(&self, features: &[f64], class: i32) -> Result<f64> {
        check_feature_count(self.n_features, features.len())?;
        Ok(self.class_statistics(class)?.log_score(features))
    }

    /// Softmax-normalized probability of every observed class, in class order.
    pub fn class_probabilities(&self, features: &[f64]) -> Result<Vec<(i32, f64)>> {
        let stats = self.fitted()?;
        check_feature_count(self.n_features, features.len())?;

        let scores: Vec<(i32, f64)> = stats
            .iter()
            .map(|(&class, s)| (class, s.log_score(features)))
            .collect();
        let max_score = scores
            .iter()
            .map(|&(_, score)| score)
            .fold(f64::MIN, f64::max);

        let exps: Vec<(i32, f64)> = scores
            .into_iter()
            .map(|(class, score)| (class, (score - max_score).exp()))
            .collect();
        let sum: f64 = exps.iter().map(|&(_, e)| e).sum();

        Ok(exps.into_iter().map(|(class, e)| (class, e / sum)).collect())
    }

    /// Probability of class 1, or 0.0 when class 1 was never observed.
    pub fn predict_proba_single(&self, features: &[f64]) -> Result<f64> {
        Ok(self
            .class_probabilities(features)?
            .into_iter()
            .find(|&(class, _)| class == 1)
            .map(|(_, p)| p)
            .unwrap_or(0.0))
    }
}

/// Prior, mean and sample standard deviation of every class in `y`.
fn class_statistics(x: &Array2<f64>, y: &[i32]) -> Result<BTreeMap<i32, ClassStatistics>> {
    let n = y.len() as f64;
    let n_features = x.ncols();

    let mut members: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
    for (i, &label) in y.iter().enumerate() {
        members.entry(label).or_default().push(i);
    }

    let mut stats = BTreeMap::new();
    for (class, rows) in members {
        let count = rows.len();

        let mut mean = vec![0.0; n_features];
        for &i in &rows {
            for (m, &value) in mean.iter_mut().zip(x.row_slice(i)) {
                *m += value;
            }
        }
        for m in mean.iter_mut() {
            *m /= count as f64;
        }

        let mut std_dev = vec![1.0; n_features];
        if count > 1 {
            let mut variance = vec![0.0; n_features];
            for &i in &rows {
                for ((v, &value), &m) in variance.iter_mut().zip(x.row_slice(i)).zip(&mean) {
                    *v += (value - m) * (value - m);
                }
            }
            for (s, v) in std_dev.iter_mut().zip(variance) {
                let sd = (v / (count - 1) as f64).sqrt();
                *s = if sd < MIN_STD { 1.0 } else { sd };
            }
        }

        let densities = mean
            .iter()
            .zip(&std_dev)
            .map(|(&m, &s)| Normal::new(m, s).map_err(|e| ClassifierError::invalid(e.to_string())))
            .collect::<Result<Vec<_>>>()?;

        stats.insert(
            class,
            ClassStatistics {
                prior: count as f64 / n,
                mean,
                std_dev,
                densities,
            },
        );
    }

    Ok(stats)
}

impl ClassifierModel for NaiveBayesClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &[i32]) -> Result<()> {
        if self.stats.is_some() {
            return Err(ClassifierError::AlreadyTrained);
        }
        validate_training_data(x, y)?;

        let stats = class_statistics(x, y)?;
        for (class, s) in &stats {
            log::debug!(
                "Naive Bayes class {}: prior={:.4}, mean={:?}, std={:?}",
                class,
                s.prior,
                s.mean,
                s.std_dev
            );
        }
        self.n_features = x.ncols();
        self.stats = Some(stats);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Vec<i32>> {
        self.fitted()?;
        x.rows().map(|row| self.predict_single(row)).collect()
    }

    fn predict_single(&self, sample: &[f64]) -> Result<i32> {
        let stats = self.fitted()?;
        check_feature_count(self.n_features, sample.len())?;

        let mut best: Option<(i32, f64)> = None;
        for (&class, s) in stats {
            let score = s.log_score(sample);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((class, score)),
            }
        }
        best.map(|(class, _)| class)
            .ok_or(ClassifierError::NotTrained)
    }

    fn risk_score(&self, sample: &[f64]) -> Result<f64> {
        self.predict_proba_single(sample)
    }

    fn reset(&mut self) {
        self.stats = None;
        self.n_features = 0;
    }

    fn is_trained(&self) -> bool {
        self.stats.is_some()
    }

    fn name(&self) -> &str {
        "Naive Bayes"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_statistics_use_sample_variance() {
        let x = Array2::from_rows(&[[1.0], [3.0], [10.0], [14.0]]).unwrap();
        let y = vec![0, 0, 1, 1];
        let mut nb = NaiveBayesClassifier::new();
        nb.fit(&x, &y).unwrap();

        let zero = nb.class_statistics(0).unwrap();
        assert_eq!(zero.prior, 0.5);
        assert_eq!(zero.mean, vec![2.0]);
        // ((1-2)^2 + (3-2)^2) / (2 - 1) = 2
        assert!((zero.std_dev[0] - 2f64.sqrt()).abs() < 1e-12);

        let one = nb.class_statistics(1).unwrap();
        assert_eq!(one.mean, vec![12.0]);
    }

    #[test]
    fn test_singleton_and_constant_classes_get_unit_std() {
        let x = Array2::from_rows(&[[5.0], [2.0], [2.0]]).unwrap();
        let y = vec![1, 0, 0];
        let mut nb = NaiveBayesClassifier::new();
        nb.fit(&x, &y).unwrap();
        assert_eq!(nb.class_statistics(1).unwrap().std_dev, vec![1.0]);
        assert_eq!(nb.class_statistics(0).unwrap().std_dev, vec![1.0]);
    }

    #[test]
    fn test_missing_positive_class_gives_zero_probability() {
        let x = Array2::from_rows(&[[1.0], [2.0]]).unwrap();
        let y = vec![0, 0];
        let mut nb = NaiveBayesClassifier::new();
        nb.fit(&x, &y).unwrap();
        assert_eq!(nb.predict_proba_single(&[1.5]).unwrap(), 0.0);
        assert_eq!(nb.predict_single(&[1.5]).unwrap(), 0);
    }
}
