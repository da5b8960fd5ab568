//! K-Nearest Neighbors classifier
//!
//! A lazy learner: `fit` keeps the training set verbatim and every query
//! scans all stored samples under Euclidean distance.
use std::any::Any;

use crate::error::{ClassifierError, Result};
use crate::math::Array2;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::utils::{check_feature_count, majority_class, validate_training_data};

/// Euclidean distance between two equal-length vectors.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(ClassifierError::invalid(format!(
            "Feature vectors must have the same size ({} vs {})",
            a.len(),
            b.len()
        )));
    }
    Ok(a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt())
}

/// A training sample found near a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub distance: f64,
    pub label: i32,
    /// Row of the sample in the training matrix.
    pub index: usize,
}

#[derive(Debug, Clone)]
struct InstanceStore {
    x: Array2<f64>,
    y: Vec<i32>,
}

/// K-Nearest Neighbors classifier with uniform majority voting.
#[derive(Debug, Clone)]
pub struct KNNClassifier {
    k: usize,
    store: Option<InstanceStore>,
}

impl Default for KNNClassifier {
    fn default() -> Self {
        KNNClassifier { k: 5, store: None }
    }
}

impl KNNClassifier {
    pub fn new(k: usize) -> Result<Self> {
        let mut classifier = KNNClassifier::default();
        classifier.set_k(k)?;
        Ok(classifier)
    }

    pub fn set_k(&mut self, k: usize) -> Result<()> {
        if k == 0 {
            return Err(ClassifierError::invalid("K must be positive"));
        }
        self.k = k;
        Ok(())
    }

    pub fn k(&self) -> usize {
        self.k
    }

    fn fitted(&self) -> Result<&InstanceStore> {
        self.store.as_ref().ok_or(ClassifierError::NotTrained)
    }

    /// The `min(k, n_train)` closest training samples, nearest first. Equal
    /// distances keep training order.
    pub fn k_nearest(&self, sample: &[f64]) -> Result<Vec<Neighbor>> {
        let store = self.fitted()?;
        check_feature_count(store.x.ncols(), sample.len())?;

        let mut neighbors = store
            .x
            .rows()
            .zip(store.y.iter())
            .enumerate()
            .map(|(index, (row, &label))| {
                Ok(Neighbor {
                    distance: euclidean_distance(sample, row)?,
                    label,
                    index,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        // `sort_by` is stable, so ties stay in insertion order.
        neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        neighbors.truncate(self.k.min(neighbors.len()));
        Ok(neighbors)
    }

    /// Fraction of the nearest neighbors labelled 1.
    pub fn predict_proba_single(&self, sample: &[f64]) -> Result<f64> {
        let neighbors = self.k_nearest(sample)?;
        let positives = neighbors.iter().filter(|n| n.label == 1).count();
        Ok(positives as f64 / neighbors.len() as f64)
    }
}

impl ClassifierModel for KNNClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &[i32]) -> Result<()> {
        if self.store.is_some() {
            return Err(ClassifierError::AlreadyTrained);
        }
        validate_training_data(x, y)?;

        self.store = Some(InstanceStore {
            x: x.clone(),
            y: y.to_vec(),
        });
        log::debug!("KNN stored {} training samples (k={})", x.nrows(), self.k);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Vec<i32>> {
        self.fitted()?;
        x.rows().map(|row| self.predict_single(row)).collect()
    }

    fn predict_single(&self, sample: &[f64]) -> Result<i32> {
        let neighbors = self.k_nearest(sample)?;
        Ok(majority_class(neighbors.iter().map(|n| n.label)))
    }

    fn risk_score(&self, sample: &[f64]) -> Result<f64> {
        self.predict_proba_single(sample)
    }

    fn reset(&mut self) {
        self.store = None;
    }

    fn is_trained(&self) -> bool {
        self.store.is_some()
    }

    fn name(&self) -> &str {
        "K-Nearest Neighbors"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean_distance() {
        assert_eq!(euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]).unwrap(), 5.0);
        assert!(euclidean_distance(&[0.0], &[3.0, 4.0]).is_err());
    }

    #[test]
    fn test_k_zero_rejected() {
        assert!(KNNClassifier::new(0).is_err());
        let mut knn = KNNClassifier::default();
        assert!(knn.set_k(0).is_err());
        assert_eq!(knn.k(), 5);
    }

    #[test]
    fn test_distance_ties_keep_training_order() {
        let x = Array2::from_rows(&[[1.0], [-1.0], [5.0]]).unwrap();
        let y = vec![1, 0, 0];
        let mut knn = KNNClassifier::new(2).unwrap();
        knn.fit(&x, &y).unwrap();

        let neighbors = knn.k_nearest(&[0.0]).unwrap();
        assert_eq!(neighbors.len(), 2);
        assert_eq!(neighbors[0].index, 0);
        assert_eq!(neighbors[1].index, 1);
        // One vote each: the smaller label wins.
        assert_eq!(knn.predict_single(&[0.0]).unwrap(), 0);
        assert_eq!(knn.predict_proba_single(&[0.0]).unwrap(), 0.5);
    }

    #[test]
    fn test_k_larger_than_training_set_uses_all_samples() {
        let x = Array2::from_rows(&[[0.0], [1.0], [2.0]]).unwrap();
        let y = vec![1, 1, 0];
        let knn = {
            let mut knn = KNNClassifier::new(10).unwrap();
            knn.fit(&x, &y).unwrap();
            knn
        };
        assert_eq!(knn.k_nearest(&[0.0]).unwrap().len(), 3);
        assert!((knn.predict_proba_single(&[0.0]).unwrap() - 2.0 / 3.0).abs() < 1e-12);
    }
}
