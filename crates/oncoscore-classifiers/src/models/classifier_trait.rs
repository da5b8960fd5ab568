use std::any::Any;

use crate::error::{ClassifierError, Result};
use crate::math::Array2;

/// Contract shared by the four binary classifiers.
///
/// A model is either untrained or trained. `fit` is the only transition to
/// trained and fails with `AlreadyTrained` on a trained model; `reset`
/// discards the learned state and keeps the hyper-parameters.
pub trait ClassifierModel: Send + Sync {
    /// Fit the model. `y` holds binary labels (1 cancerous, 0 non-cancerous).
    fn fit(&mut self, x: &Array2<f64>, y: &[i32]) -> Result<()>;

    /// Predict a discrete label for every row of `x`.
    fn predict(&self, x: &Array2<f64>) -> Result<Vec<i32>>;

    /// Predict the label of a single feature vector.
    fn predict_single(&self, sample: &[f64]) -> Result<i32>;

    /// Probability of class 1 in [0, 1]. Models without a probabilistic
    /// output report 1.0 or 0.0 from their discrete prediction.
    fn risk_score(&self, sample: &[f64]) -> Result<f64>;

    /// Risk scores for every row of `x`. Fails with `NotTrained` before
    /// `fit`, even for an empty batch.
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Vec<f64>> {
        if !self.is_trained() {
            return Err(ClassifierError::NotTrained);
        }
        x.rows().map(|row| self.risk_score(row)).collect()
    }

    /// Return to the untrained state.
    fn reset(&mut self);

    fn is_trained(&self) -> bool;

    /// Human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }

    /// Concrete model access for model-specific inspection (e.g. the tree).
    fn as_any(&self) -> &dyn Any;
}
