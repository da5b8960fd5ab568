//! Binary logistic regression trained with full-batch gradient descent.
use std::any::Any;

use crate::error::{ClassifierError, Result};
use crate::math::Array2;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::utils::{check_feature_count, validate_training_data};

/// `z` is clamped to this magnitude before exponentiation.
const SIGMOID_CLAMP: f64 = 500.0;
/// Guards `ln(0)` in the log-loss.
const LOSS_EPSILON: f64 = 1e-15;
/// Iterations between two diagnostic loss evaluations.
const LOSS_CHECK_INTERVAL: usize = 100;

/// Logistic function with the argument clamped to `[-500, 500]`.
pub fn sigmoid(z: f64) -> f64 {
    let z = z.clamp(-SIGMOID_CLAMP, SIGMOID_CLAMP);
    1.0 / (1.0 + (-z).exp())
}

#[derive(Debug, Clone, PartialEq)]
struct LinearModel {
    weights: Vec<f64>,
    bias: f64,
}

impl LinearModel {
    fn zeros(n_features: usize) -> Self {
        LinearModel {
            weights: vec![0.0; n_features],
            bias: 0.0,
        }
    }

    fn decision_function(&self, sample: &[f64]) -> f64 {
        self.bias
            + self
                .weights
                .iter()
                .zip(sample.iter())
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }

    fn probability(&self, sample: &[f64]) -> f64 {
        sigmoid(self.decision_function(sample))
    }

    fn log_loss(&self, x: &Array2<f64>, y: &[i32]) -> f64 {
        let total: f64 = x
            .rows()
            .zip(y.iter())
            .map(|(row, &label)| {
                let p = self.probability(row);
                let label = label as f64;
                -(label * (p + LOSS_EPSILON).ln() + (1.0 - label) * (1.0 - p + LOSS_EPSILON).ln())
            })
            .sum();
        total / x.nrows() as f64
    }
}

/// Logistic regression classifier.
///
/// Training always runs `max_iterations` gradient steps unless a
/// `tolerance` is set, in which case it stops once the loss measured every
/// 100 iterations changes by less than the tolerance.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    learning_rate: f64,
    max_iterations: usize,
    tolerance: Option<f64>,
    model: Option<LinearModel>,
    iterations_run: usize,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        LogisticRegression {
            learning_rate: 0.01,
            max_iterations: 1000,
            tolerance: None,
            model: None,
            iterations_run: 0,
        }
    }
}

impl LogisticRegression {
    pub fn new(learning_rate: f64, max_iterations: usize) -> Result<Self> {
        let mut model = LogisticRegression::default();
        model.set_learning_rate(learning_rate)?;
        model.set_max_iterations(max_iterations)?;
        Ok(model)
    }

    /// Enable early stopping on the diagnostic loss.
    pub fn with_tolerance(mut self, tolerance: Option<f64>) -> Result<Self> {
        if let Some(tol) = tolerance {
            if !(tol.is_finite() && tol > 0.0) {
                return Err(ClassifierError::invalid("tolerance must be positive"));
            }
        }
        self.tolerance = tolerance;
        Ok(self)
    }

    pub fn set_learning_rate(&mut self, learning_rate: f64) -> Result<()> {
        if !(learning_rate.is_finite() && learning_rate > 0.0) {
            return Err(ClassifierError::invalid("learning_rate must be positive"));
        }
        self.learning_rate = learning_rate;
        Ok(())
    }

    pub fn set_max_iterations(&mut self, max_iterations: usize) -> Result<()> {
        if max_iterations == 0 {
            return Err(ClassifierError::invalid("max_iterations must be positive"));
        }
        self.max_iterations = max_iterations;
        Ok(())
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn tolerance(&self) -> Option<f64> {
        self.tolerance
    }

    fn fitted(&self) -> Result<&LinearModel> {
        self.model.as_ref().ok_or(ClassifierError::NotTrained)
    }

    pub fn weights(&self) -> Result<&[f64]> {
        Ok(self.fitted()?.weights.as_slice())
    }

    pub fn bias(&self) -> Result<f64> {
        Ok(self.fitted()?.bias)
    }

    /// Gradient steps performed by the last `fit`.
    pub fn iterations_run(&self) -> usize {
        self.iterations_run
    }

    /// Probability of class 1 for one sample.
    pub fn predict_proba_single(&self, features: &[f64]) -> Result<f64> {
        let model = self.fitted()?;
        check_feature_count(model.weights.len(), features.len())?;
        Ok(model.probability(features))
    }

    /// Mean log-loss of the fitted model over a labelled set.
    pub fn log_loss(&self, x: &Array2<f64>, y: &[i32]) -> Result<f64> {
        let model = self.fitted()?;
        validate_training_data(x, y)?;
        check_feature_count(model.weights.len(), x.ncols())?;
        Ok(model.log_loss(x, y))
    }

    fn gradient_descent(&mut self, x: &Array2<f64>, y: &[i32]) -> LinearModel {
        let n = x.nrows() as f64;
        let n_features = x.ncols();
        let mut model = LinearModel::zeros(n_features);
        let mut previous_loss: Option<f64> = None;
        self.iterations_run = 0;

        for iter in 0..self.max_iterations {
            let mut weight_gradients = vec![0.0; n_features];
            let mut bias_gradient = 0.0;

            for (row, &label) in x.rows().zip(y.iter()) {
                let error = model.probability(row) - label as f64;
                for (grad, &value) in weight_gradients.iter_mut().zip(row.iter()) {
                    *grad += error * value;
                }
                bias_gradient += error;
            }

            for (weight, grad) in model.weights.iter_mut().zip(weight_gradients.iter()) {
                *weight -= self.learning_rate * grad / n;
            }
            model.bias -= self.learning_rate * bias_gradient / n;
            self.iterations_run = iter + 1;

            if (iter + 1) % LOSS_CHECK_INTERVAL == 0 {
                let loss = model.log_loss(x, y);
                log::debug!("Iteration {}, Loss: {:.6}", iter + 1, loss);

                if let (Some(tol), Some(prev)) = (self.tolerance, previous_loss) {
                    if (prev - loss).abs() < tol {
                        log::debug!(
                            "Loss change below tolerance {}; stopping after {} iterations",
                            tol,
                            iter + 1
                        );
                        break;
                    }
                }
                previous_loss = Some(loss);
            }
        }

        model
    }
}

impl ClassifierModel for LogisticRegression {
    fn fit(&mut self, x: &Array2<f64>, y: &[i32]) -> Result<()> {
        if self.model.is_some() {
            return Err(ClassifierError::AlreadyTrained);
        }
        validate_training_data(x, y)?;

        let model = self.gradient_descent(x, y);
        log::debug!(
            "Logistic regression fitted on {} samples in {} iterations (bias={:.4})",
            x.nrows(),
            self.iterations_run,
            model.bias
        );
        self.model = Some(model);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Vec<i32>> {
        self.fitted()?;
        x.rows().map(|row| self.predict_single(row)).collect()
    }

    fn predict_single(&self, sample: &[f64]) -> Result<i32> {
        let prob = self.predict_proba_single(sample)?;
        Ok(if prob >= 0.5 { 1 } else { 0 })
    }

    fn risk_score(&self, sample: &[f64]) -> Result<f64> {
        self.predict_proba_single(sample)
    }

    fn reset(&mut self) {
        self.model = None;
        self.iterations_run = 0;
    }

    fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    fn name(&self) -> &str {
        "Logistic Regression"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
