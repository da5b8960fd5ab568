use crate::config::ModelType;
use crate::error::Result;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::{DecisionTreeClassifier, KNNClassifier, LogisticRegression, NaiveBayesClassifier};

/// Build a boxed, untrained classifier from a `ModelType`.
/// Invalid hyper-parameters (zero k, zero depth, ...) are rejected here.
pub fn build_model(model_type: ModelType) -> Result<Box<dyn ClassifierModel>> {
    let model: Box<dyn ClassifierModel> = match model_type {
        ModelType::LogisticRegression {
            learning_rate,
            max_iterations,
            tolerance,
        } => Box::new(
            LogisticRegression::new(learning_rate, max_iterations)?.with_tolerance(tolerance)?,
        ),
        ModelType::KNN { k } => Box::new(KNNClassifier::new(k)?),
        ModelType::DecisionTree {
            max_depth,
            min_samples_split,
        } => Box::new(DecisionTreeClassifier::new(max_depth, min_samples_split)?),
        ModelType::NaiveBayes => Box::new(NaiveBayesClassifier::new()),
    };
    Ok(model)
}
