use thiserror::Error;

use crate::math::ShapeError;

/// Result alias used throughout the classifier kernel.
pub type Result<T> = std::result::Result<T, ClassifierError>;

/// Failures raised by the classifiers, the preprocessor and the metrics.
///
/// Every variant is a usage error detected eagerly at the call site.
/// Degenerate numeric cases (zero variance, empty metric denominators) are
/// not errors and have documented fallback values instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Model not trained. Call fit() first.")]
    NotTrained,

    #[error("Preprocessor not fitted. Call fit() first.")]
    NotFitted,

    #[error("Model already trained. Call reset() before fitting again.")]
    AlreadyTrained,
}

impl ClassifierError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ClassifierError::InvalidInput(msg.into())
    }
}

impl From<ShapeError> for ClassifierError {
    fn from(err: ShapeError) -> Self {
        ClassifierError::InvalidInput(err.to_string())
    }
}
