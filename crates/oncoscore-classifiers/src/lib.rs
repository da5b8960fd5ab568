//! oncoscore-classifiers: from-scratch binary classifiers for cancer risk
//! prediction from genetic mutation scores.
//!
//! The kernel is four classifiers behind the `ClassifierModel` trait
//! (decision tree, logistic regression, k-nearest neighbors and Gaussian
//! naive Bayes), a scalar `Preprocessor` and the evaluation metrics. Around
//! it sit the genes CSV reader, the `DiagnosisSystem` controller and an HTML
//! report.
pub mod config;
pub mod data_handling;
pub mod diagnosis;
pub mod error;
pub mod io;
pub mod math;
pub mod metrics;
pub mod models;
pub mod preprocessing;
pub mod report;

pub use error::{ClassifierError, Result};
