//! Binary classification metrics.
//!
//! All scores derive from a 2x2 confusion matrix with class 1 as the positive
//! class. Ratios whose denominator is zero evaluate to 0.0.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result};
use crate::models::utils::validate_binary_labels;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_positive: usize,
    pub true_negative: usize,
    pub false_positive: usize,
    pub false_negative: usize,
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

impl ConfusionMatrix {
    pub fn total(&self) -> usize {
        self.true_positive + self.true_negative + self.false_positive + self.false_negative
    }

    pub fn accuracy(&self) -> f64 {
        ratio(
            (self.true_positive + self.true_negative) as f64,
            self.total() as f64,
        )
    }

    pub fn precision(&self) -> f64 {
        ratio(
            self.true_positive as f64,
            (self.true_positive + self.false_positive) as f64,
        )
    }

    pub fn recall(&self) -> f64 {
        ratio(
            self.true_positive as f64,
            (self.true_positive + self.false_negative) as f64,
        )
    }

    /// Harmonic mean of precision and recall.
    pub fn f1_score(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        ratio(2.0 * p * r, p + r)
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>20}", "Predicted")?;
        writeln!(f, "{:>10}{:>10}{:>10}", "", "Negative", "Positive")?;
        writeln!(
            f,
            "Actual{:>5}{:>10}{:>10}",
            "Negative", self.true_negative, self.false_positive
        )?;
        write!(
            f,
            "{:>10}{:>10}{:>10}",
            "Positive", self.false_negative, self.true_positive
        )
    }
}

/// Tally predictions against ground truth. Both vectors must be equally long
/// and hold only 0/1 labels.
pub fn confusion_matrix(y_true: &[i32], y_pred: &[i32]) -> Result<ConfusionMatrix> {
    if y_true.len() != y_pred.len() {
        return Err(ClassifierError::invalid(format!(
            "y_true and y_pred must have the same size ({} vs {})",
            y_true.len(),
            y_pred.len()
        )));
    }
    validate_binary_labels(y_true)?;
    validate_binary_labels(y_pred)?;

    let mut cm = ConfusionMatrix::default();
    for (&truth, &pred) in y_true.iter().zip(y_pred.iter()) {
        match (truth, pred) {
            (1, 1) => cm.true_positive += 1,
            (0, 0) => cm.true_negative += 1,
            (0, 1) => cm.false_positive += 1,
            _ => cm.false_negative += 1,
        }
    }
    Ok(cm)
}

pub fn accuracy(y_true: &[i32], y_pred: &[i32]) -> Result<f64> {
    Ok(confusion_matrix(y_true, y_pred)?.accuracy())
}

pub fn precision(y_true: &[i32], y_pred: &[i32]) -> Result<f64> {
    Ok(confusion_matrix(y_true, y_pred)?.precision())
}

pub fn recall(y_true: &[i32], y_pred: &[i32]) -> Result<f64> {
    Ok(confusion_matrix(y_true, y_pred)?.recall())
}

pub fn f1_score(y_true: &[i32], y_pred: &[i32]) -> Result<f64> {
    Ok(confusion_matrix(y_true, y_pred)?.f1_score())
}

/// The four summary scores of one model together with its confusion matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub confusion_matrix: ConfusionMatrix,
}

impl From<ConfusionMatrix> for ClassificationReport {
    fn from(cm: ConfusionMatrix) -> Self {
        ClassificationReport {
            accuracy: cm.accuracy(),
            precision: cm.precision(),
            recall: cm.recall(),
            f1_score: cm.f1_score(),
            confusion_matrix: cm,
        }
    }
}

pub fn evaluate(y_true: &[i32], y_pred: &[i32]) -> Result<ClassificationReport> {
    confusion_matrix(y_true, y_pred).map(ClassificationReport::from)
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Evaluation Metrics ===")?;
        writeln!(
            f,
            "Accuracy:  {:.4} ({:.4}%)",
            self.accuracy,
            self.accuracy * 100.0
        )?;
        writeln!(
            f,
            "Precision: {:.4} ({:.4}%)",
            self.precision,
            self.precision * 100.0
        )?;
        writeln!(f, "Recall:    {:.4} ({:.4}%)", self.recall, self.recall * 100.0)?;
        writeln!(f, "F1-Score:  {:.4}", self.f1_score)?;
        writeln!(f)?;
        writeln!(f, "=== Confusion Matrix ===")?;
        writeln!(f, "{}", self.confusion_matrix)?;
        write!(f, "========================")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_denominators_fall_back_to_zero() {
        let cm = confusion_matrix(&[0, 0], &[0, 0]).unwrap();
        assert_eq!(cm.true_negative, 2);
        assert_eq!(cm.precision(), 0.0);
        assert_eq!(cm.recall(), 0.0);
        assert_eq!(cm.f1_score(), 0.0);
        assert_eq!(cm.accuracy(), 1.0);

        assert_eq!(accuracy(&[], &[]).unwrap(), 0.0);
    }

    #[test]
    fn test_rejects_mismatched_and_non_binary_labels() {
        assert!(confusion_matrix(&[0, 1], &[0]).is_err());
        assert!(confusion_matrix(&[0, 2], &[0, 1]).is_err());
        assert!(confusion_matrix(&[0, 1], &[-1, 1]).is_err());
    }

    #[test]
    fn test_report_display_contains_scores() {
        let report = evaluate(&[1, 0, 1, 1], &[1, 0, 0, 1]).unwrap();
        let text = report.to_string();
        assert!(text.contains("Accuracy:  0.7500 (75.0000%)"));
        assert!(text.contains("Precision: 1.0000"));
        assert!(text.contains("=== Confusion Matrix ==="));
    }
}
