use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported classifiers and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum ModelType {
    LogisticRegression {
        learning_rate: f64,
        max_iterations: usize,
        /// Stop once the diagnostic loss changes by less than this amount.
        /// `None` always runs the full iteration budget.
        #[serde(default)]
        tolerance: Option<f64>,
    },
    KNN {
        k: usize,
    },
    DecisionTree {
        max_depth: usize,
        min_samples_split: usize,
    },
    NaiveBayes,
}

/// Fieldless discriminant of [`ModelType`], used to address a trained model.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    LogisticRegression,
    KNN,
    DecisionTree,
    NaiveBayes,
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::default_for(ModelKind::LogisticRegression)
    }
}

impl ModelType {
    /// Hyper-parameters used by the diagnosis system when none are configured.
    pub fn default_for(kind: ModelKind) -> Self {
        match kind {
            ModelKind::LogisticRegression => ModelType::LogisticRegression {
                learning_rate: 0.01,
                max_iterations: 1000,
                tolerance: None,
            },
            ModelKind::KNN => ModelType::KNN { k: 5 },
            ModelKind::DecisionTree => ModelType::DecisionTree {
                max_depth: 10,
                min_samples_split: 2,
            },
            ModelKind::NaiveBayes => ModelType::NaiveBayes,
        }
    }

    /// All four classifiers with their default hyper-parameters.
    pub fn all_defaults() -> Vec<ModelType> {
        ModelKind::ALL
            .iter()
            .map(|&kind| ModelType::default_for(kind))
            .collect()
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            ModelType::LogisticRegression { .. } => ModelKind::LogisticRegression,
            ModelType::KNN { .. } => ModelKind::KNN,
            ModelType::DecisionTree { .. } => ModelKind::DecisionTree,
            ModelType::NaiveBayes => ModelKind::NaiveBayes,
        }
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<ModelKind>().map(ModelType::default_for)
    }
}

impl ModelKind {
    pub const ALL: [ModelKind; 4] = [
        ModelKind::LogisticRegression,
        ModelKind::KNN,
        ModelKind::DecisionTree,
        ModelKind::NaiveBayes,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ModelKind::LogisticRegression => "Logistic Regression",
            ModelKind::KNN => "K-Nearest Neighbors",
            ModelKind::DecisionTree => "Decision Tree",
            ModelKind::NaiveBayes => "Naive Bayes",
        }
    }

    /// Short identifier accepted by `FromStr` and used in file names.
    pub fn short_name(&self) -> &'static str {
        match self {
            ModelKind::LogisticRegression => "logistic",
            ModelKind::KNN => "knn",
            ModelKind::DecisionTree => "tree",
            ModelKind::NaiveBayes => "bayes",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "logistic" | "logistic_regression" | "logreg" => Ok(ModelKind::LogisticRegression),
            "knn" | "k_nearest_neighbors" => Ok(ModelKind::KNN),
            "tree" | "decision_tree" => Ok(ModelKind::DecisionTree),
            "bayes" | "naive_bayes" => Ok(ModelKind::NaiveBayes),
            _ => Err(format!(
                "Unknown model type: {}. Expected one of: logistic, knn, tree, bayes",
                s
            )),
        }
    }
}

/// Central configuration for the diagnosis system and the CLI.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DiagnosisConfig {
    /// Classifiers to train, in evaluation order.
    pub models: Vec<ModelType>,
    /// Standardize the mutation score before training.
    pub standardize: bool,
    /// Fraction of records held out for evaluation.
    pub test_fraction: f64,
    /// Seed for the train/test shuffle.
    pub seed: u64,
}

impl Default for DiagnosisConfig {
    fn default() -> Self {
        Self {
            models: ModelType::all_defaults(),
            standardize: true,
            test_fraction: 0.3,
            seed: 42,
        }
    }
}

impl DiagnosisConfig {
    pub fn new(models: Vec<ModelType>) -> Self {
        Self {
            models,
            ..Default::default()
        }
    }
}
