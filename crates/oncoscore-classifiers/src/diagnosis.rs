//! Diagnosis controller tying the preprocessor and the classifiers together.
//!
//! `DiagnosisSystem` trains every configured classifier on the (optionally
//! standardized) mutation score of a set of genetic records and answers risk
//! queries for a list of mutation scores, typically the scores of the genes
//! sequenced for one patient.
use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::config::{DiagnosisConfig, ModelKind};
use crate::data_handling::{Dataset, GeneticRecord};
use crate::error::{ClassifierError, Result};
use crate::math::Array2;
use crate::metrics::{self, ClassificationReport};
use crate::models::factory::build_model;
use crate::models::{ClassifierModel, DecisionTree, DecisionTreeClassifier};
use crate::preprocessing::Preprocessor;

/// Evaluation of one trained model on a labelled set.
#[derive(Debug, Clone, Serialize)]
pub struct ModelEvaluation {
    pub kind: ModelKind,
    pub report: ClassificationReport,
    /// Risk score per evaluated record, in record order.
    pub risk_scores: Vec<f64>,
    pub labels: Vec<i32>,
}

pub struct DiagnosisSystem {
    config: DiagnosisConfig,
    preprocessor: Preprocessor,
    models: Vec<(ModelKind, Box<dyn ClassifierModel>)>,
    categories: BTreeMap<i32, String>,
    gene_scores: HashMap<String, f64>,
    mean_training_score: Option<f64>,
    trained: bool,
}

impl DiagnosisSystem {
    /// Build the untrained system. Every configured model kind must be
    /// unique and carry valid hyper-parameters.
    pub fn new(config: DiagnosisConfig) -> Result<Self> {
        if config.models.is_empty() {
            return Err(ClassifierError::invalid("At least one model must be configured"));
        }

        let mut models: Vec<(ModelKind, Box<dyn ClassifierModel>)> = Vec::new();
        for model_type in &config.models {
            let kind = model_type.kind();
            if models.iter().any(|(k, _)| *k == kind) {
                return Err(ClassifierError::invalid(format!(
                    "Model '{}' is configured more than once",
                    kind
                )));
            }
            models.push((kind, build_model(model_type.clone())?));
        }

        let mut categories = BTreeMap::new();
        categories.insert(0, "Non-Cancerous".to_string());
        categories.insert(1, "Cancerous".to_string());

        Ok(DiagnosisSystem {
            config,
            preprocessor: Preprocessor::new(),
            models,
            categories,
            gene_scores: HashMap::new(),
            mean_training_score: None,
            trained: false,
        })
    }

    pub fn config(&self) -> &DiagnosisConfig {
        &self.config
    }

    pub fn is_trained(&self) -> bool {
        self.trained
    }

    /// Configured model kinds, in configuration order.
    pub fn model_kinds(&self) -> Vec<ModelKind> {
        self.models.iter().map(|(kind, _)| *kind).collect()
    }

    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    /// Train every configured model on `records`, discarding any earlier
    /// training.
    pub fn train(&mut self, records: &[GeneticRecord]) -> Result<()> {
        if records.is_empty() {
            return Err(ClassifierError::invalid(
                "No genetic data available for training",
            ));
        }

        self.trained = false;
        self.preprocessor.reset();
        for (_, model) in self.models.iter_mut() {
            model.reset();
        }
        self.gene_scores = records
            .iter()
            .map(|r| (r.gene_id.clone(), r.mutation_score))
            .collect();

        let mut dataset = Dataset::from_records(records);
        let scores = dataset.x.column(0);
        self.mean_training_score = Some(scores.iter().sum::<f64>() / scores.len() as f64);

        if self.config.standardize {
            let standardized = self.preprocessor.fit_transform(&scores)?;
            dataset.x.set_column(0, &standardized)?;
        }

        log::info!("Training {} models on {} samples", self.models.len(), dataset.len());
        for (kind, model) in self.models.iter_mut() {
            model.fit(&dataset.x, &dataset.y)?;
            log::info!("  {} trained", kind);
        }

        self.trained = true;
        Ok(())
    }

    /// Mutation score recorded for `gene_id` during training.
    pub fn mutation_score(&self, gene_id: &str) -> Option<f64> {
        self.gene_scores.get(gene_id).copied()
    }

    /// Single-feature vector for a set of mutation scores: their mean, or
    /// the mean training score when `mutation_scores` is empty, standardized
    /// when the preprocessor is fitted.
    pub fn extract_features(&self, mutation_scores: &[f64]) -> Result<Vec<f64>> {
        let raw = if mutation_scores.is_empty() {
            self.mean_training_score.unwrap_or(0.0)
        } else {
            mutation_scores.iter().sum::<f64>() / mutation_scores.len() as f64
        };

        if self.preprocessor.is_fitted() {
            self.preprocessor.standardize(&[raw])
        } else {
            Ok(vec![raw])
        }
    }

    fn model(&self, kind: ModelKind) -> Result<&dyn ClassifierModel> {
        if !self.trained {
            return Err(ClassifierError::NotTrained);
        }
        self.models
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, model)| &**model)
            .ok_or_else(|| ClassifierError::invalid(format!("Model '{}' is not configured", kind)))
    }

    /// Risk of the cancerous class for a set of mutation scores. The decision
    /// tree yields 1.0 or 0.0.
    pub fn risk_score(&self, kind: ModelKind, mutation_scores: &[f64]) -> Result<f64> {
        let model = self.model(kind)?;
        let features = self.extract_features(mutation_scores)?;
        model.risk_score(&features)
    }

    pub fn predict(&self, kind: ModelKind, mutation_scores: &[f64]) -> Result<i32> {
        let risk = self.risk_score(kind, mutation_scores)?;
        Ok(if risk >= 0.5 { 1 } else { 0 })
    }

    /// Evaluate every model on `records`, each record scored on its own
    /// mutation score.
    pub fn evaluate(&self, records: &[GeneticRecord]) -> Result<Vec<ModelEvaluation>> {
        if !self.trained {
            return Err(ClassifierError::NotTrained);
        }
        if records.is_empty() {
            return Err(ClassifierError::invalid("No records to evaluate"));
        }

        let mut features = Vec::with_capacity(records.len());
        for record in records {
            features.extend(self.extract_features(&[record.mutation_score])?);
        }
        let x = Array2::from_column(features);
        let y: Vec<i32> = records.iter().map(|r| r.label).collect();

        let mut evaluations = Vec::with_capacity(self.models.len());
        for (kind, model) in &self.models {
            let predictions = model.predict(&x)?;
            let risk_scores = model.predict_proba(&x)?;
            let report = metrics::evaluate(&y, &predictions)?;
            log::debug!("{}: accuracy {:.4}", kind, report.accuracy);
            evaluations.push(ModelEvaluation {
                kind: *kind,
                report,
                risk_scores,
                labels: y.clone(),
            });
        }
        Ok(evaluations)
    }

    /// Name of a label, "Unknown" for anything but 0 and 1.
    pub fn category(&self, label: i32) -> &str {
        self.categories
            .get(&label)
            .map(String::as_str)
            .unwrap_or("Unknown")
    }

    /// The fitted tree, when a decision tree is configured and trained.
    pub fn decision_tree(&self) -> Option<&DecisionTree> {
        self.models
            .iter()
            .find(|(kind, _)| *kind == ModelKind::DecisionTree)
            .and_then(|(_, model)| model.as_any().downcast_ref::<DecisionTreeClassifier>())
            .and_then(|classifier| classifier.tree())
    }
}
