//! `oncoscore diagnose`: risk of one patient from their mutation scores.
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;

use oncoscore_classifiers::config::{DiagnosisConfig, ModelKind};
use oncoscore_classifiers::diagnosis::DiagnosisSystem;
use oncoscore_classifiers::io::read_genes_csv;

#[derive(Debug, Clone, Serialize)]
pub struct Diagnosis {
    pub model: ModelKind,
    pub risk_score: f64,
    pub prediction: i32,
    pub category: String,
}

/// Train on every record of `genes_path` and diagnose a patient described by
/// explicit mutation `scores` plus the training scores of the named `genes`.
/// Without `model`, every configured model is queried.
pub fn run_diagnose(
    genes_path: &Path,
    config: &DiagnosisConfig,
    scores: &[f64],
    genes: &[String],
    model: Option<ModelKind>,
) -> Result<Vec<Diagnosis>> {
    let records = read_genes_csv(genes_path)?;
    let mut system = DiagnosisSystem::new(config.clone())?;
    system.train(&records).context("Failed to train models")?;

    let mut patient_scores = scores.to_vec();
    for gene in genes {
        let score = system
            .mutation_score(gene)
            .ok_or_else(|| anyhow!("Unknown gene '{}' in {}", gene, genes_path.display()))?;
        patient_scores.push(score);
    }
    if patient_scores.is_empty() {
        log::warn!("No mutation scores given; using the mean training score");
    }

    let kinds = match model {
        Some(kind) => vec![kind],
        None => system.model_kinds(),
    };

    let mut diagnoses = Vec::with_capacity(kinds.len());
    for kind in kinds {
        let risk_score = system.risk_score(kind, &patient_scores)?;
        let prediction = system.predict(kind, &patient_scores)?;
        diagnoses.push(Diagnosis {
            model: kind,
            risk_score,
            prediction,
            category: system.category(prediction).to_string(),
        });
    }

    println!("=== Diagnosis ===");
    for d in &diagnoses {
        println!(
            "{:<22} risk score {:.4} -> {} ({})",
            d.model.display_name(),
            d.risk_score,
            d.category,
            d.prediction
        );
    }

    Ok(diagnoses)
}
