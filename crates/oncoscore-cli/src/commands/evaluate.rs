//! `oncoscore evaluate`: hold-out evaluation of every configured classifier.
use std::path::Path;

use anyhow::{bail, Context, Result};

use oncoscore_classifiers::config::DiagnosisConfig;
use oncoscore_classifiers::data_handling::{train_test_indices, Dataset, GeneticRecord};
use oncoscore_classifiers::diagnosis::{DiagnosisSystem, ModelEvaluation};
use oncoscore_classifiers::io::read_genes_csv;
use oncoscore_classifiers::report::write_html_report;

/// Seeded train/test split of the records themselves.
pub fn split_records(
    records: &[GeneticRecord],
    config: &DiagnosisConfig,
) -> Result<(Vec<GeneticRecord>, Vec<GeneticRecord>)> {
    let (train_idx, test_idx) =
        train_test_indices(records.len(), config.test_fraction, config.seed)?;
    let pick = |indices: &[usize]| -> Vec<GeneticRecord> {
        indices.iter().map(|&i| records[i].clone()).collect()
    };
    Ok((pick(&train_idx), pick(&test_idx)))
}

/// Train on the training split, evaluate on the held-out split and
/// optionally write the HTML report.
pub fn run_evaluate(
    genes_path: &Path,
    config: &DiagnosisConfig,
    report_path: Option<&Path>,
) -> Result<Vec<ModelEvaluation>> {
    let records = read_genes_csv(genes_path)?;
    if records.len() < 2 {
        bail!(
            "Need at least 2 genetic records to evaluate, found {} in {}",
            records.len(),
            genes_path.display()
        );
    }
    Dataset::from_records(&records).log_summary();

    let (train, test) = split_records(&records, config)?;
    log::info!("Training on {} records, evaluating on {}", train.len(), test.len());

    let mut system = DiagnosisSystem::new(config.clone())?;
    system.train(&train).context("Failed to train models")?;
    let evaluations = system.evaluate(&test).context("Failed to evaluate models")?;

    println!("=== Model Evaluation ===");
    for eval in &evaluations {
        println!();
        println!("--- {} ---", eval.kind.display_name());
        println!("{}", eval.report);
    }

    if let Some(path) = report_path {
        write_html_report(path, &evaluations, "oncoscore")?;
    }

    Ok(evaluations)
}
