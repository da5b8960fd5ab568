use std::fs;

use approx::assert_relative_eq;
use tempfile::TempDir;

use oncoscore_classifiers::config::{DiagnosisConfig, ModelKind, ModelType};
use oncoscore_classifiers::data_handling::{Dataset, GeneticRecord};
use oncoscore_classifiers::diagnosis::DiagnosisSystem;
use oncoscore_classifiers::io::{read_genes_csv, write_genes_csv};
use oncoscore_classifiers::report::{render_html_report, write_html_report};
use oncoscore_classifiers::ClassifierError;

fn genes() -> Vec<GeneticRecord> {
    vec![
        GeneticRecord::new("TP53", 0.12, 0),
        GeneticRecord::new("EGFR", 0.25, 0),
        GeneticRecord::new("KRAS", 0.31, 0),
        GeneticRecord::new("PTEN", 0.18, 0),
        GeneticRecord::new("BRCA1", 0.85, 1),
        GeneticRecord::new("BRCA2", 0.91, 1),
        GeneticRecord::new("MYC", 0.78, 1),
        GeneticRecord::new("APC", 0.88, 1),
    ]
}

// ---------------------------------------------------------------------------
// Genes CSV
// ---------------------------------------------------------------------------

#[test]
fn test_genes_csv_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("genes.csv");

    write_genes_csv(&path, &genes()).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("Gene_ID,Mutation_Score,Label\n"));
    assert!(text.contains("BRCA1,0.8500,1"));

    let loaded = read_genes_csv(&path).unwrap();
    assert_eq!(loaded, genes());
}

#[test]
fn test_genes_csv_skips_malformed_rows() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("genes.csv");
    fs::write(
        &path,
        "Gene_ID,Mutation_Score,Label\n\
         BRCA1, 0.85 ,1\n\
         BAD,not-a-number,1\n\
         SHORT,0.5\n\
         \n\
         TP53,0.12,0\n",
    )
    .unwrap();

    let loaded = read_genes_csv(&path).unwrap();
    assert_eq!(
        loaded,
        vec![
            GeneticRecord::new("BRCA1", 0.85, 1),
            GeneticRecord::new("TP53", 0.12, 0),
        ]
    );
}

#[test]
fn test_genes_csv_requires_header_columns() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("genes.csv");
    fs::write(&path, "Gene,Score,Label\nBRCA1,0.85,1\n").unwrap();
    assert!(read_genes_csv(&path).is_err());
    assert!(read_genes_csv(dir.path().join("missing.csv")).is_err());
}

// ---------------------------------------------------------------------------
// Diagnosis system
// ---------------------------------------------------------------------------

#[test]
fn test_untrained_system_refuses_queries() {
    let system = DiagnosisSystem::new(DiagnosisConfig::default()).unwrap();
    assert!(!system.is_trained());
    assert_eq!(
        system.risk_score(ModelKind::LogisticRegression, &[0.5]),
        Err(ClassifierError::NotTrained)
    );
    assert!(system.evaluate(&genes()).is_err());
    assert!(system.decision_tree().is_none());
}

#[test]
fn test_trained_system_separates_risk() {
    let mut system = DiagnosisSystem::new(DiagnosisConfig::default()).unwrap();
    system.train(&genes()).unwrap();
    assert!(system.is_trained());
    assert_eq!(system.model_kinds(), ModelKind::ALL.to_vec());

    for kind in ModelKind::ALL {
        let high = system.risk_score(kind, &[0.9, 0.85]).unwrap();
        let low = system.risk_score(kind, &[0.1, 0.2]).unwrap();
        assert!((0.0..=1.0).contains(&high));
        assert!(high > low, "{}: {} <= {}", kind, high, low);
        assert_eq!(system.predict(kind, &[0.9, 0.85]).unwrap(), 1);
        assert_eq!(system.predict(kind, &[0.1, 0.2]).unwrap(), 0);
    }

    let tree_risk = system.risk_score(ModelKind::DecisionTree, &[0.9]).unwrap();
    assert!(tree_risk == 0.0 || tree_risk == 1.0);
    assert!(system.decision_tree().is_some());

    assert_eq!(system.category(1), "Cancerous");
    assert_eq!(system.category(0), "Non-Cancerous");
    assert_eq!(system.category(5), "Unknown");
}

#[test]
fn test_training_standardizes_scores() {
    let mut system = DiagnosisSystem::new(DiagnosisConfig::default()).unwrap();
    system.train(&genes()).unwrap();

    let scores: Vec<f64> = genes().iter().map(|g| g.mutation_score).collect();
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    let stats = system.preprocessor().stats().unwrap();
    assert_relative_eq!(stats.mean, mean, epsilon = 1e-12);

    let features = system.extract_features(&[mean]).unwrap();
    assert_relative_eq!(features[0], 0.0, epsilon = 1e-12);

    let mut raw = DiagnosisSystem::new(DiagnosisConfig {
        standardize: false,
        ..DiagnosisConfig::default()
    })
    .unwrap();
    raw.train(&genes()).unwrap();
    assert_eq!(raw.extract_features(&[0.4, 0.6]).unwrap(), vec![0.5]);
}

#[test]
fn test_retraining_replaces_models() {
    let mut system = DiagnosisSystem::new(DiagnosisConfig::default()).unwrap();
    system.train(&genes()).unwrap();
    system.train(&genes()).unwrap();
    assert!(system.is_trained());

    assert!(matches!(
        system.train(&[]),
        Err(ClassifierError::InvalidInput(_))
    ));
}

#[test]
fn test_evaluate_reports_every_model() {
    let mut system = DiagnosisSystem::new(DiagnosisConfig::new(vec![
        ModelType::NaiveBayes,
        ModelType::KNN { k: 3 },
    ]))
    .unwrap();

    let dataset = Dataset::from_records(&genes());
    assert_eq!(dataset.class_counts().get(&1), Some(&4));

    system.train(&genes()).unwrap();
    let evaluations = system.evaluate(&genes()).unwrap();
    assert_eq!(evaluations.len(), 2);
    assert_eq!(evaluations[0].kind, ModelKind::NaiveBayes);
    assert_eq!(evaluations[1].kind, ModelKind::KNN);
    for eval in &evaluations {
        assert_eq!(eval.report.confusion_matrix.total(), genes().len());
        assert_eq!(eval.report.accuracy, 1.0);
        assert_eq!(eval.risk_scores.len(), genes().len());
    }

    let html = render_html_report(&evaluations, "oncoscore").unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Naive Bayes"));
    assert!(html.contains("K-Nearest Neighbors"));
    assert!(html.contains("Model Evaluation Report"));

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.html");
    write_html_report(&path, &evaluations, "oncoscore").unwrap();
    let saved = fs::read_to_string(&path).unwrap();
    assert!(saved.starts_with("<!DOCTYPE html>"));
    assert!(saved.contains("Naive Bayes"));

    let missing_dir = dir.path().join("missing").join("report.html");
    assert!(write_html_report(&missing_dir, &evaluations, "oncoscore").is_err());
}
