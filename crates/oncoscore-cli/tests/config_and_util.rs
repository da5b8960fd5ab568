//! Integration tests for CLI config loading and the command helpers.

use oncoscore_classifiers::config::{DiagnosisConfig, ModelKind, ModelType};
use oncoscore_classifiers::data_handling::GeneticRecord;
use oncoscore_classifiers::io::write_genes_csv;
use oncoscore_cli::commands::config::load_diagnosis_config;
use oncoscore_cli::commands::diagnose::run_diagnose;
use oncoscore_cli::commands::evaluate::{run_evaluate, split_records};
use oncoscore_cli::commands::tree::run_tree;

fn records() -> Vec<GeneticRecord> {
    (0..10)
        .map(|i| {
            let label = (i >= 5) as i32;
            let score = if label == 1 { 0.7 + i as f64 * 0.02 } else { 0.1 + i as f64 * 0.03 };
            GeneticRecord::new(format!("G{}", i), score, label)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// DiagnosisConfig defaults & loading
// ---------------------------------------------------------------------------

#[test]
fn diagnosis_config_default_values() {
    let cfg = DiagnosisConfig::default();
    assert_eq!(cfg.models, ModelType::all_defaults());
    assert!(cfg.standardize);
    assert!((cfg.test_fraction - 0.3).abs() < 1e-12);
    assert_eq!(cfg.seed, 42);
}

#[test]
fn diagnosis_config_round_trips_json() {
    let cfg = DiagnosisConfig::default();
    let json = serde_json::to_string_pretty(&cfg).unwrap();
    assert!(json.contains("test_fraction"));
    assert!(json.contains("LogisticRegression"));
    let cfg2: DiagnosisConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(cfg, cfg2);
}

#[test]
fn diagnosis_config_partial_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"seed": 9, "models": [{"KNN": {"k": 3}}]}"#).unwrap();

    let cfg = load_diagnosis_config(&path).unwrap();
    assert_eq!(cfg.seed, 9);
    assert_eq!(cfg.models, vec![ModelType::KNN { k: 3 }]);
    assert!(cfg.standardize);
}

#[test]
fn diagnosis_config_bad_file_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(load_diagnosis_config(&path).is_err());
    assert!(load_diagnosis_config(dir.path().join("missing.json")).is_err());
}

// ---------------------------------------------------------------------------
// Command helpers
// ---------------------------------------------------------------------------

#[test]
fn split_records_partitions_deterministically() {
    let cfg = DiagnosisConfig::default();
    let (train, test) = split_records(&records(), &cfg).unwrap();
    assert_eq!(train.len() + test.len(), 10);
    assert_eq!(test.len(), 3);

    let (train2, test2) = split_records(&records(), &cfg).unwrap();
    assert_eq!(train, train2);
    assert_eq!(test, test2);
}

#[test]
fn run_commands_on_genes_file() {
    let dir = tempfile::tempdir().unwrap();
    let genes = dir.path().join("genes.csv");
    write_genes_csv(&genes, &records()).unwrap();
    let report = dir.path().join("report.html");

    let cfg = DiagnosisConfig::default();
    let evaluations = run_evaluate(&genes, &cfg, Some(&report)).unwrap();
    assert_eq!(evaluations.len(), 4);
    assert!(report.exists());

    let diagnoses = run_diagnose(&genes, &cfg, &[0.9], &[], None).unwrap();
    assert_eq!(diagnoses.len(), 4);
    assert!(diagnoses.iter().all(|d| d.prediction == 1 && d.category == "Cancerous"));

    let rendered = run_tree(&genes, &cfg).unwrap();
    assert!(rendered.contains("Leaf: Prediction = 0"));
}

#[test]
fn run_diagnose_low_score_is_non_cancerous() {
    let dir = tempfile::tempdir().unwrap();
    let genes = dir.path().join("genes.csv");
    write_genes_csv(&genes, &records()).unwrap();

    let cfg = DiagnosisConfig::default();
    let diagnoses = run_diagnose(&genes, &cfg, &[0.1], &[], None).unwrap();
    for d in &diagnoses {
        assert_eq!(d.prediction, 0, "{} risk {}", d.model, d.risk_score);
        assert_eq!(d.category, "Non-Cancerous");
        assert!(d.risk_score < 0.5);
    }

    let tree_only = run_diagnose(&genes, &cfg, &[0.1], &[], Some(ModelKind::DecisionTree)).unwrap();
    assert_eq!(tree_only.len(), 1);
    assert_eq!(tree_only[0].risk_score, 0.0);
}
