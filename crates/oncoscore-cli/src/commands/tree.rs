use std::path::Path;

use anyhow::{anyhow, Context, Result};

use oncoscore_classifiers::config::DiagnosisConfig;
use oncoscore_classifiers::diagnosis::DiagnosisSystem;
use oncoscore_classifiers::io::read_genes_csv;

/// Train on every record and render the fitted decision tree.
pub fn run_tree(genes_path: &Path, config: &DiagnosisConfig) -> Result<String> {
    let records = read_genes_csv(genes_path)?;
    let mut system = DiagnosisSystem::new(config.clone())?;
    system.train(&records).context("Failed to train models")?;

    let tree = system
        .decision_tree()
        .ok_or_else(|| anyhow!("No decision tree configured"))?;
    let rendered = format!(
        "=== Decision Tree ({} nodes, {} leaves, depth {}) ===\n{}",
        tree.node_count(),
        tree.leaf_count(),
        tree.depth(),
        tree
    );
    println!("{}", rendered);
    Ok(rendered)
}
