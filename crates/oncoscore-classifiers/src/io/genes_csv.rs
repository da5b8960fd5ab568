//! Genes CSV reader and writer.
//!
//! Expected layout (header required, columns located by name):
//!
//! ```text
//! Gene_ID,Mutation_Score,Label
//! BRCA1,0.8500,1
//! TP53,0.2000,0
//! ```
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use csv::StringRecord;

use crate::data_handling::GeneticRecord;

pub const GENE_ID_COLUMN: &str = "Gene_ID";
pub const MUTATION_SCORE_COLUMN: &str = "Mutation_Score";
pub const LABEL_COLUMN: &str = "Label";

/// Read every parsable record of a genes CSV file.
///
/// Rows with a missing field, an unparsable score or label are skipped with
/// a warning. A missing file or a missing header column is an error.
pub fn read_genes_csv<P: AsRef<Path>>(path: P) -> Result<Vec<GeneticRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(&path)
        .with_context(|| format!("Failed to open genes file: {}", path.as_ref().display()))?;

    let headers = reader
        .headers()
        .context("Failed to read genes header row")?
        .clone();

    let gene_idx = require_column(&headers, GENE_ID_COLUMN)?;
    let score_idx = require_column(&headers, MUTATION_SCORE_COLUMN)?;
    let label_idx = require_column(&headers, LABEL_COLUMN)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for (row_idx, result) in reader.records().enumerate() {
        // Header is line 1.
        let line = row_idx + 2;
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                log::warn!("Skipping unreadable line {}: {}", line, e);
                skipped += 1;
                continue;
            }
        };
        if row.iter().all(|field| field.is_empty()) {
            continue;
        }
        match parse_record(&row, gene_idx, score_idx, label_idx) {
            Ok(record) => records.push(record),
            Err(e) => {
                log::warn!("Error parsing line {} ({:?}): {}", line, row, e);
                skipped += 1;
            }
        }
    }

    log::info!(
        "Loaded {} genetic data records from {} ({} skipped)",
        records.len(),
        path.as_ref().display(),
        skipped
    );
    Ok(records)
}

/// Write records with the standard header; scores use 4 decimals.
pub fn write_genes_csv<P: AsRef<Path>>(path: P, records: &[GeneticRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Failed to create genes file: {}", path.as_ref().display()))?;

    writer.write_record([GENE_ID_COLUMN, MUTATION_SCORE_COLUMN, LABEL_COLUMN])?;
    for record in records {
        writer.write_record([
            record.gene_id.clone(),
            format!("{:.4}", record.mutation_score),
            record.label.to_string(),
        ])?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.as_ref().display()))?;
    Ok(())
}

fn require_column(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|header| header == name)
        .ok_or_else(|| anyhow!("Missing column '{}' in genes header", name))
}

fn parse_record(
    row: &StringRecord,
    gene_idx: usize,
    score_idx: usize,
    label_idx: usize,
) -> Result<GeneticRecord> {
    let field = |idx: usize, name: &str| {
        row.get(idx)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| anyhow!("missing {}", name))
    };

    let gene_id = field(gene_idx, GENE_ID_COLUMN)?.to_string();
    let mutation_score = field(score_idx, MUTATION_SCORE_COLUMN)?
        .parse::<f64>()
        .context("invalid mutation score")?;
    let label = field(label_idx, LABEL_COLUMN)?
        .parse::<i32>()
        .context("invalid label")?;

    Ok(GeneticRecord {
        gene_id,
        mutation_score,
        label,
    })
}
