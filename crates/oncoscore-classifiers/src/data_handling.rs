//! Genetic records and the feature matrix built from them.
//!
//! A `GeneticRecord` is one row of the genes CSV. `Dataset` turns a slice of
//! records into the single-feature matrix (mutation score) and label vector
//! the classifiers consume, and provides a seeded train/test split.
use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result};
use crate::math::Array2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneticRecord {
    pub gene_id: String,
    pub mutation_score: f64,
    /// 1 cancerous, 0 non-cancerous.
    pub label: i32,
}

impl GeneticRecord {
    pub fn new(gene_id: impl Into<String>, mutation_score: f64, label: i32) -> Self {
        GeneticRecord {
            gene_id: gene_id.into(),
            mutation_score,
            label,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub x: Array2<f64>,
    pub y: Vec<i32>,
}

impl Dataset {
    pub fn new(x: Array2<f64>, y: Vec<i32>) -> Result<Self> {
        if x.nrows() != y.len() {
            return Err(ClassifierError::invalid(format!(
                "X and y must have the same size (X has {} rows, y has {} labels)",
                x.nrows(),
                y.len()
            )));
        }
        Ok(Dataset { x, y })
    }

    /// One sample per record with the mutation score as its only feature.
    pub fn from_records(records: &[GeneticRecord]) -> Self {
        let scores = records.iter().map(|r| r.mutation_score).collect();
        let y = records.iter().map(|r| r.label).collect();
        Dataset {
            x: Array2::from_column(scores),
            y,
        }
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    /// Subset of the rows at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            x: self.x.select_rows(indices),
            y: indices.iter().map(|&i| self.y[i]).collect(),
        }
    }

    /// Split the rows with [`train_test_indices`].
    pub fn train_test_split(&self, test_fraction: f64, seed: u64) -> Result<(Dataset, Dataset)> {
        let (train_idx, test_idx) = train_test_indices(self.len(), test_fraction, seed)?;
        Ok((self.select(&train_idx), self.select(&test_idx)))
    }

    /// Number of samples per label, in ascending label order.
    pub fn class_counts(&self) -> BTreeMap<i32, usize> {
        let mut counts = BTreeMap::new();
        for &label in &self.y {
            *counts.entry(label).or_insert(0) += 1;
        }
        counts
    }

    pub fn log_summary(&self) {
        let counts = self.class_counts();
        log::info!("----- Input Data Summary -----");
        log::info!(
            "{} cancerous and {} non-cancerous samples",
            counts.get(&1).copied().unwrap_or(0),
            counts.get(&0).copied().unwrap_or(0)
        );
        log::info!("{} feature column(s)", self.n_features());
        log::info!("------------------------------");
    }
}

/// Shuffle `0..n` with a seeded RNG and hold out `round(n * test_fraction)`
/// indices for testing, clamped so that both sides keep at least one index.
/// Returns `(train, test)`.
pub fn train_test_indices(
    n: usize,
    test_fraction: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>)> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(ClassifierError::invalid(format!(
            "test_fraction must be in (0, 1), got {}",
            test_fraction
        )));
    }
    if n < 2 {
        return Err(ClassifierError::invalid(format!(
            "Need at least 2 samples to split, got {}",
            n
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((n as f64 * test_fraction).round() as usize).clamp(1, n - 1);
    let train = indices.split_off(n_test);

    log::debug!(
        "Split {} samples into {} train / {} test (seed {})",
        n,
        train.len(),
        indices.len(),
        seed
    );
    Ok((train, indices))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: usize) -> Vec<GeneticRecord> {
        (0..n)
            .map(|i| GeneticRecord::new(format!("G{}", i), i as f64, (i % 2) as i32))
            .collect()
    }

    #[test]
    fn test_from_records_builds_single_column() {
        let ds = Dataset::from_records(&records(4));
        assert_eq!(ds.x.shape(), (4, 1));
        assert_eq!(ds.y, vec![0, 1, 0, 1]);
        assert_eq!(ds.x[(3, 0)], 3.0);
    }

    #[test]
    fn test_split_is_seeded_and_partitions_rows() {
        let ds = Dataset::from_records(&records(10));
        let (train_a, test_a) = ds.train_test_split(0.3, 7).unwrap();
        let (train_b, test_b) = ds.train_test_split(0.3, 7).unwrap();
        assert_eq!(train_a, train_b);
        assert_eq!(test_a, test_b);
        assert_eq!(train_a.len(), 7);
        assert_eq!(test_a.len(), 3);

        let mut all: Vec<f64> = train_a
            .x
            .as_slice()
            .iter()
            .chain(test_a.x.as_slice())
            .copied()
            .collect();
        all.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(all, (0..10).map(|i| i as f64).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_keeps_both_sides_non_empty() {
        let ds = Dataset::from_records(&records(2));
        let (train, test) = ds.train_test_split(0.01, 1).unwrap();
        assert_eq!((train.len(), test.len()), (1, 1));

        assert!(ds.train_test_split(0.0, 1).is_err());
        assert!(ds.train_test_split(1.0, 1).is_err());
        assert!(Dataset::from_records(&records(1))
            .train_test_split(0.5, 1)
            .is_err());
    }
}
