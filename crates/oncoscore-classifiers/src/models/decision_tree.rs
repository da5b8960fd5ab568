//! CART-style decision tree built by recursive Gini impurity minimization.
//!
//! Nodes live in a flat arena (`Vec<TreeNode>`) with the root at index 0 and
//! children referenced by index, so the fitted tree is a plain value that is
//! cheap to clone.
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{ClassifierError, Result};
use crate::math::Array2;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::utils::{check_feature_count, majority_class, validate_training_data};

/// One node of the fitted tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode {
    Leaf {
        prediction: i32,
    },
    /// `sample[feature_index] <= threshold` goes to `left`, otherwise `right`.
    Split {
        feature_index: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Gini impurity `1 - Σ p_c²` of a label set. Empty input yields 1.0.
pub fn gini_impurity(labels: &[i32]) -> f64 {
    if labels.is_empty() {
        return 1.0;
    }

    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for &label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }

    let n = labels.len() as f64;
    counts.values().fold(1.0, |gini, &count| {
        let p = count as f64 / n;
        gini - p * p
    })
}

/// A fitted tree.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
    n_features: usize,
}

impl DecisionTree {
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn root(&self) -> &TreeNode {
        &self.nodes[0]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, TreeNode::Leaf { .. }))
            .count()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((idx, depth)) = stack.pop() {
            match &self.nodes[idx] {
                TreeNode::Leaf { .. } => max_depth = max_depth.max(depth),
                TreeNode::Split { left, right, .. } => {
                    stack.push((*left, depth + 1));
                    stack.push((*right, depth + 1));
                }
            }
        }
        max_depth
    }

    fn predict_sample(&self, sample: &[f64]) -> i32 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { prediction } => return *prediction,
                TreeNode::Split {
                    feature_index,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if sample[*feature_index] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, idx: usize, depth: usize) -> fmt::Result {
        let indent = " ".repeat(depth * 2);
        match &self.nodes[idx] {
            TreeNode::Leaf { prediction } => {
                writeln!(f, "{}Leaf: Prediction = {}", indent, prediction)
            }
            TreeNode::Split {
                feature_index,
                threshold,
                left,
                right,
            } => {
                writeln!(f, "{}Feature[{}] <= {}", indent, feature_index, threshold)?;
                writeln!(f, "{}  Left:", indent)?;
                self.fmt_node(f, *left, depth + 1)?;
                writeln!(f, "{}  Right:", indent)?;
                self.fmt_node(f, *right, depth + 1)
            }
        }
    }
}

impl fmt::Display for DecisionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, 0, 0)
    }
}

/// Decision tree classifier.
#[derive(Debug, Clone)]
pub struct DecisionTreeClassifier {
    max_depth: usize,
    min_samples_split: usize,
    tree: Option<DecisionTree>,
}

impl Default for DecisionTreeClassifier {
    fn default() -> Self {
        DecisionTreeClassifier {
            max_depth: 10,
            min_samples_split: 2,
            tree: None,
        }
    }
}

impl DecisionTreeClassifier {
    pub fn new(max_depth: usize, min_samples_split: usize) -> Result<Self> {
        let mut classifier = DecisionTreeClassifier::default();
        classifier.set_max_depth(max_depth)?;
        classifier.set_min_samples_split(min_samples_split)?;
        Ok(classifier)
    }

    pub fn set_max_depth(&mut self, max_depth: usize) -> Result<()> {
        if max_depth == 0 {
            return Err(ClassifierError::invalid("max_depth must be positive"));
        }
        self.max_depth = max_depth;
        Ok(())
    }

    pub fn set_min_samples_split(&mut self, min_samples_split: usize) -> Result<()> {
        if min_samples_split == 0 {
            return Err(ClassifierError::invalid(
                "min_samples_split must be positive",
            ));
        }
        self.min_samples_split = min_samples_split;
        Ok(())
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn min_samples_split(&self) -> usize {
        self.min_samples_split
    }

    /// The fitted tree, if any.
    pub fn tree(&self) -> Option<&DecisionTree> {
        self.tree.as_ref()
    }

    fn fitted(&self) -> Result<&DecisionTree> {
        self.tree.as_ref().ok_or(ClassifierError::NotTrained)
    }

    /// Grow the subtree for the samples in `indices` and return the arena
    /// index of its root.
    fn build(
        &self,
        nodes: &mut Vec<TreeNode>,
        x: &Array2<f64>,
        y: &[i32],
        indices: &[usize],
        depth: usize,
    ) -> usize {
        let idx = nodes.len();
        nodes.push(TreeNode::Leaf { prediction: 0 });

        let labels = || indices.iter().map(|&i| y[i]);

        if depth >= self.max_depth || indices.len() < self.min_samples_split {
            nodes[idx] = TreeNode::Leaf {
                prediction: majority_class(labels()),
            };
            return idx;
        }

        let first = y[indices[0]];
        if labels().all(|label| label == first) {
            nodes[idx] = TreeNode::Leaf { prediction: first };
            return idx;
        }

        let Some((feature_index, threshold)) = find_best_split(x, y, indices) else {
            nodes[idx] = TreeNode::Leaf {
                prediction: majority_class(labels()),
            };
            return idx;
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| x[(i, feature_index)] <= threshold);

        if left_idx.is_empty() || right_idx.is_empty() {
            nodes[idx] = TreeNode::Leaf {
                prediction: majority_class(labels()),
            };
            return idx;
        }

        let left = self.build(nodes, x, y, &left_idx, depth + 1);
        let right = self.build(nodes, x, y, &right_idx, depth + 1);
        nodes[idx] = TreeNode::Split {
            feature_index,
            threshold,
            left,
            right,
        };
        idx
    }
}

/// Search every (feature, midpoint threshold) pair for the lowest weighted
/// Gini impurity. The search starts from 1.0, the impurity upper bound, and
/// only a strictly lower score replaces the current best, so ties keep the
/// first pair in feature-then-threshold order. `None` when no feature has two
/// distinct values.
fn find_best_split(x: &Array2<f64>, y: &[i32], indices: &[usize]) -> Option<(usize, f64)> {
    let n = indices.len() as f64;
    let mut best: Option<(usize, f64)> = None;
    let mut best_gini = 1.0;

    for feature in 0..x.ncols() {
        let mut values: Vec<f64> = indices.iter().map(|&i| x[(i, feature)]).collect();
        values.sort_by(f64::total_cmp);
        values.dedup();

        for pair in values.windows(2) {
            let threshold = (pair[0] + pair[1]) / 2.0;

            let mut left = Vec::new();
            let mut right = Vec::new();
            for &i in indices {
                if x[(i, feature)] <= threshold {
                    left.push(y[i]);
                } else {
                    right.push(y[i]);
                }
            }
            if left.is_empty() || right.is_empty() {
                continue;
            }

            let weighted = (left.len() as f64 / n) * gini_impurity(&left)
                + (right.len() as f64 / n) * gini_impurity(&right);

            if weighted < best_gini {
                best_gini = weighted;
                best = Some((feature, threshold));
            }
        }
    }

    best
}

impl ClassifierModel for DecisionTreeClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &[i32]) -> Result<()> {
        if self.tree.is_some() {
            return Err(ClassifierError::AlreadyTrained);
        }
        validate_training_data(x, y)?;

        let indices: Vec<usize> = (0..x.nrows()).collect();
        let mut nodes = Vec::new();
        self.build(&mut nodes, x, y, &indices, 0);

        let tree = DecisionTree {
            nodes,
            n_features: x.ncols(),
        };
        log::debug!(
            "Decision tree fitted on {} samples: {} nodes, {} leaves, depth {}",
            x.nrows(),
            tree.node_count(),
            tree.leaf_count(),
            tree.depth()
        );
        self.tree = Some(tree);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Vec<i32>> {
        let tree = self.fitted()?;
        check_feature_count(tree.n_features, x.ncols())?;
        Ok(x.rows().map(|row| tree.predict_sample(row)).collect())
    }

    fn predict_single(&self, sample: &[f64]) -> Result<i32> {
        let tree = self.fitted()?;
        check_feature_count(tree.n_features, sample.len())?;
        Ok(tree.predict_sample(sample))
    }

    fn risk_score(&self, sample: &[f64]) -> Result<f64> {
        Ok(if self.predict_single(sample)? == 1 {
            1.0
        } else {
            0.0
        })
    }

    fn reset(&mut self) {
        self.tree = None;
    }

    fn is_trained(&self) -> bool {
        self.tree.is_some()
    }

    fn name(&self) -> &str {
        "Decision Tree"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
