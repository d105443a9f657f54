//! Offline forest training: stratified splitting, bootstrap fitting, and
//! hold-out evaluation.
//!
//! Everything here is deterministic given the seed. Each tree draws its own
//! bootstrap sample and feature subsets from an RNG derived from the base
//! seed and the tree index, so fitting trees in parallel cannot change the
//! resulting model.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::dataset::LabeledDataset;
use crate::forest::tree::{DecisionTree, TreeParams, NUM_CLASSES};
use crate::forest::RandomForest;

/// Odd multiplier decorrelating per-tree RNG streams from the base seed.
const TREE_SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Hyperparameters for fitting the whole ensemble.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ForestParams {
    /// Number of bootstrap trees.
    pub n_trees: usize,
    /// Per-tree growth limits.
    pub tree: TreeParams,
    /// Base RNG seed (bootstrap + feature subsets + stratified shuffle).
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 200,
            tree: TreeParams::default(),
            seed: 42,
        }
    }
}

/// Split a dataset into train/test partitions with label-stratified
/// sampling: each class contributes `test_fraction` of its rows to the test
/// set, so rare classes are represented in both partitions.
pub fn stratified_split(
    dataset: &LabeledDataset,
    test_fraction: f64,
    seed: u64,
) -> (LabeledDataset, LabeledDataset) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = LabeledDataset::default();
    let mut test = LabeledDataset::default();

    for class in 0u8..NUM_CLASSES as u8 {
        let mut indices: Vec<usize> = dataset
            .labels
            .iter()
            .enumerate()
            .filter(|(_, &l)| l == class)
            .map(|(i, _)| i)
            .collect();
        indices.shuffle(&mut rng);

        let n_test = ((indices.len() as f64) * test_fraction).round() as usize;
        for (pos, &i) in indices.iter().enumerate() {
            let target = if pos < n_test { &mut test } else { &mut train };
            target.features.push(dataset.features[i]);
            target.labels.push(dataset.labels[i]);
        }
    }

    (train, test)
}

/// Fit a bagged forest on the training partition.
///
/// Trees are fitted in parallel; determinism comes from per-tree seeds, not
/// from fitting order.
pub fn fit_forest(train: &LabeledDataset, params: &ForestParams) -> RandomForest {
    let n = train.len();
    let trees: Vec<DecisionTree> = (0..params.n_trees)
        .into_par_iter()
        .map(|t| {
            let mut rng =
                StdRng::seed_from_u64(params.seed.wrapping_add((t as u64).wrapping_mul(TREE_SEED_STRIDE)));
            // Bootstrap: sample n rows with replacement.
            let indices: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            DecisionTree::fit(&train.features, &train.labels, &indices, &params.tree, &mut rng)
        })
        .collect();

    tracing::info!(
        trees = trees.len(),
        samples = n,
        seed = params.seed,
        "Fitted forest"
    );
    RandomForest { trees }
}

// ============================================================================
// Evaluation
// ============================================================================

/// Precision / recall / F1 for one class.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Hold-out evaluation summary, reported before an artifact is published.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalReport {
    pub accuracy: f64,
    pub per_class: [ClassMetrics; NUM_CLASSES],
    pub test_rows: usize,
}

impl std::fmt::Display for EvalReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "accuracy: {:.4} ({} test rows)", self.accuracy, self.test_rows)?;
        writeln!(f, "class      precision  recall    f1        support")?;
        let names = ["NORMAL", "WARNING", "CRITICAL"];
        for (name, m) in names.iter().zip(&self.per_class) {
            writeln!(
                f,
                "{:<10} {:<10.4} {:<9.4} {:<9.4} {}",
                name, m.precision, m.recall, m.f1, m.support
            )?;
        }
        Ok(())
    }
}

/// Evaluate a fitted forest against a hold-out partition.
pub fn evaluate(forest: &RandomForest, test: &LabeledDataset) -> EvalReport {
    let mut confusion = [[0usize; NUM_CLASSES]; NUM_CLASSES]; // [actual][predicted]
    let mut correct = 0usize;

    for (row, &actual) in test.features.iter().zip(&test.labels) {
        let predicted = forest.predict_label(row) as usize;
        let actual = actual as usize;
        if actual < NUM_CLASSES && predicted < NUM_CLASSES {
            confusion[actual][predicted] += 1;
            if actual == predicted {
                correct += 1;
            }
        }
    }

    let mut per_class = [ClassMetrics::default(); NUM_CLASSES];
    for c in 0..NUM_CLASSES {
        let tp = confusion[c][c];
        let actual_total: usize = confusion[c].iter().sum();
        let predicted_total: usize = (0..NUM_CLASSES).map(|a| confusion[a][c]).sum();

        let precision = if predicted_total > 0 {
            tp as f64 / predicted_total as f64
        } else {
            0.0
        };
        let recall = if actual_total > 0 {
            tp as f64 / actual_total as f64
        } else {
            0.0
        };
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        per_class[c] = ClassMetrics {
            precision,
            recall,
            f1,
            support: actual_total,
        };
    }

    let test_rows = test.len();
    EvalReport {
        accuracy: if test_rows > 0 {
            correct as f64 / test_rows as f64
        } else {
            0.0
        },
        per_class,
        test_rows,
    }
}
