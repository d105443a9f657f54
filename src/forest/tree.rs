//! CART decision tree: gini-impurity training and inference.
//!
//! Trees are grown greedily: at each node a random subset of features is
//! scanned, candidate thresholds are the midpoints between consecutive
//! distinct sorted values, and the split with the largest gini gain wins.
//! Leaves store the majority label; ties break toward the lowest label so
//! training is fully deterministic given the RNG seed.

use rand::seq::SliceRandom;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::types::NUM_FEATURES;

/// Number of output classes (NORMAL / WARNING / CRITICAL).
pub const NUM_CLASSES: usize = 3;

/// One tree node. Split nodes route `value <= threshold` left.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Node {
    Leaf {
        label: u8,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// Hyperparameters for growing a single tree.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TreeParams {
    /// Maximum tree depth (root = depth 0).
    pub max_depth: usize,
    /// Minimum samples required to attempt a split.
    pub min_samples_split: usize,
    /// Number of features considered per split (random subset).
    pub max_features: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: 12,
            min_samples_split: 4,
            // floor(sqrt(6)) = 2, the usual bagged-forest default
            max_features: 2,
        }
    }
}

/// A fitted CART classification tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    root: Node,
}

impl DecisionTree {
    /// Fit a tree on the samples selected by `indices` (bootstrap subset).
    pub fn fit(
        features: &[[f64; NUM_FEATURES]],
        labels: &[u8],
        indices: &[usize],
        params: &TreeParams,
        rng: &mut StdRng,
    ) -> Self {
        let root = grow(features, labels, indices, params, 0, rng);
        Self { root }
    }

    /// Predict the class label for one feature vector.
    pub fn predict(&self, features: &[f64; NUM_FEATURES]) -> u8 {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { label } => return *label,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if features[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    /// Total node count, for artifact diagnostics.
    pub fn num_nodes(&self) -> usize {
        fn count(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 1,
                Node::Split { left, right, .. } => 1 + count(left) + count(right),
            }
        }
        count(&self.root)
    }
}

/// Class histogram over the selected samples.
fn class_counts(labels: &[u8], indices: &[usize]) -> [usize; NUM_CLASSES] {
    let mut counts = [0usize; NUM_CLASSES];
    for &i in indices {
        let label = labels[i] as usize;
        if label < NUM_CLASSES {
            counts[label] += 1;
        }
    }
    counts
}

/// Gini impurity of a class histogram.
fn gini(counts: &[usize; NUM_CLASSES], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let n = total as f64;
    let mut sum_sq = 0.0;
    for &c in counts {
        let p = c as f64 / n;
        sum_sq += p * p;
    }
    1.0 - sum_sq
}

/// Majority label with deterministic tie-break toward the lowest label.
fn majority_label(counts: &[usize; NUM_CLASSES]) -> u8 {
    let mut best = 0usize;
    for (label, &c) in counts.iter().enumerate() {
        if c > counts[best] {
            best = label;
        }
    }
    best as u8
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    gain: f64,
}

/// Scan one feature for the best threshold, returning the gain over the
/// parent impurity. Thresholds are midpoints between distinct sorted values.
fn best_split_for_feature(
    features: &[[f64; NUM_FEATURES]],
    labels: &[u8],
    indices: &[usize],
    feature: usize,
    parent_gini: f64,
) -> Option<BestSplit> {
    let mut sorted: Vec<usize> = indices.to_vec();
    sorted.sort_by(|&a, &b| {
        features[a][feature]
            .partial_cmp(&features[b][feature])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let total = sorted.len();
    let total_counts = class_counts(labels, &sorted);
    let mut left_counts = [0usize; NUM_CLASSES];
    let mut best: Option<BestSplit> = None;

    for (pos, window) in sorted.windows(2).enumerate() {
        let (a, b) = (window[0], window[1]);
        let label = labels[a] as usize;
        if label < NUM_CLASSES {
            left_counts[label] += 1;
        }

        let (va, vb) = (features[a][feature], features[b][feature]);
        if va == vb {
            continue;
        }

        let n_left = pos + 1;
        let n_right = total - n_left;
        let mut right_counts = [0usize; NUM_CLASSES];
        for c in 0..NUM_CLASSES {
            right_counts[c] = total_counts[c] - left_counts[c];
        }

        let weighted = (n_left as f64 * gini(&left_counts, n_left)
            + n_right as f64 * gini(&right_counts, n_right))
            / total as f64;
        let gain = parent_gini - weighted;

        if gain > best.as_ref().map_or(0.0, |s| s.gain) {
            best = Some(BestSplit {
                feature,
                threshold: (va + vb) / 2.0,
                gain,
            });
        }
    }

    best
}

/// Recursively grow a subtree over the selected samples.
fn grow(
    features: &[[f64; NUM_FEATURES]],
    labels: &[u8],
    indices: &[usize],
    params: &TreeParams,
    depth: usize,
    rng: &mut StdRng,
) -> Node {
    let counts = class_counts(labels, indices);
    let total = indices.len();
    let parent_gini = gini(&counts, total);

    // Stop: pure node, depth limit, or too few samples to split.
    if parent_gini == 0.0 || depth >= params.max_depth || total < params.min_samples_split {
        return Node::Leaf {
            label: majority_label(&counts),
        };
    }

    // Random feature subset for this split.
    let mut candidates: Vec<usize> = (0..NUM_FEATURES).collect();
    candidates.shuffle(rng);
    candidates.truncate(params.max_features.clamp(1, NUM_FEATURES));

    let mut best: Option<BestSplit> = None;
    for &feature in &candidates {
        if let Some(split) = best_split_for_feature(features, labels, indices, feature, parent_gini)
        {
            if split.gain > best.as_ref().map_or(0.0, |s| s.gain) {
                best = Some(split);
            }
        }
    }

    let Some(split) = best else {
        // No candidate feature separates the samples.
        return Node::Leaf {
            label: majority_label(&counts),
        };
    };

    let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
        .iter()
        .copied()
        .partition(|&i| features[i][split.feature] <= split.threshold);

    Node::Split {
        feature: split.feature,
        threshold: split.threshold,
        left: Box::new(grow(features, labels, &left_idx, params, depth + 1, rng)),
        right: Box::new(grow(features, labels, &right_idx, params, depth + 1, rng)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn simple_dataset() -> (Vec<[f64; NUM_FEATURES]>, Vec<u8>) {
        // Separable on feature 0 alone: below 20 => class 0, else class 2
        let mut features = Vec::new();
        let mut labels = Vec::new();
        for i in 0..40 {
            let x = f64::from(i);
            features.push([x, 0.0, 0.0, 0.0, 0.0, 0.0]);
            labels.push(if x < 20.0 { 0 } else { 2 });
        }
        (features, labels)
    }

    #[test]
    fn test_fit_separable_data() {
        let (features, labels) = simple_dataset();
        let indices: Vec<usize> = (0..features.len()).collect();
        let params = TreeParams {
            max_features: NUM_FEATURES,
            ..TreeParams::default()
        };
        let mut rng = StdRng::seed_from_u64(7);
        let tree = DecisionTree::fit(&features, &labels, &indices, &params, &mut rng);

        for (f, &label) in features.iter().zip(&labels) {
            assert_eq!(tree.predict(f), label);
        }
        assert!(tree.num_nodes() >= 3);
    }

    #[test]
    fn test_pure_node_is_single_leaf() {
        let features = vec![[1.0; NUM_FEATURES]; 10];
        let labels = vec![1u8; 10];
        let indices: Vec<usize> = (0..10).collect();
        let mut rng = StdRng::seed_from_u64(7);
        let tree = DecisionTree::fit(&features, &labels, &indices, &TreeParams::default(), &mut rng);
        assert_eq!(tree.num_nodes(), 1);
        assert_eq!(tree.predict(&[1.0; NUM_FEATURES]), 1);
    }

    #[test]
    fn test_deterministic_given_seed() {
        let (features, labels) = simple_dataset();
        let indices: Vec<usize> = (0..features.len()).collect();
        let params = TreeParams::default();

        let tree_a = DecisionTree::fit(
            &features,
            &labels,
            &indices,
            &params,
            &mut StdRng::seed_from_u64(42),
        );
        let tree_b = DecisionTree::fit(
            &features,
            &labels,
            &indices,
            &params,
            &mut StdRng::seed_from_u64(42),
        );

        let json_a = serde_json::to_string(&tree_a).unwrap();
        let json_b = serde_json::to_string(&tree_b).unwrap();
        assert_eq!(json_a, json_b);
    }

    #[test]
    fn test_serde_round_trip() {
        let (features, labels) = simple_dataset();
        let indices: Vec<usize> = (0..features.len()).collect();
        let mut rng = StdRng::seed_from_u64(3);
        let tree =
            DecisionTree::fit(&features, &labels, &indices, &TreeParams::default(), &mut rng);

        let json = serde_json::to_string(&tree).unwrap();
        let restored: DecisionTree = serde_json::from_str(&json).unwrap();
        for f in &features {
            assert_eq!(tree.predict(f), restored.predict(f));
        }
    }
}
