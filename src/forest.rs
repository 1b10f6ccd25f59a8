use rand::prelude::*;
use rand::rngs::StdRng;

use crate::error::{Error, Result};

/// The capability the feature pipeline needs from a model: fit on a numeric
/// feature matrix with binary labels, then give point predictions and
/// positive-class probabilities. Any comparable classifier can stand in for
/// the default forest.
pub trait BinaryClassifier {
    fn fit(&mut self, x: &[Vec<f64>], y: &[u8]);
    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<u8>>;
    /// Probability of the positive class for one feature vector, in [0, 1].
    fn predict_proba(&self, features: &[f64]) -> Result<f64>;
}

/// Bagged ensemble of gini-split decision trees. Each tree is grown on a
/// bootstrap resample with sqrt-of-features subsampling at every split; the
/// seeded RNG keeps runs reproducible.
pub struct RandomForest {
    n_trees: usize,
    min_samples_split: usize,
    seed: u64,
    trees: Vec<TreeNode>,
}

impl RandomForest {
    pub fn new(n_trees: usize, min_samples_split: usize, seed: u64) -> Self {
        Self {
            n_trees: n_trees.max(1),
            min_samples_split: min_samples_split.max(2),
            seed,
            trees: Vec::new(),
        }
    }

    /// 100 trees, minimum 10 samples to split a node, fixed seed.
    pub fn default_model() -> Self {
        Self::new(100, 10, 1)
    }
}

impl BinaryClassifier for RandomForest {
    fn fit(&mut self, x: &[Vec<f64>], y: &[u8]) {
        self.trees.clear();
        if x.is_empty() || x.len() != y.len() {
            return;
        }

        let n_samples = x.len();
        let n_features = x[0].len();
        let features_per_split = (n_features as f64).sqrt().ceil() as usize;

        let mut rng = StdRng::seed_from_u64(self.seed);
        for _ in 0..self.n_trees {
            let indices: Vec<usize> = (0..n_samples)
                .map(|_| rng.gen_range(0..n_samples))
                .collect();
            let boot_x: Vec<&Vec<f64>> = indices.iter().map(|&i| &x[i]).collect();
            let boot_y: Vec<f64> = indices.iter().map(|&i| y[i] as f64).collect();
            self.trees.push(build_tree(
                &boot_x,
                &boot_y,
                self.min_samples_split,
                features_per_split,
                &mut rng,
            ));
        }
    }

    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<u8>> {
        x.iter()
            .map(|row| self.predict_proba(row).map(|p| u8::from(p >= 0.5)))
            .collect()
    }

    fn predict_proba(&self, features: &[f64]) -> Result<f64> {
        if self.trees.is_empty() {
            return Err(Error::ModelNotTrained);
        }
        let sum: f64 = self
            .trees
            .iter()
            .map(|tree| predict_tree(tree, features))
            .sum();
        Ok(sum / self.trees.len() as f64)
    }
}

#[derive(Debug)]
enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

fn leaf(labels: &[f64]) -> TreeNode {
    TreeNode::Leaf {
        value: labels.iter().sum::<f64>() / labels.len().max(1) as f64,
    }
}

fn build_tree(
    features: &[&Vec<f64>],
    labels: &[f64],
    min_samples_split: usize,
    features_per_split: usize,
    rng: &mut StdRng,
) -> TreeNode {
    if labels.len() < min_samples_split {
        return leaf(labels);
    }

    let first = labels[0];
    if labels.iter().all(|&l| (l - first).abs() < 1e-10) {
        return TreeNode::Leaf { value: first };
    }

    let n_features = features[0].len();
    let mut feature_indices: Vec<usize> = (0..n_features).collect();
    feature_indices.shuffle(rng);
    feature_indices.truncate(features_per_split.max(1));

    let mut best_gini = f64::MAX;
    let mut best_feature = 0;
    let mut best_threshold = 0.0;

    for &feat_idx in &feature_indices {
        let mut values: Vec<f64> = features.iter().map(|f| f[feat_idx]).collect();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        values.dedup();
        if values.len() < 2 {
            continue;
        }

        // Candidate thresholds between consecutive values, subsampled to keep
        // wide features cheap.
        let step = (values.len() / 10).max(1);
        for i in (0..values.len() - 1).step_by(step) {
            let threshold = (values[i] + values[i + 1]) / 2.0;
            let gini = split_gini(features, labels, feat_idx, threshold);
            if gini < best_gini {
                best_gini = gini;
                best_feature = feat_idx;
                best_threshold = threshold;
            }
        }
    }

    if best_gini >= gini_impurity(labels) {
        return leaf(labels);
    }

    let mut left_features = Vec::new();
    let mut left_labels = Vec::new();
    let mut right_features = Vec::new();
    let mut right_labels = Vec::new();

    for (i, feat) in features.iter().enumerate() {
        if feat[best_feature] <= best_threshold {
            left_features.push(*feat);
            left_labels.push(labels[i]);
        } else {
            right_features.push(*feat);
            right_labels.push(labels[i]);
        }
    }

    if left_features.is_empty() || right_features.is_empty() {
        return leaf(labels);
    }

    TreeNode::Split {
        feature_idx: best_feature,
        threshold: best_threshold,
        left: Box::new(build_tree(
            &left_features,
            &left_labels,
            min_samples_split,
            features_per_split,
            rng,
        )),
        right: Box::new(build_tree(
            &right_features,
            &right_labels,
            min_samples_split,
            features_per_split,
            rng,
        )),
    }
}

fn gini_impurity(labels: &[f64]) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }
    let p = labels.iter().sum::<f64>() / labels.len() as f64;
    2.0 * p * (1.0 - p)
}

fn split_gini(features: &[&Vec<f64>], labels: &[f64], feature_idx: usize, threshold: f64) -> f64 {
    let mut left = Vec::new();
    let mut right = Vec::new();
    for (i, feat) in features.iter().enumerate() {
        if feat[feature_idx] <= threshold {
            left.push(labels[i]);
        } else {
            right.push(labels[i]);
        }
    }

    let n = labels.len() as f64;
    if left.is_empty() || right.is_empty() {
        return f64::MAX;
    }
    (left.len() as f64 / n) * gini_impurity(&left)
        + (right.len() as f64 / n) * gini_impurity(&right)
}

fn predict_tree(node: &TreeNode, features: &[f64]) -> f64 {
    match node {
        TreeNode::Leaf { value } => *value,
        TreeNode::Split {
            feature_idx,
            threshold,
            left,
            right,
        } => {
            if features[*feature_idx] <= *threshold {
                predict_tree(left, features)
            } else {
                predict_tree(right, features)
            }
        }
    }
}
