//! CART decision tree over count features (Gini impurity)

use num::ToPrimitive;
use rand::seq::index;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Decision tree configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum depth of tree
    pub max_depth: usize,
    /// Minimum samples required to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf node
    pub min_samples_leaf: usize,
    /// Features drawn per split (None = all)
    pub max_features: Option<usize>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 64,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
        }
    }
}

/// Tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    Leaf {
        /// majority label
        class: u8,
        /// samples per label reaching this leaf
        counts: Vec<usize>,
    },
    Split {
        feature: usize,
        /// `value <= threshold` goes left
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    fn leaf(counts: Vec<usize>) -> Self {
        TreeNode::Leaf { class: majority(&counts), counts }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }

    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    pub fn n_leaves(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Split { left, right, .. } => left.n_leaves() + right.n_leaves(),
        }
    }
}

/// Decision Tree classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    config: TreeConfig,
    root: Option<TreeNode>,
    n_classes: usize,
}

#[inline]
fn value<N: ToPrimitive>(v: &N) -> f64 {
    v.to_f64().unwrap_or(0.0)
}

/// Gini impurity of a label histogram
fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

/// Most frequent label, lowest label on ties
fn majority(counts: &[usize]) -> u8 {
    let mut best = 0usize;
    for (label, &count) in counts.iter().enumerate() {
        if count > counts[best] {
            best = label;
        }
    }
    best as u8
}

impl DecisionTree {
    pub fn new(config: TreeConfig) -> Self {
        Self {
            config,
            root: None,
            n_classes: 0,
        }
    }

    /// Train on the rows listed in `sample` (duplicates allowed, for bootstrap)
    ///
    /// # Arguments
    /// * `rows` - feature rows, all the same width
    /// * `labels` - one label per row, each `< n_classes`
    /// * `sample` - row indices to train on
    /// * `n_classes` - label count
    /// * `rng` - drives feature sub-sampling
    pub fn fit<N: ToPrimitive>(
        &mut self,
        rows: &[Vec<N>],
        labels: &[u8],
        sample: &[usize],
        n_classes: usize,
        rng: &mut ChaCha8Rng,
    ) {
        self.n_classes = n_classes;
        let n_features = rows.first().map_or(0, |r| r.len());
        self.root = Some(self.build(rows, labels, sample.to_vec(), n_features, 0, rng));
    }

    fn class_counts(&self, labels: &[u8], indices: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_classes];
        for &i in indices {
            counts[labels[i] as usize] += 1;
        }
        counts
    }

    fn build<N: ToPrimitive>(
        &self,
        rows: &[Vec<N>],
        labels: &[u8],
        indices: Vec<usize>,
        n_features: usize,
        depth: usize,
        rng: &mut ChaCha8Rng,
    ) -> TreeNode {
        let counts = self.class_counts(labels, &indices);
        let n = indices.len();
        let impurity = gini(&counts, n);

        if depth >= self.config.max_depth
            || n < self.config.min_samples_split
            || impurity <= f64::EPSILON
        {
            return TreeNode::leaf(counts);
        }

        let Some((feature, threshold)) = self.best_split(rows, labels, &indices, &counts, n_features, rng) else {
            return TreeNode::leaf(counts);
        };

        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| value(&rows[i][feature]) <= threshold);

        let left = self.build(rows, labels, left, n_features, depth + 1, rng);
        let right = self.build(rows, labels, right, n_features, depth + 1, rng);
        TreeNode::Split {
            feature,
            threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Best (feature, threshold) among a random feature subset, by Gini gain.
    /// Candidate thresholds are midpoints between consecutive distinct values.
    fn best_split<N: ToPrimitive>(
        &self,
        rows: &[Vec<N>],
        labels: &[u8],
        indices: &[usize],
        parent_counts: &[usize],
        n_features: usize,
        rng: &mut ChaCha8Rng,
    ) -> Option<(usize, f64)> {
        if n_features == 0 {
            return None;
        }
        let n = indices.len();
        let parent_impurity = gini(parent_counts, n);
        let max_features = self.config.max_features.unwrap_or(n_features).clamp(1, n_features);
        let min_leaf = self.config.min_samples_leaf.max(1);

        let mut best_gain = 0.0;
        let mut best: Option<(usize, f64)> = None;
        let mut pairs: Vec<(f64, u8)> = Vec::with_capacity(n);

        for feature in index::sample(rng, n_features, max_features).into_iter() {
            pairs.clear();
            pairs.extend(indices.iter().map(|&i| (value(&rows[i][feature]), labels[i])));
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
            // constant feature in this node
            if pairs[0].0 == pairs[n - 1].0 {
                continue;
            }

            let mut left_counts = vec![0usize; self.n_classes];
            let mut right_counts = parent_counts.to_vec();
            for k in 0..n - 1 {
                let label = pairs[k].1 as usize;
                left_counts[label] += 1;
                right_counts[label] -= 1;
                if pairs[k].0 == pairs[k + 1].0 {
                    continue;
                }
                let n_left = k + 1;
                let n_right = n - n_left;
                if n_left < min_leaf || n_right < min_leaf {
                    continue;
                }
                let weighted = (n_left as f64 * gini(&left_counts, n_left)
                    + n_right as f64 * gini(&right_counts, n_right))
                    / n as f64;
                let gain = parent_impurity - weighted;
                if gain > best_gain {
                    best_gain = gain;
                    best = Some((feature, (pairs[k].0 + pairs[k + 1].0) / 2.0));
                }
            }
        }
        best
    }

    /// Predicted label, `None` before `fit`
    pub fn predict_one<N: ToPrimitive>(&self, row: &[N]) -> Option<u8> {
        let mut node = self.root.as_ref()?;
        loop {
            match node {
                TreeNode::Leaf { class, .. } => return Some(*class),
                TreeNode::Split { feature, threshold, left, right } => {
                    node = if value(&row[*feature]) <= *threshold { left } else { right };
                }
            }
        }
    }

    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_ref()
    }

    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, |r| r.depth())
    }

    pub fn n_leaves(&self) -> usize {
        self.root.as_ref().map_or(0, |r| r.n_leaves())
    }
}
