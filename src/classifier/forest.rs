//! Random Forest implementation

use num::{PrimInt, Signed};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    classifier::{tree::{DecisionTree, TreeConfig}, Classifier},
    error::{Error, Result},
    vectorizer::FeatureMatrix,
};

/// Random Forest configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    /// Number of trees in the forest
    pub n_trees: usize,
    /// Maximum depth of each tree
    pub max_depth: usize,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Features per split (sqrt of total if None)
    pub max_features: Option<usize>,
    /// Bootstrap sampling
    pub bootstrap: bool,
    /// Random seed; tree `i` uses `seed + i`
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 64,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: true,
            seed: 42,
        }
    }
}

impl ForestConfig {
    /// Reject settings that cannot train
    pub fn validate(&self) -> Result<()> {
        if self.n_trees == 0 {
            return Err(Error::config("forest needs at least one tree"));
        }
        if self.max_features == Some(0) {
            return Err(Error::config("max_features must be positive"));
        }
        Ok(())
    }
}

/// Random forest of CART trees, majority vote
///
/// Trees are trained and queried in parallel with rayon. Each tree draws
/// its bootstrap sample and split features from its own seeded ChaCha8
/// stream, so a fixed seed gives the same forest on every run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    config: ForestConfig,
    trees: Vec<DecisionTree>,
    n_classes: usize,
    n_features: usize,
}

impl RandomForest {
    /// Create a new random forest
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            n_classes: 0,
            n_features: 0,
        }
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Number of trees
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }

    /// Feature width seen at fit time
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Per-label vote counts for one row
    fn votes<N>(&self, row: &[N]) -> Vec<usize>
    where
        N: PrimInt,
    {
        let mut votes = vec![0usize; self.n_classes];
        for tree in &self.trees {
            if let Some(label) = tree.predict_one(row) {
                votes[label as usize] += 1;
            }
        }
        votes
    }

    /// Fraction of trees voting for each label
    ///
    /// # Returns
    /// * `Result<Vec<f64>>` - one share per label; `Classifier` error before
    ///   `fit` or when `row` is not `n_features` wide
    pub fn vote_shares<N>(&self, row: &[N]) -> Result<Vec<f64>>
    where
        N: PrimInt,
    {
        if !self.is_fitted() {
            return Err(Error::classifier("vote_shares called before fit"));
        }
        if row.len() != self.n_features {
            return Err(Error::classifier(format!(
                "expected {} features, got {}",
                self.n_features,
                row.len()
            )));
        }
        let total = self.trees.len() as f64;
        Ok(self.votes(row).into_iter().map(|v| v as f64 / total).collect())
    }

    fn predict_row<N>(&self, row: &[N]) -> u8
    where
        N: PrimInt,
    {
        let votes = self.votes(row);
        let mut best = 0usize;
        for (label, &count) in votes.iter().enumerate() {
            if count > votes[best] {
                best = label;
            }
        }
        best as u8
    }
}

impl<N> Classifier<N> for RandomForest
where
    N: PrimInt + Signed + Send + Sync,
{
    fn fit(&mut self, features: &FeatureMatrix<N>, labels: &[u8]) -> Result<()> {
        self.config.validate()?;
        if features.is_empty() {
            return Err(Error::classifier("cannot fit on an empty feature matrix"));
        }
        if features.n_rows() != labels.len() {
            return Err(Error::classifier(format!(
                "{} feature rows but {} labels",
                features.n_rows(),
                labels.len()
            )));
        }

        let n_samples = features.n_rows();
        let n_features = features.n_features();
        let n_classes = labels.iter().copied().max().map_or(0, |m| m as usize + 1);
        // default: sqrt of the feature count
        let max_features = self
            .config
            .max_features
            .unwrap_or_else(|| (n_features as f64).sqrt().ceil() as usize)
            .clamp(1, n_features.max(1));
        let tree_config = TreeConfig {
            max_depth: self.config.max_depth,
            min_samples_split: self.config.min_samples_split,
            min_samples_leaf: self.config.min_samples_leaf,
            max_features: Some(max_features),
        };

        info!(
            trees = self.config.n_trees,
            samples = n_samples,
            features = n_features,
            max_features,
            "training random forest"
        );

        let rows = features.rows();
        let config = &self.config;
        let trees: Vec<DecisionTree> = (0..config.n_trees)
            .into_par_iter()
            .map(|i| {
                let mut rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(i as u64));
                let sample: Vec<usize> = if config.bootstrap {
                    (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect()
                } else {
                    (0..n_samples).collect()
                };
                let mut tree = DecisionTree::new(tree_config.clone());
                tree.fit(rows, labels, &sample, n_classes, &mut rng);
                tree
            })
            .collect();

        debug!(
            mean_depth = trees.iter().map(|t| t.depth()).sum::<usize>() as f64 / trees.len() as f64,
            "forest trained"
        );

        self.trees = trees;
        self.n_classes = n_classes;
        self.n_features = n_features;
        Ok(())
    }

    fn predict(&self, features: &FeatureMatrix<N>) -> Result<Vec<u8>> {
        if !self.is_fitted() {
            return Err(Error::classifier("predict called before fit"));
        }
        if features.n_features() != self.n_features {
            return Err(Error::classifier(format!(
                "expected {} features, got {}",
                self.n_features,
                features.n_features()
            )));
        }
        Ok(features
            .rows()
            .par_iter()
            .map(|row| self.predict_row(row))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// label follows the sign of column 0, other columns are noise
    fn toy(n: usize) -> (FeatureMatrix<i32>, Vec<u8>) {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..n {
            let signal = (i % 3) as i32 - 1;
            rows.push(vec![signal, (i % 5) as i32, (i % 2) as i32]);
            labels.push(match signal {
                1 => 0,
                -1 => 1,
                _ => 2,
            });
        }
        (FeatureMatrix::from_rows(rows, 3).unwrap(), labels)
    }

    fn small_config() -> ForestConfig {
        ForestConfig {
            n_trees: 15,
            max_features: Some(3),
            ..Default::default()
        }
    }

    #[test]
    fn learns_a_separable_problem() {
        let (x, y) = toy(90);
        let mut forest = RandomForest::new(small_config());
        forest.fit(&x, &y).unwrap();
        assert_eq!(forest.n_trees(), 15);

        let predictions = forest.predict(&x).unwrap();
        let correct = predictions.iter().zip(&y).filter(|(p, l)| p == l).count();
        assert!(correct as f64 / y.len() as f64 > 0.95);
    }

    #[test]
    fn same_seed_same_predictions() {
        let (x, y) = toy(60);
        let mut a = RandomForest::new(ForestConfig { n_trees: 8, ..Default::default() });
        let mut b = RandomForest::new(ForestConfig { n_trees: 8, ..Default::default() });
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();
        assert_eq!(a.predict(&x).unwrap(), b.predict(&x).unwrap());
    }

    #[test]
    fn vote_shares_sum_to_one() {
        let (x, y) = toy(30);
        let mut forest = RandomForest::new(small_config());
        forest.fit(&x, &y).unwrap();
        let shares = forest.vote_shares(&x[0]).unwrap();
        assert_eq!(shares.len(), 3);
        assert!((shares.iter().sum::<f64>() - 1.0).abs() < 1e-9);

        assert!(matches!(forest.vote_shares(&[1i32]), Err(Error::Classifier(_))));
        assert!(matches!(forest.vote_shares(&[1i32, 2, 3, 4]), Err(Error::Classifier(_))));
        let unfitted = RandomForest::new(small_config());
        assert!(matches!(unfitted.vote_shares(&x[0]), Err(Error::Classifier(_))));
    }

    #[test]
    fn rejects_bad_input() {
        let (x, y) = toy(10);
        let mut forest = RandomForest::new(small_config());

        assert!(matches!(forest.predict(&x), Err(Error::Classifier(_))));
        assert!(matches!(forest.fit(&x, &y[..5]), Err(Error::Classifier(_))));
        assert!(matches!(forest.fit(&FeatureMatrix::<i32>::new(3), &[]), Err(Error::Classifier(_))));

        forest.fit(&x, &y).unwrap();
        let narrow = FeatureMatrix::from_rows(vec![vec![1, 2]], 2).unwrap();
        assert!(matches!(forest.predict(&narrow), Err(Error::Classifier(_))));

        let mut empty = RandomForest::new(ForestConfig { n_trees: 0, ..Default::default() });
        assert!(matches!(empty.fit(&x, &y), Err(Error::Config(_))));
    }

    #[test]
    fn zero_width_matrix_predicts_majority() {
        let x = FeatureMatrix::<i32>::from_rows(vec![vec![], vec![], vec![]], 0).unwrap();
        let y = vec![2, 2, 0];
        let mut forest = RandomForest::new(ForestConfig { n_trees: 3, bootstrap: false, ..Default::default() });
        forest.fit(&x, &y).unwrap();
        assert_eq!(forest.predict(&x).unwrap(), vec![2, 2, 2]);
    }
}
