pub mod tree;
pub mod forest;
pub mod metrics;

use num::{PrimInt, Signed};

use crate::{error::Result, vectorizer::FeatureMatrix};

/// Classifier consuming count matrices and integer labels
///
/// Labels are `SentimentTag::label` values. `predict` returns one label
/// per row of `features`.
pub trait Classifier<N = i32>
where
    N: PrimInt + Signed,
{
    fn fit(&mut self, features: &FeatureMatrix<N>, labels: &[u8]) -> Result<()>;

    fn predict(&self, features: &FeatureMatrix<N>) -> Result<Vec<u8>>;
}
