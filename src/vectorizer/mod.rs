pub mod vocabulary;

use std::ops::Index;

use num::{PrimInt, Signed};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{dataset::Dataset, vectorizer::vocabulary::Vocabulary};

/// Token that flips the sign of every later count in the same sequence
pub const NEGATION_TOKEN: &str = "not";

/// Dense count vectors, one row per data point
///
/// `N` is the signed integer type of the counts (default `i32`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureMatrix<N = i32>
where
    N: PrimInt + Signed,
{
    rows: Vec<Vec<N>>,
    n_features: usize,
}

impl<N> FeatureMatrix<N>
where
    N: PrimInt + Signed,
{
    /// Empty matrix with a fixed row width
    pub fn new(n_features: usize) -> Self {
        Self { rows: Vec::new(), n_features }
    }

    /// Build from rows.
    /// Returns `None` when a row's length differs from `n_features`.
    pub fn from_rows(rows: Vec<Vec<N>>, n_features: usize) -> Option<Self> {
        if rows.iter().any(|r| r.len() != n_features) {
            return None;
        }
        Some(Self { rows, n_features })
    }

    fn push(&mut self, row: Vec<N>) {
        debug_assert_eq!(row.len(), self.n_features);
        self.rows.push(row);
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<N>] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vec<N>> {
        self.rows.iter()
    }

    pub fn into_rows(self) -> Vec<Vec<N>> {
        self.rows
    }
}

impl<N> Index<usize> for FeatureMatrix<N>
where
    N: PrimInt + Signed,
{
    type Output = [N];

    fn index(&self, row: usize) -> &[N] {
        &self.rows[row]
    }
}

/// Bag-of-words vectorizer with negation inversion
///
/// For each token, in order:
/// - out-of-vocabulary tokens are skipped (and never flip the sign)
/// - the token's dimension gets the current sign added (`+1` or `-1`),
///   saturating at `N::min_value()` / `N::max_value()`
/// - `"not"` then flips the sign for the rest of the sequence
///
/// With `clamp_non_negative`, negative entries become 0 once the whole
/// vector is built.
///
/// # Examples
/// ```
/// use bow_sentiment::{BagOfWordsVectorizer, Vocabulary};
/// let vocab = Vocabulary::from(&["did", "good", "not", "went"][..]);
/// let vectorizer = BagOfWordsVectorizer::new(&vocab);
/// let v: Vec<i32> = vectorizer.vectorize_tokens(&["did", "not", "good"]);
/// assert_eq!(v, vec![1, -1, 1, 0]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BagOfWordsVectorizer<'a> {
    vocabulary: &'a Vocabulary,
    clamp_non_negative: bool,
}

impl<'a> BagOfWordsVectorizer<'a> {
    pub fn new(vocabulary: &'a Vocabulary) -> Self {
        Self {
            vocabulary,
            clamp_non_negative: false,
        }
    }

    /// Replace negative counts by 0 after each vector is built
    pub fn clamp_non_negative(mut self, clamp: bool) -> Self {
        self.clamp_non_negative = clamp;
        self
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        self.vocabulary
    }

    /// Vectorize one token sequence
    ///
    /// # Arguments
    /// * `tokens` - preprocessed tokens of one data point
    ///
    /// # Returns
    /// * `Vec<N>` - length is always the vocabulary size
    pub fn vectorize_tokens<N, T>(&self, tokens: &[T]) -> Vec<N>
    where
        N: PrimInt + Signed,
        T: AsRef<str>,
    {
        let mut vector = vec![N::zero(); self.vocabulary.len()];
        let mut sign = N::one();
        for token in tokens {
            let token = token.as_ref();
            let Some(idx) = self.vocabulary.index_of(token) else {
                continue;
            };
            vector[idx] = vector[idx].saturating_add(sign);
            if token == NEGATION_TOKEN {
                sign = -sign;
            }
        }
        if self.clamp_non_negative {
            for value in vector.iter_mut() {
                if value.is_negative() {
                    *value = N::zero();
                }
            }
        }
        vector
    }

    /// Vectorize every data point; rows are index-aligned with `dataset`
    pub fn transform<N>(&self, dataset: &Dataset) -> FeatureMatrix<N>
    where
        N: PrimInt + Signed,
    {
        let mut matrix = FeatureMatrix::new(self.vocabulary.len());
        for point in dataset {
            matrix.push(self.vectorize_tokens(&point.tokens));
        }
        debug!(
            rows = matrix.n_rows(),
            features = matrix.n_features(),
            clamp = self.clamp_non_negative,
            "vectorized dataset"
        );
        matrix
    }
}

/// Free-function form: one count vector per data point
pub fn vectorize<N>(vocabulary: &Vocabulary, dataset: &Dataset, clamp_non_negative: bool) -> FeatureMatrix<N>
where
    N: PrimInt + Signed,
{
    BagOfWordsVectorizer::new(vocabulary)
        .clamp_non_negative(clamp_non_negative)
        .transform(dataset)
}
