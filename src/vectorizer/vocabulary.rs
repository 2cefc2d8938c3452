use std::{fs, path::Path};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::{dataset::Dataset, error::Result};

/// Feature vocabulary
/// Distinct tokens of the training split with a fixed token -> index mapping.
///
/// Indices follow first-seen order over the training data. Consumers must
/// treat this order as the authoritative dimension order for the run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    tokens: IndexSet<String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self { tokens: IndexSet::new() }
    }

    /// Union of every data point's tokens.
    /// Build this from the training split only.
    pub fn build(dataset: &Dataset) -> Self {
        let mut vocab = Self::new();
        for point in dataset {
            vocab.add_tokens(&point.tokens);
        }
        vocab
    }

    /// Add tokens not seen yet; existing indices never move
    pub fn add_tokens<T>(&mut self, tokens: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for token in tokens {
            let token = token.as_ref();
            if !self.tokens.contains(token) {
                self.tokens.insert(token.to_string());
            }
        }
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Dimension of `token`, `None` when out of vocabulary
    #[inline]
    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.tokens.get_index_of(token)
    }

    /// Token at dimension `index`
    #[inline]
    pub fn token_at(&self, index: usize) -> Option<&str> {
        self.tokens.get_index(index).map(|s| s.as_str())
    }

    #[inline]
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    /// Tokens in dimension order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|s| s.as_str())
    }

    pub fn to_cbor(&self) -> Result<Vec<u8>> {
        Ok(serde_cbor::to_vec(self)?)
    }

    pub fn from_cbor(bytes: &[u8]) -> Result<Self> {
        Ok(serde_cbor::from_slice(bytes)?)
    }

    /// Write the vocabulary as CBOR, dimension order preserved
    pub fn save_cbor(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_cbor()?)?;
        Ok(())
    }

    pub fn load_cbor(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_cbor(&fs::read(path)?)
    }
}

impl<T> From<&[T]> for Vocabulary
where
    T: AsRef<str>,
{
    fn from(tokens: &[T]) -> Self {
        let mut vocab = Vocabulary::new();
        vocab.add_tokens(tokens);
        vocab
    }
}

/// Free-function form of [`Vocabulary::build`]
pub fn build_vocabulary(dataset: &Dataset) -> Vocabulary {
    Vocabulary::build(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{sentiment::SentimentTag, DataPoint};

    fn dataset() -> Dataset {
        vec![
            DataPoint::new(SentimentTag::Positive, &["good", "day", "good"]),
            DataPoint::new(SentimentTag::Negative, &["not", "good"]),
            DataPoint::new(SentimentTag::Neutral, &[] as &[&str]),
        ]
        .into()
    }

    #[test]
    fn build_is_the_deduplicated_union() {
        let vocab = build_vocabulary(&dataset());
        assert_eq!(vocab.len(), 3);
        for token in ["good", "day", "not"] {
            assert!(vocab.contains(token));
        }
        assert!(!vocab.contains("Good"));
    }

    #[test]
    fn index_mapping_is_consistent() {
        let vocab = build_vocabulary(&dataset());
        for (i, token) in vocab.iter().enumerate() {
            assert_eq!(vocab.index_of(token), Some(i));
            assert_eq!(vocab.token_at(i), Some(token));
        }
        assert_eq!(vocab.index_of("missing"), None);
        assert_eq!(vocab.token_at(vocab.len()), None);
    }

    #[test]
    fn adding_tokens_never_moves_existing_indices() {
        let mut vocab = Vocabulary::from(&["a", "b"][..]);
        let before: Vec<_> = vocab.iter().map(|s| s.to_string()).collect();
        vocab.add_tokens(&["b", "c", "a"]);
        assert_eq!(vocab.len(), 3);
        for (i, token) in before.iter().enumerate() {
            assert_eq!(vocab.index_of(token), Some(i));
        }
    }

    #[test]
    fn cbor_keeps_dimension_order() {
        let vocab = build_vocabulary(&dataset());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.cbor");
        vocab.save_cbor(&path).unwrap();
        let loaded = Vocabulary::load_cbor(&path).unwrap();
        assert_eq!(loaded.iter().collect::<Vec<_>>(), vocab.iter().collect::<Vec<_>>());
    }

    #[test]
    fn empty_dataset_gives_empty_vocabulary() {
        assert!(build_vocabulary(&Dataset::new()).is_empty());
    }
}
