pub mod tokenizer;
pub mod stopwords;
pub mod normalizer;
pub mod preprocess;

use std::collections::HashSet;

use crate::error::Result;

/// Splits cleaned text into word tokens
pub trait Tokenizer {
    /// # Arguments
    /// * `text` - cleaned tweet text
    /// * `locale` - language name, e.g. `"english"`
    fn tokenize(&self, text: &str, locale: &str) -> Vec<String>;
}

/// Provides the stopword list of a language
pub trait StopwordSource {
    /// Returns a `Config` error when the locale has no list
    fn stopwords_for(&self, locale: &str) -> Result<HashSet<String>>;
}

/// Maps one token to its canonical form (stemmers, lemmatizers)
pub trait TokenNormalizer {
    fn normalize_one(&self, token: &str) -> String;

    /// Name used in logs
    fn name(&self) -> &str;
}
