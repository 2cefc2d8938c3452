use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    dataset::{DataPoint, Dataset},
    error::Result,
    text::{normalizer::{Lemmatizer, SnowballStemmer, StemmerSpec}, StopwordSource, TokenNormalizer},
};

/// Serializable preprocessing switches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessOptions {
    pub remove_stopwords: bool,
    pub normalize: bool,
    pub lowercase: bool,
    /// `None` skips stemming
    pub stemmer: Option<StemmerSpec>,
    pub lemmatize: bool,
}

/// Stopword removal and token normalization
///
/// Order is fixed:
/// 1. stopword removal (case-sensitive, on the tokens as loaded)
/// 2. if `normalize`: lowercase, then stemmer, then lemmatizer
///
/// Because stopwords are removed before lowercasing, `"The"` survives a
/// lowercase-only stopword list and comes out as `"the"`.
#[derive(Default)]
pub struct Preprocessor {
    stopwords: Option<HashSet<String>>,
    normalize: bool,
    lowercase: bool,
    stemmer: Option<Box<dyn TokenNormalizer>>,
    lemmatizer: Option<Box<dyn TokenNormalizer>>,
}

impl Preprocessor {
    /// A preprocessor that changes nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every collaborator up front.
    /// A missing stopword list or an unknown stemmer is reported here.
    ///
    /// # Arguments
    /// * `options` - switches
    /// * `locale` - stopword language
    /// * `source` - stopword provider
    pub fn from_options(options: &PreprocessOptions, locale: &str, source: &dyn StopwordSource) -> Result<Self> {
        let mut preprocessor = Self::new()
            .normalize(options.normalize)
            .lowercase(options.lowercase);
        if options.remove_stopwords {
            preprocessor = preprocessor.with_stopwords(source.stopwords_for(locale)?);
        }
        if let Some(spec) = &options.stemmer {
            preprocessor = preprocessor.with_stemmer(Box::new(SnowballStemmer::from_spec(spec)?));
        }
        if options.lemmatize {
            preprocessor = preprocessor.with_lemmatizer(Box::new(Lemmatizer::new()));
        }
        if options.normalize && preprocessor.stemmer.is_some() && preprocessor.lemmatizer.is_some() {
            warn!("both stemmer and lemmatizer configured; tokens are stemmed, then lemmatized");
        }
        if !options.normalize && (options.lowercase || options.stemmer.is_some() || options.lemmatize) {
            warn!("normalization steps configured but `normalize` is off; they will not run");
        }
        Ok(preprocessor)
    }

    /// Enable stopword removal with this set
    pub fn with_stopwords(mut self, stopwords: HashSet<String>) -> Self {
        self.stopwords = Some(stopwords);
        self
    }

    /// The resolved stopword set, `None` when removal is off
    pub fn stopwords(&self) -> Option<&HashSet<String>> {
        self.stopwords.as_ref()
    }

    pub fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    pub fn with_stemmer(mut self, stemmer: Box<dyn TokenNormalizer>) -> Self {
        self.stemmer = Some(stemmer);
        self
    }

    pub fn with_lemmatizer(mut self, lemmatizer: Box<dyn TokenNormalizer>) -> Self {
        self.lemmatizer = Some(lemmatizer);
        self
    }

    /// Run every enabled step over one token sequence
    pub fn process_tokens(&self, mut tokens: Vec<String>) -> Vec<String> {
        if let Some(stopwords) = &self.stopwords {
            tokens.retain(|t| !stopwords.contains(t));
        }
        if !self.normalize {
            return tokens;
        }
        if self.lowercase {
            tokens = tokens.into_iter().map(|t| t.to_lowercase()).collect();
        }
        if let Some(stemmer) = &self.stemmer {
            tokens = tokens.iter().map(|t| stemmer.normalize_one(t)).collect();
        }
        if let Some(lemmatizer) = &self.lemmatizer {
            tokens = tokens.iter().map(|t| lemmatizer.normalize_one(t)).collect();
        }
        tokens
    }

    /// Replace the tokens of one data point; the tag is untouched
    pub fn process_point(&self, point: &mut DataPoint) {
        let tokens = std::mem::take(&mut point.tokens);
        point.tokens = self.process_tokens(tokens);
    }

    /// Preprocess a whole dataset in place
    pub fn apply(&self, dataset: &mut Dataset) {
        let before = dataset.token_sum();
        for point in dataset.iter_mut() {
            self.process_point(point);
        }
        debug!(
            points = dataset.len(),
            tokens_before = before,
            tokens_after = dataset.token_sum(),
            "preprocessed dataset"
        );
    }
}

impl std::fmt::Debug for Preprocessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preprocessor")
            .field("stopwords", &self.stopwords.as_ref().map(|s| s.len()))
            .field("normalize", &self.normalize)
            .field("lowercase", &self.lowercase)
            .field("stemmer", &self.stemmer.as_ref().map(|s| s.name().to_string()))
            .field("lemmatizer", &self.lemmatizer.as_ref().map(|l| l.name().to_string()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dataset::sentiment::SentimentTag, error::Error, text::stopwords::StaticStopwords};

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    /// Stopwords run on the raw tokens, lowercasing afterwards
    #[test]
    fn stopword_removal_runs_before_lowercasing() {
        let options = PreprocessOptions {
            remove_stopwords: true,
            normalize: true,
            lowercase: true,
            ..Default::default()
        };
        let pre = Preprocessor::from_options(&options, "english", &StaticStopwords::new(&["the"])).unwrap();
        assert_eq!(pre.process_tokens(tokens(&["The", "cat"])), tokens(&["the", "cat"]));

        // the exact-case stopword is removed
        assert_eq!(pre.process_tokens(tokens(&["the", "cat"])), tokens(&["cat"]));
    }

    #[test]
    fn capitalised_stopword_in_list_is_removed() {
        let options = PreprocessOptions { remove_stopwords: true, normalize: true, lowercase: true, ..Default::default() };
        let pre = Preprocessor::from_options(&options, "english", &StaticStopwords::new(&["The"])).unwrap();
        assert_eq!(pre.process_tokens(tokens(&["The", "cat"])), tokens(&["cat"]));
    }

    #[test]
    fn normalization_steps_need_normalize_switch() {
        let options = PreprocessOptions { lowercase: true, lemmatize: true, ..Default::default() };
        let pre = Preprocessor::from_options(&options, "english", &StaticStopwords::default()).unwrap();
        assert_eq!(pre.process_tokens(tokens(&["Cats"])), tokens(&["Cats"]));
    }

    #[test]
    fn stemmer_then_lemmatizer_both_apply() {
        let options = PreprocessOptions {
            normalize: true,
            lowercase: true,
            stemmer: Some(StemmerSpec::default()),
            lemmatize: true,
            ..Default::default()
        };
        let pre = Preprocessor::from_options(&options, "english", &StaticStopwords::default()).unwrap();
        // "Parties" -> "parties" -> stem "parti" -> lemma unchanged
        // "Churches" -> "churches" -> stem "church" -> lemma unchanged
        assert_eq!(pre.process_tokens(tokens(&["Parties", "Churches"])), tokens(&["parti", "church"]));
    }

    #[test]
    fn lemmatizer_alone() {
        let pre = Preprocessor::new()
            .normalize(true)
            .with_lemmatizer(Box::new(Lemmatizer::new()));
        assert_eq!(pre.process_tokens(tokens(&["parties", "cats"])), tokens(&["party", "cat"]));
    }

    #[test]
    fn apply_replaces_tokens_and_keeps_tags() {
        let mut dataset: Dataset = vec![
            DataPoint::new(SentimentTag::Negative, &["I", "am", "NOT", "happy"]),
            DataPoint::new(SentimentTag::Neutral, &["the", "END"]),
        ]
        .into();
        let pre = Preprocessor::new()
            .with_stopwords(["the", "am"].iter().map(|s| s.to_string()).collect())
            .normalize(true)
            .lowercase(true);
        pre.apply(&mut dataset);

        assert_eq!(dataset.points[0].tag, SentimentTag::Negative);
        assert_eq!(dataset.points[0].tokens, tokens(&["i", "not", "happy"]));
        assert_eq!(dataset.points[1].tag, SentimentTag::Neutral);
        assert_eq!(dataset.points[1].tokens, tokens(&["end"]));
    }

    #[test]
    fn misconfigured_collaborators_fail_at_setup() {
        let options = PreprocessOptions { remove_stopwords: true, ..Default::default() };
        let err = Preprocessor::from_options(&options, "klingon", &crate::text::stopwords::StopWords).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let options = PreprocessOptions {
            normalize: true,
            stemmer: Some(StemmerSpec { algorithm: "klingon".into() }),
            ..Default::default()
        };
        let err = Preprocessor::from_options(&options, "english", &StaticStopwords::default()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn empty_preprocessor_is_identity() {
        let pre = Preprocessor::new();
        assert_eq!(pre.process_tokens(tokens(&["A", "b"])), tokens(&["A", "b"]));
    }
}
