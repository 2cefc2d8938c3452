/// This crate is a tweet sentiment classifier built on bag-of-words count vectors.
pub mod error;
pub mod dataset;
pub mod text;
pub mod vectorizer;
pub mod classifier;
pub mod config;
pub mod pipeline;

/// Error and Result types
/// Every fallible operation of this crate returns `Result<T>`.
///
/// - `InvalidPattern`: a record line or sentiment word did not match; carries
///   the offending string and, when it came from a file, the 1-based line number
/// - `Config`: a collaborator could not be built (unknown locale, stemmer, ...)
/// - `Classifier`: training or prediction on unusable input
/// - `Io`, `Yaml`, `Cbor`: wrapped library errors
pub use error::{Error, Result};

/// Sentiment Tag
/// The three sentiment classes of the dataset, parsed from the exact words
/// `positive`, `negative` and `neutral`.
///
/// Each tag maps to a fixed integer label used by the classifier:
/// - Positive: 0
/// - Negative: 1
/// - Neutral: 2
pub use dataset::sentiment::{parse_sentiment, SentimentTag};

/// Data Point and Dataset
/// A `DataPoint` is one labeled tweet: its `SentimentTag` and its token sequence.
/// A `Dataset` is an ordered list of data points, usually one split (train or test).
///
/// The tag never changes after loading; preprocessing replaces the tokens.
pub use dataset::{DataPoint, Dataset};

/// Dataset Loader
/// Reads files of `<id> <sentiment> ["]<text>["]` records, one per line.
///
/// Each record's text goes through the enabled cleaning steps in a fixed order:
/// 1. link removal (`http(s)://www.` links only)
/// 2. removal of textual `\uXXXX` escapes
/// 3. deletion of the punctuation characters in `PUNCTUATION`
///
/// then through the tokenizer. A single malformed line aborts the whole load.
pub use dataset::loader::{load_dataset, CleaningOptions, DatasetLoader};

/// Text Processing Traits
/// Seams for swapping the text collaborators:
/// - `Tokenizer`: text to token sequence
/// - `StopwordSource`: stopword set for a locale
/// - `TokenNormalizer`: one-token rewrite (stemmer, lemmatizer)
pub use text::{StopwordSource, TokenNormalizer, Tokenizer};

/// Default text collaborators
/// - `WordTokenizer`: regex word/symbol tokenizer
/// - `StopWords`: stopword lists from the `stop-words` crate
/// - `SnowballStemmer`: Snowball stemmers from `rust-stemmers`
/// - `Lemmatizer`: rule-based English noun lemmatizer
pub use text::{
    normalizer::{Lemmatizer, SnowballStemmer, StemmerSpec},
    stopwords::{StaticStopwords, StopWords},
    tokenizer::WordTokenizer,
};

/// Preprocessor
/// Stopword removal followed by optional normalization (lowercase, stem, lemmatize).
///
/// Stopwords are removed before lowercasing and the match is case-sensitive.
pub use text::preprocess::{PreprocessOptions, Preprocessor};

/// Vocabulary
/// The closed set of distinct tokens seen in the training split, with a fixed
/// token -> dimension mapping in first-seen order.
///
/// # Serialization
/// Supported (serde, CBOR helpers included).
pub use vectorizer::vocabulary::{build_vocabulary, Vocabulary};

/// Bag-of-Words Vectorizer
/// Turns token sequences into dense signed count vectors over a `Vocabulary`.
///
/// The token `"not"` flips the sign of every later count in the same sequence.
/// Out-of-vocabulary tokens are dropped. Optionally, negative counts are
/// clamped to 0 after each vector is built.
///
/// `FeatureMatrix<N>` holds the result, one row per data point; `N` is the
/// signed integer type of the counts (e.g. i16, i32, i64).
pub use vectorizer::{vectorize, BagOfWordsVectorizer, FeatureMatrix, NEGATION_TOKEN};

/// Classifier Trait and Random Forest
/// `Classifier<N>` consumes a `FeatureMatrix<N>` and integer labels.
///
/// `RandomForest` is the default implementation: bagged CART trees with Gini
/// impurity and per-split feature sub-sampling, trained in parallel with rayon.
/// A fixed seed gives the same forest on every run.
pub use classifier::{
    forest::{ForestConfig, RandomForest},
    Classifier,
};

/// Evaluation Metrics
/// - `ConfusionMatrix`: actual x predicted counts over the three tags
/// - `ClassificationReport`: per-tag precision, recall, F1 and support with
///   accuracy, macro and weighted averages; `Display` renders a table
pub use classifier::metrics::{ClassScores, ClassificationReport, ConfusionMatrix};

/// Pipeline
/// `PipelineConfig` gathers every switch and is loaded from YAML.
/// `SentimentPipeline` builds all collaborators from it and trains a
/// `SentimentModel`, which predicts, evaluates and persists itself as CBOR.
pub use config::PipelineConfig;
pub use pipeline::{SentimentModel, SentimentPipeline};
