//! Pipeline configuration, loaded from YAML

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    classifier::forest::ForestConfig,
    dataset::loader::CleaningOptions,
    error::Result,
    text::preprocess::PreprocessOptions,
};

fn default_locale() -> String {
    "english".to_string()
}

/// Everything needed to rebuild a pipeline
///
/// Every field has a default, so an empty YAML document is valid.
///
/// ```yaml
/// locale: english
/// cleaning:
///   remove_links: true
///   remove_unicode: true
///   strip_punctuation: true
/// preprocess:
///   remove_stopwords: true
///   normalize: true
///   lowercase: true
///   stemmer:
///     algorithm: english
///   lemmatize: false
/// clamp_non_negative: false
/// forest:
///   n_trees: 100
///   seed: 42
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Tokenizer and stopword language
    #[serde(default = "default_locale")]
    pub locale: String,
    pub cleaning: CleaningOptions,
    pub preprocess: PreprocessOptions,
    /// Replace negative counts by 0 after vectorization
    pub clamp_non_negative: bool,
    pub forest: ForestConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            cleaning: CleaningOptions::default(),
            preprocess: PreprocessOptions::default(),
            clamp_non_negative: false,
            forest: ForestConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load configuration from YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
