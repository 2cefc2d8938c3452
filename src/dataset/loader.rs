use std::{fs, path::Path};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{
    dataset::{sentiment::SentimentTag, DataPoint, Dataset},
    error::{Error, Result},
    text::{tokenizer::WordTokenizer, Tokenizer},
};

/// `<id> <sentiment-word> ["]<text>["]`
const LINE_PATTERN: &str = r#"^(\d+)\s+(\S+)\s+"?(.*?)"?$"#;
/// Only `http(s)://www.<domain>.<tld>[.<tld2>][/<segment>]*`.
/// Ports, query strings and hosts without `www.` stay in the text.
const LINK_PATTERN: &str = r"https?://www\.\w+\.\w+(?:\.\w+)?(?:/\w*)*";
/// Textual `\uXXXX` escapes, not real non-ASCII characters
const UNICODE_ESCAPE_PATTERN: &str = r"\\u[0-9A-Fa-f]+";
/// Deleted outright when stripping punctuation
pub const PUNCTUATION: &[char] = &['#', '@', '.', ';', ',', '?', '!', ':', '-', '%', '\\', '\'', '$'];

/// Text cleaning switches, applied in field order: links, unicode, punctuation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningOptions {
    pub remove_links: bool,
    pub remove_unicode: bool,
    pub strip_punctuation: bool,
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self {
            remove_links: true,
            remove_unicode: true,
            strip_punctuation: true,
        }
    }
}

/// Reads labeled tweet files into a [`Dataset`]
///
/// Every line must match the record grammar; the first line that does not
/// aborts the load and no partial dataset is returned.
pub struct DatasetLoader {
    locale: String,
    options: CleaningOptions,
    tokenizer: Box<dyn Tokenizer>,
    line_re: Regex,
    link_re: Regex,
    unicode_re: Regex,
}

impl DatasetLoader {
    /// Loader with the default [`WordTokenizer`]
    pub fn new(locale: impl Into<String>, options: CleaningOptions) -> Result<Self> {
        Self::with_tokenizer(locale, options, Box::new(WordTokenizer::new()?))
    }

    pub fn with_tokenizer(
        locale: impl Into<String>,
        options: CleaningOptions,
        tokenizer: Box<dyn Tokenizer>,
    ) -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| Error::config(format!("failed to build pattern {pattern:?}: {e}")))
        };
        Ok(Self {
            locale: locale.into(),
            options,
            tokenizer,
            line_re: compile(LINE_PATTERN)?,
            link_re: compile(LINK_PATTERN)?,
            unicode_re: compile(UNICODE_ESCAPE_PATTERN)?,
        })
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn options(&self) -> CleaningOptions {
        self.options
    }

    /// Apply the enabled cleaning steps in their fixed order
    pub fn clean_text(&self, text: &str) -> String {
        let mut text = text.to_string();
        if self.options.remove_links {
            text = self.link_re.replace_all(&text, "").into_owned();
        }
        if self.options.remove_unicode {
            text = self.unicode_re.replace_all(&text, "").into_owned();
        }
        if self.options.strip_punctuation {
            text.retain(|c| !PUNCTUATION.contains(&c));
        }
        text
    }

    /// Clean then tokenize free text, as done for each record
    pub fn tokenize_text(&self, text: &str) -> Vec<String> {
        self.tokenizer.tokenize(&self.clean_text(text), &self.locale)
    }

    /// Parse one record line
    ///
    /// # Arguments
    /// * `line` - record without its line terminator
    ///
    /// # Returns
    /// * `Result<DataPoint>` - `InvalidPattern` when the grammar or the sentiment word does not match
    pub fn parse_line(&self, line: &str) -> Result<DataPoint> {
        let caps = self
            .line_re
            .captures(line)
            .ok_or_else(|| Error::invalid_pattern(line))?;
        // groups 2 and 3 always participate in a match
        let tag = SentimentTag::parse(&caps[2])?;
        Ok(DataPoint {
            tag,
            tokens: self.tokenize_text(&caps[3]),
        })
    }

    /// Parse a whole file's content
    pub fn load_str(&self, content: &str) -> Result<Dataset> {
        let mut dataset = Dataset::new();
        for (idx, raw) in content.lines().enumerate() {
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            let point = self.parse_line(line).map_err(|e| {
                error!(line = idx + 1, error = %e, "invalid record, aborting load");
                e.at_line(idx + 1)
            })?;
            dataset.push(point);
        }
        Ok(dataset)
    }

    /// Read and parse a dataset file
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Dataset> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let dataset = self.load_str(&content)?;
        let [positive, negative, neutral] = dataset.tag_counts();
        info!(
            path = %path.display(),
            points = dataset.len(),
            positive,
            negative,
            neutral,
            "loaded dataset"
        );
        Ok(dataset)
    }
}

impl std::fmt::Debug for DatasetLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetLoader")
            .field("locale", &self.locale)
            .field("options", &self.options)
            .finish()
    }
}

/// Load a dataset file with the default tokenizer
///
/// # Arguments
/// * `path` - dataset file
/// * `locale` - tokenizer language, `"english"` in the usual setup
/// * `remove_unicode`, `remove_links`, `strip_punctuation` - cleaning switches
pub fn load_dataset(
    path: impl AsRef<Path>,
    locale: &str,
    remove_unicode: bool,
    remove_links: bool,
    strip_punctuation: bool,
) -> Result<Dataset> {
    let options = CleaningOptions {
        remove_links,
        remove_unicode,
        strip_punctuation,
    };
    DatasetLoader::new(locale, options)?.load(path)
}
