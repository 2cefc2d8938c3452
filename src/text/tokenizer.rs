use regex::Regex;

use crate::{error::{Error, Result}, text::Tokenizer};

/// word runs, or a single symbol character
const WORD_PATTERN: &str = r"\w+|[^\w\s]";

/// Regex word tokenizer
///
/// Emits runs of word characters and every remaining non-space symbol as
/// its own token. The locale is accepted for interface compatibility; the
/// pattern is Unicode-aware and language independent.
///
/// # Examples
/// ```
/// use bow_sentiment::text::{tokenizer::WordTokenizer, Tokenizer};
/// let tokenizer = WordTokenizer::new().unwrap();
/// assert_eq!(tokenizer.tokenize("did not go \"there\"", "english"),
///     vec!["did", "not", "go", "\"", "there", "\""]);
/// ```
#[derive(Debug, Clone)]
pub struct WordTokenizer {
    pattern: Regex,
}

impl WordTokenizer {
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(WORD_PATTERN)
            .map_err(|e| Error::config(format!("failed to build tokenizer pattern: {e}")))?;
        Ok(Self { pattern })
    }
}

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str, _locale: &str) -> Vec<String> {
        self.pattern
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_words_and_symbols() {
        let tokenizer = WordTokenizer::new().unwrap();
        let tokens = tokenizer.tokenize("Gas by my house hit $3.39 (!!)", "english");
        assert_eq!(
            tokens,
            vec!["Gas", "by", "my", "house", "hit", "$", "3", ".", "39", "(", "!", "!", ")"]
        );
    }

    #[test]
    fn empty_and_blank_text_yield_no_tokens() {
        let tokenizer = WordTokenizer::new().unwrap();
        assert!(tokenizer.tokenize("", "english").is_empty());
        assert!(tokenizer.tokenize("  \t ", "english").is_empty());
    }

    #[test]
    fn keeps_non_ascii_words_whole() {
        let tokenizer = WordTokenizer::new().unwrap();
        assert_eq!(tokenizer.tokenize("café über", "german"), vec!["café", "über"]);
    }
}
