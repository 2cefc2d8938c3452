use std::collections::HashSet;

use stop_words::LANGUAGE;

use crate::{error::{Error, Result}, text::StopwordSource};

/// Stopword lists shipped with the `stop-words` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct StopWords;

impl StopWords {
    fn language(locale: &str) -> Option<LANGUAGE> {
        match locale {
            "english" => Some(LANGUAGE::English),
            "french" => Some(LANGUAGE::French),
            "german" => Some(LANGUAGE::German),
            "spanish" => Some(LANGUAGE::Spanish),
            "italian" => Some(LANGUAGE::Italian),
            "portuguese" => Some(LANGUAGE::Portuguese),
            "dutch" => Some(LANGUAGE::Dutch),
            "russian" => Some(LANGUAGE::Russian),
            _ => None,
        }
    }
}

impl StopwordSource for StopWords {
    fn stopwords_for(&self, locale: &str) -> Result<HashSet<String>> {
        let language = Self::language(locale)
            .ok_or_else(|| Error::config(format!("no stopword list for locale {locale:?}")))?;
        Ok(stop_words::get(language)
            .into_iter()
            .map(|word| word.to_string())
            .collect())
    }
}

/// Fixed, caller supplied stopword set. Same list for every locale.
#[derive(Debug, Clone, Default)]
pub struct StaticStopwords {
    words: HashSet<String>,
}

impl StaticStopwords {
    pub fn new<T>(words: &[T]) -> Self
    where
        T: AsRef<str>,
    {
        Self {
            words: words.iter().map(|w| w.as_ref().to_string()).collect(),
        }
    }
}

impl StopwordSource for StaticStopwords {
    fn stopwords_for(&self, _locale: &str) -> Result<HashSet<String>> {
        Ok(self.words.clone())
    }
}

impl From<HashSet<String>> for StaticStopwords {
    fn from(words: HashSet<String>) -> Self {
        Self { words }
    }
}
