use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Sentiment class of a tweet
///
/// The discriminant is the label fed to the classifier and never changes
/// for the lifetime of the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum SentimentTag {
    Positive = 0,
    Negative = 1,
    Neutral = 2,
}

impl SentimentTag {
    /// All tags in label order
    pub const ALL: [SentimentTag; 3] = [SentimentTag::Positive, SentimentTag::Negative, SentimentTag::Neutral];

    /// Parse the dataset's sentiment word.
    /// Exact, case-sensitive match only.
    ///
    /// # Arguments
    /// * `s` - one of `"positive"`, `"negative"`, `"neutral"`
    ///
    /// # Returns
    /// * `Result<SentimentTag>` - `InvalidPattern` carrying `s` on any other input
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "positive" => Ok(SentimentTag::Positive),
            "negative" => Ok(SentimentTag::Negative),
            "neutral" => Ok(SentimentTag::Neutral),
            other => Err(Error::invalid_pattern(other)),
        }
    }

    /// Integer label for the classifier
    #[inline]
    pub fn label(self) -> u8 {
        self as u8
    }

    /// Inverse of [`SentimentTag::label`]
    #[inline]
    pub fn from_label(label: u8) -> Option<Self> {
        match label {
            0 => Some(SentimentTag::Positive),
            1 => Some(SentimentTag::Negative),
            2 => Some(SentimentTag::Neutral),
            _ => None,
        }
    }

    /// The word used for this tag in dataset files
    pub fn as_str(self) -> &'static str {
        match self {
            SentimentTag::Positive => "positive",
            SentimentTag::Negative => "negative",
            SentimentTag::Neutral => "neutral",
        }
    }
}

impl FromStr for SentimentTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for SentimentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-function form of [`SentimentTag::parse`]
pub fn parse_sentiment(s: &str) -> Result<SentimentTag> {
    SentimentTag::parse(s)
}
