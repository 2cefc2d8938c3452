//! Error types for the sentiment pipeline

/// Result type alias using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading, configuring or classifying.
///
/// Out-of-vocabulary tokens are never an error; the vectorizer drops them.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A string did not match an expected enumeration or line grammar.
    /// `line` is the 1-based line number when the input came from a file.
    #[error("invalid pattern{}: {input:?}", .line.map(|l| format!(" at line {l}")).unwrap_or_default())]
    InvalidPattern { input: String, line: Option<usize> },

    /// Missing or misconfigured collaborator, detected at pipeline setup
    #[error("configuration error: {0}")]
    Config(String),

    /// Classifier training / inference errors
    #[error("classifier error: {0}")]
    Classifier(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("cbor error: {0}")]
    Cbor(#[from] serde_cbor::Error),
}

impl Error {
    /// Create an invalid pattern error for a bare string
    pub fn invalid_pattern(input: impl Into<String>) -> Self {
        Self::InvalidPattern { input: input.into(), line: None }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new classifier error
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    /// Attach a line number to an `InvalidPattern`; other variants pass through.
    pub fn at_line(self, line_no: usize) -> Self {
        match self {
            Self::InvalidPattern { input, .. } => Self::InvalidPattern { input, line: Some(line_no) },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_pattern_message_carries_input_and_line() {
        let err = Error::invalid_pattern("happy").at_line(7);
        assert_eq!(err.to_string(), "invalid pattern at line 7: \"happy\"");

        let err = Error::invalid_pattern("happy");
        assert_eq!(err.to_string(), "invalid pattern: \"happy\"");
    }

    #[test]
    fn at_line_leaves_other_variants_alone() {
        let err = Error::config("no stemmer").at_line(3);
        assert!(matches!(err, Error::Config(msg) if msg == "no stemmer"));
    }
}
