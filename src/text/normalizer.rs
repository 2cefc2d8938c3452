use std::{collections::{HashMap, HashSet}, fmt};

use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};

use crate::{error::{Error, Result}, text::TokenNormalizer};

/// Construction arguments for a stemmer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StemmerSpec {
    /// Snowball algorithm name, e.g. `"english"`
    pub algorithm: String,
}

impl Default for StemmerSpec {
    fn default() -> Self {
        Self { algorithm: "english".to_string() }
    }
}

/// Snowball stemmer from `rust-stemmers`
pub struct SnowballStemmer {
    name: String,
    stemmer: Stemmer,
}

impl SnowballStemmer {
    pub fn new() -> Self {
        Self {
            name: "english".to_string(),
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    /// Build from arguments; unknown algorithm names are a configuration error
    pub fn from_spec(spec: &StemmerSpec) -> Result<Self> {
        let algorithm = match spec.algorithm.as_str() {
            "english" | "porter" => Algorithm::English,
            "danish" => Algorithm::Danish,
            "dutch" => Algorithm::Dutch,
            "finnish" => Algorithm::Finnish,
            "french" => Algorithm::French,
            "german" => Algorithm::German,
            "hungarian" => Algorithm::Hungarian,
            "italian" => Algorithm::Italian,
            "norwegian" => Algorithm::Norwegian,
            "portuguese" => Algorithm::Portuguese,
            "romanian" => Algorithm::Romanian,
            "russian" => Algorithm::Russian,
            "spanish" => Algorithm::Spanish,
            "swedish" => Algorithm::Swedish,
            "turkish" => Algorithm::Turkish,
            other => return Err(Error::config(format!("unknown stemmer algorithm {other:?}"))),
        };
        Ok(Self {
            name: spec.algorithm.clone(),
            stemmer: Stemmer::create(algorithm),
        })
    }
}

impl Default for SnowballStemmer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SnowballStemmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowballStemmer").field("algorithm", &self.name).finish()
    }
}

impl TokenNormalizer for SnowballStemmer {
    fn normalize_one(&self, token: &str) -> String {
        self.stemmer.stem(token).into_owned()
    }

    fn name(&self) -> &str {
        "snowball-stemmer"
    }
}

/// irregular noun plurals
const EXCEPTIONS: &[(&str, &str)] = &[
    ("children", "child"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("lice", "louse"),
    ("oxen", "ox"),
    ("men", "man"),
    ("women", "woman"),
    ("people", "people"),
    ("buses", "bus"),
    ("gases", "gas"),
];

/// (suffix, replacement), tried longest first
const DETACHMENT_RULES: &[(&str, &str)] = &[
    ("ches", "ch"),
    ("shes", "sh"),
    ("ies", "y"),
    ("xes", "x"),
    ("zes", "z"),
    ("ses", "s"),
    ("men", "man"),
    ("s", ""),
];

/// never emit a lemma shorter than this
const MIN_LEMMA_LEN: usize = 3;

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u'];

/// English noun lemmatizer
///
/// Looks the token up in an exception table, then applies suffix
/// detachment rules. With a lexicon, a rule result is only accepted when
/// the lexicon knows it; without one, a few guards keep words like "bus"
/// or "glass" intact. Tokens no rule applies to come back unchanged.
#[derive(Debug, Clone)]
pub struct Lemmatizer {
    exceptions: HashMap<String, String>,
    lexicon: Option<HashSet<String>>,
}

impl Lemmatizer {
    pub fn new() -> Self {
        Self {
            exceptions: EXCEPTIONS
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            lexicon: None,
        }
    }

    /// Only accept rule results that are known lemmas
    pub fn with_lexicon<T>(mut self, lemmas: &[T]) -> Self
    where
        T: AsRef<str>,
    {
        self.lexicon = Some(lemmas.iter().map(|l| l.as_ref().to_string()).collect());
        self
    }

    fn accept(&self, token: &str, candidate: &str) -> bool {
        if candidate.chars().count() < MIN_LEMMA_LEN {
            return false;
        }
        match &self.lexicon {
            Some(lexicon) => lexicon.contains(candidate),
            None => !(token.ends_with("ss") || token.ends_with("us") || token.ends_with("is")),
        }
    }

    /// # Arguments
    /// * `token` - a single word, case preserved
    ///
    /// # Returns
    /// * `String` - the lemma, or `token` itself
    pub fn lemmatize(&self, token: &str) -> String {
        if let Some(lemma) = self.exceptions.get(token) {
            return lemma.clone();
        }
        if let Some(lexicon) = &self.lexicon {
            if lexicon.contains(token) {
                return token.to_string();
            }
        }
        for (suffix, replacement) in DETACHMENT_RULES {
            if let Some(stem) = token.strip_suffix(suffix) {
                // vowel + "ses" is a plain plural of a word ending in "se": houses, causes
                let candidate = if *suffix == "ses" && self.lexicon.is_none() && stem.ends_with(VOWELS) {
                    format!("{stem}se")
                } else {
                    format!("{stem}{replacement}")
                };
                if self.accept(token, &candidate) {
                    return candidate;
                }
                // with a lexicon, keep trying the shorter rules
                if self.lexicon.is_none() {
                    break;
                }
            }
        }
        token.to_string()
    }
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenNormalizer for Lemmatizer {
    fn normalize_one(&self, token: &str) -> String {
        self.lemmatize(token)
    }

    fn name(&self) -> &str {
        "lemmatizer"
    }
}
