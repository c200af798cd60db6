//! Configuration types for the parser and aggregators.
//!
//! # Example
//!
//! ```rust
//! use chatlens::config::{LinguisticConfig, ParserConfig};
//!
//! let parser_config = ParserConfig::new().with_skip_system_notices(true);
//! let linguistic_config = LinguisticConfig::new().with_top_n(10);
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// English stopwords and common chat filler, filtered from word-frequency
/// rankings. Multi-language stopword handling is out of scope.
const DEFAULT_STOPWORDS: &[&str] = &[
    // Common English words
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "cant", "cannot", "could", "couldnt", "did", "didnt", "do", "does", "doesnt",
    "doing", "dont", "down", "during", "each", "few", "for", "from", "further", "had", "hadnt",
    "has", "hasnt", "have", "havent", "having", "he", "hed", "hell", "hes", "her", "here",
    "heres", "hers", "herself", "him", "himself", "his", "how", "hows", "i", "id", "ill", "im",
    "ive", "if", "in", "into", "is", "isnt", "it", "its", "itself", "just", "let", "lets", "me",
    "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once", "only",
    "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she", "shes",
    "should", "shouldnt", "so", "some", "such", "than", "that", "thats", "the", "their",
    "theirs", "them", "themselves", "then", "there", "theres", "these", "they", "theyd",
    "theyll", "theyre", "theyve", "this", "those", "through", "to", "too", "under", "until",
    "up", "very", "was", "wasnt", "we", "wed", "well", "were", "weve", "werent", "what",
    "whats", "when", "whens", "where", "wheres", "which", "while", "who", "whos", "whom", "why",
    "whys", "will", "with", "wont", "would", "wouldnt", "you", "youd", "youll", "youre",
    "youve", "your", "yours", "yourself", "yourselves",
    // Common chat filler
    "yeah", "yep", "yes", "yup", "nope", "nah", "ok", "okay", "ohh", "ooh", "umm", "hmm",
    "haha", "lol", "lmao", "hahaha", "like", "really", "actually", "basically", "literally",
    "honestly", "going", "get", "got", "getting", "go", "went", "gone", "make", "made",
    "making", "take", "took", "come", "came", "coming", "want", "wanted", "need", "also",
    "much", "many", "way", "one", "thing", "things", "time", "today", "good", "omg", "btw",
    "tbh", "u", "ur",
];

/// How many leading lines the parser samples for format detection.
const DEFAULT_DETECTION_SAMPLE: usize = 20;

/// Configuration for chat-log parsing.
///
/// WhatsApp exports vary by locale; the parser auto-detects the line shape
/// and date-order convention from a sample of leading lines. System notices
/// (encryption banner, participant added, number changed, ...) carry no
/// authored content and are dropped by default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Drop system notices instead of emitting them (default: true).
    pub skip_system_notices: bool,

    /// Number of leading lines sampled for format detection (default: 20).
    pub detection_sample: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            skip_system_notices: true,
            detection_sample: DEFAULT_DETECTION_SAMPLE,
        }
    }
}

impl ParserConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to drop system notices.
    #[must_use]
    pub fn with_skip_system_notices(mut self, skip: bool) -> Self {
        self.skip_system_notices = skip;
        self
    }

    /// Sets the format-detection sample size.
    #[must_use]
    pub fn with_detection_sample(mut self, lines: usize) -> Self {
        self.detection_sample = lines;
        self
    }
}

/// The stopword set filtered during tokenization.
///
/// Injectable so the linguistic aggregator stays testable in isolation; the
/// default is a fixed English set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stopwords(HashSet<String>);

impl Default for Stopwords {
    fn default() -> Self {
        Self(DEFAULT_STOPWORDS.iter().map(|s| (*s).to_string()).collect())
    }
}

impl Stopwords {
    /// An empty stopword set (nothing filtered).
    pub fn none() -> Self {
        Self(HashSet::new())
    }

    /// Builds a set from custom words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(words.into_iter().map(Into::into).collect())
    }

    /// Returns `true` if `word` (already lowercased) is a stopword.
    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(word)
    }

    /// Number of words in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Configuration for the linguistic aggregator.
///
/// # Example
///
/// ```rust
/// use chatlens::config::{LinguisticConfig, Stopwords};
///
/// let config = LinguisticConfig::new()
///     .with_top_n(5)
///     .with_stopwords(Stopwords::from_words(["hello"]));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinguisticConfig {
    /// Number of top-ranked words to return (default: 20).
    pub top_n: usize,

    /// Minimum token length in characters (default: 2).
    pub min_token_len: usize,

    /// Stopword set filtered from rankings.
    pub stopwords: Stopwords,
}

impl Default for LinguisticConfig {
    fn default() -> Self {
        Self {
            top_n: 20,
            min_token_len: 2,
            stopwords: Stopwords::default(),
        }
    }
}

impl LinguisticConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of top-ranked words to return.
    #[must_use]
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Sets the minimum token length.
    #[must_use]
    pub fn with_min_token_len(mut self, len: usize) -> Self {
        self.min_token_len = len;
        self
    }

    /// Replaces the stopword set.
    #[must_use]
    pub fn with_stopwords(mut self, stopwords: Stopwords) -> Self {
        self.stopwords = stopwords;
        self
    }
}
