use crate::error::{Result, SearchError};
use std::collections::BTreeSet;

/// Split text on the space character, dropping empty runs.
///
/// No punctuation or case handling: tokens are returned exactly as written.
pub fn split_into_words(text: &str) -> Vec<&str> {
    text.split(' ').filter(|word| !word.is_empty()).collect()
}

/// A word is valid when it holds no control characters (U+0000..U+001F).
pub fn is_valid_word(word: &str) -> bool {
    !word.chars().any(|c| c < ' ')
}

/// Immutable set of words dropped from documents and queries.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: BTreeSet<String>,
}

impl StopWords {
    pub fn new<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for word in words {
            let word = word.as_ref();
            if word.is_empty() {
                continue;
            }
            if !is_valid_word(word) {
                return Err(SearchError::InvalidWord(word.to_string()));
            }
            set.insert(word.to_string());
        }
        Ok(Self { words: set })
    }

    /// Build from a space-separated list, e.g. `"in the and"`.
    pub fn from_text(text: &str) -> Result<Self> {
        Self::new(split_into_words(text))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Tokenize a document body, validate every token and drop stop words.
    pub fn split_into_words_no_stop<'t>(&self, text: &'t str) -> Result<Vec<&'t str>> {
        let mut words = Vec::new();
        for word in split_into_words(text) {
            if !is_valid_word(word) {
                return Err(SearchError::InvalidWord(word.to_string()));
            }
            if !self.contains(word) {
                words.push(word);
            }
        }
        Ok(words)
    }
}
