use crate::error::{Result, SearchError};
use crate::tokenizer::{is_valid_word, split_into_words, StopWords};
use std::collections::BTreeSet;

/// A parsed query: required ("plus") and excluded ("minus") terms.
///
/// Both sets are ordered and duplicate-free, so the order of words in the
/// raw query never affects the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub plus_words: BTreeSet<String>,
    pub minus_words: BTreeSet<String>,
}

struct QueryWord<'a> {
    data: &'a str,
    is_minus: bool,
}

fn parse_query_word(text: &str) -> Result<QueryWord<'_>> {
    let (data, is_minus) = match text.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (text, false),
    };
    if data.is_empty() || data.starts_with('-') || !is_valid_word(data) {
        return Err(SearchError::InvalidQueryWord(text.to_string()));
    }
    Ok(QueryWord { data, is_minus })
}

impl Query {
    pub fn parse(text: &str, stop_words: &StopWords) -> Result<Self> {
        let mut query = Query::default();
        for token in split_into_words(text) {
            let word = parse_query_word(token)?;
            if stop_words.contains(word.data) {
                continue;
            }
            if word.is_minus {
                query.minus_words.insert(word.data.to_string());
            } else {
                query.plus_words.insert(word.data.to_string());
            }
        }
        if let Some(both) = query.plus_words.intersection(&query.minus_words).next() {
            return Err(SearchError::InvalidQueryWord(both.clone()));
        }
        Ok(query)
    }
}
