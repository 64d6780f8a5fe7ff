use crate::DocId;

/// Validation failures surfaced by indexing and query operations.
///
/// Lookup misses are never errors: absent documents or terms degrade to
/// empty results instead.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Negative id, an id already in use, or an id unknown to the index.
    #[error("invalid document id: {0}")]
    InvalidDocumentId(DocId),
    /// A document token or stop word contains a control character.
    #[error("word {0:?} is invalid")]
    InvalidWord(String),
    /// A query token is empty after minus-stripping, is a lone or doubled
    /// minus, contains a control character, or is both required and excluded.
    #[error("query word {0:?} is invalid")]
    InvalidQueryWord(String),
}

pub type Result<T, E = SearchError> = std::result::Result<T, E>;
