use serde::{Deserialize, Serialize};
use std::fmt;

pub mod batch;
pub mod concurrent_map;
pub mod config;
pub mod dedup;
pub mod error;
pub mod index;
pub mod paginator;
pub mod query;
pub mod relevance;
pub mod request_queue;
pub mod server;
pub mod tokenizer;

pub use config::EngineConfig;
pub use error::{Result, SearchError};
pub use server::SearchServer;

pub type DocId = i32;

/// Upper bound on the number of hits returned by a single search.
pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;

/// Relevance values closer than this are considered equal when ranking.
pub const RELEVANCE_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    #[default]
    Actual,
    Irrelevant,
    Banned,
    Removed,
}

/// Selects the code path used by ranking, matching and removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionPolicy {
    #[default]
    Sequential,
    Parallel,
}

/// A ranked search hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub relevance: f64,
    pub rating: i32,
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ document_id = {}, relevance = {}, rating = {} }}",
            self.id, self.relevance, self.rating
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_display_format() {
        let doc = Document { id: 7, relevance: 0.5, rating: 3 };
        assert_eq!(doc.to_string(), "{ document_id = 7, relevance = 0.5, rating = 3 }");
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&DocumentStatus::Banned).unwrap();
        assert_eq!(json, "\"banned\"");
        let back: DocumentStatus = serde_json::from_str("\"irrelevant\"").unwrap();
        assert_eq!(back, DocumentStatus::Irrelevant);
    }
}
