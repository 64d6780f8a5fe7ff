use crate::config::EngineConfig;
use crate::error::Result;
use crate::index::{DocumentData, InvertedIndex, TermFreqs, TermSetIndex};
use crate::query::Query;
use crate::relevance;
use crate::tokenizer::StopWords;
use crate::{DocId, Document, DocumentStatus, ExecutionPolicy};

/// In-memory TF-IDF search engine.
///
/// Queries take `&self` and may run concurrently with each other. Adding or
/// removing documents takes `&mut self`, so mutations are always exclusive.
#[derive(Debug)]
pub struct SearchServer {
    stop_words: StopWords,
    index: InvertedIndex,
    shard_count: usize,
}

impl SearchServer {
    pub fn new<I, S>(stop_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self::from_parts(StopWords::new(stop_words)?, crate::config::DEFAULT_SHARD_COUNT))
    }

    /// Build from a space-separated stop word list.
    pub fn from_stop_words_text(text: &str) -> Result<Self> {
        Ok(Self::from_parts(StopWords::from_text(text)?, crate::config::DEFAULT_SHARD_COUNT))
    }

    pub fn with_config(config: &EngineConfig) -> Result<Self> {
        Ok(Self::from_parts(StopWords::new(&config.stop_words)?, config.shard_count))
    }

    fn from_parts(stop_words: StopWords, shard_count: usize) -> Self {
        Self { stop_words, index: InvertedIndex::new(), shard_count: shard_count.max(1) }
    }

    /// Index `text` under `id`. The id is validated before any word.
    pub fn add_document(&mut self, id: DocId, text: &str, status: DocumentStatus, ratings: &[i32]) -> Result<()> {
        self.index.check_new_id(id)?;
        let words = self.stop_words.split_into_words_no_stop(text)?;
        let data = DocumentData { rating: compute_average_rating(ratings), status };
        self.index.insert(id, &words, data)?;
        tracing::debug!(doc_id = id, terms = self.index.word_frequencies(id).len(), "document added");
        Ok(())
    }

    /// Best `ACTUAL` documents for `raw_query`.
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_policy(ExecutionPolicy::Sequential, raw_query)
    }

    pub fn find_top_documents_by_status(&self, raw_query: &str, status: DocumentStatus) -> Result<Vec<Document>> {
        self.find_top_documents_by_status_policy(ExecutionPolicy::Sequential, raw_query, status)
    }

    pub fn find_top_documents_with<P>(&self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        self.find_top_documents_with_policy(ExecutionPolicy::Sequential, raw_query, predicate)
    }

    pub fn find_top_documents_policy(&self, policy: ExecutionPolicy, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_by_status_policy(policy, raw_query, DocumentStatus::Actual)
    }

    pub fn find_top_documents_by_status_policy(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        self.find_top_documents_with_policy(policy, raw_query, move |_, document_status, _| {
            document_status == status
        })
    }

    /// Up to `MAX_RESULT_DOCUMENT_COUNT` documents for which `predicate`
    /// holds, ranked by relevance then rating.
    pub fn find_top_documents_with_policy<P>(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let query = Query::parse(raw_query, &self.stop_words)?;
        let hits = relevance::find_all_documents(&self.index, &query, &predicate, policy, self.shard_count);
        tracing::debug!(
            plus = query.plus_words.len(),
            minus = query.minus_words.len(),
            hits = hits.len(),
            ?policy,
            "query executed"
        );
        Ok(relevance::rank(hits))
    }

    pub fn match_document(&self, raw_query: &str, id: DocId) -> Result<(Vec<String>, DocumentStatus)> {
        self.match_document_policy(ExecutionPolicy::Sequential, raw_query, id)
    }

    /// Sorted required words found in document `id`, or nothing if an
    /// excluded word is present, along with the document's status.
    pub fn match_document_policy(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        id: DocId,
    ) -> Result<(Vec<String>, DocumentStatus)> {
        let query = Query::parse(raw_query, &self.stop_words)?;
        relevance::match_document(&self.index, &query, id, policy)
    }

    pub fn remove_document(&mut self, id: DocId) {
        self.remove_document_policy(ExecutionPolicy::Sequential, id);
    }

    pub fn remove_document_policy(&mut self, policy: ExecutionPolicy, id: DocId) {
        if self.index.document(id).is_none() {
            return;
        }
        match policy {
            ExecutionPolicy::Sequential => self.index.remove(id),
            ExecutionPolicy::Parallel => self.index.remove_parallel(id),
        }
        tracing::debug!(doc_id = id, ?policy, "document removed");
    }

    /// Term frequencies of `id`; empty if the document is unknown.
    pub fn word_frequencies(&self, id: DocId) -> &TermFreqs {
        self.index.word_frequencies(id)
    }

    pub fn document_ids(&self) -> Vec<DocId> {
        self.index.document_ids()
    }

    pub fn document_count(&self) -> usize {
        self.index.document_count()
    }

    pub fn term_set_index(&self) -> &TermSetIndex {
        self.index.term_sets()
    }
}

fn compute_average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    (sum / ratings.len() as i64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SearchError;

    #[test]
    fn average_rating_truncates() {
        assert_eq!(compute_average_rating(&[1, 2, 3]), 2);
        assert_eq!(compute_average_rating(&[1, 2]), 1);
        assert_eq!(compute_average_rating(&[-1, -2]), -1);
        assert_eq!(compute_average_rating(&[]), 0);
        assert_eq!(compute_average_rating(&[i32::MAX, i32::MAX]), i32::MAX);
    }

    #[test]
    fn invalid_word_leaves_index_untouched() {
        let mut server = SearchServer::new(["in"]).unwrap();
        let err = server.add_document(1, "good b\u{3}ad", DocumentStatus::Actual, &[1]).unwrap_err();
        assert!(matches!(err, SearchError::InvalidWord(_)));
        assert_eq!(server.document_count(), 0);
        assert!(server.term_set_index().is_empty());
    }

    #[test]
    fn config_controls_stop_words_and_shards() {
        let config = EngineConfig { stop_words: vec!["the".into()], shard_count: 0 };
        let mut server = SearchServer::with_config(&config).unwrap();
        assert_eq!(server.shard_count, 1);
        server.add_document(1, "the cat", DocumentStatus::Actual, &[]).unwrap();
        assert!(server.find_top_documents_policy(ExecutionPolicy::Parallel, "the").unwrap().is_empty());
        assert_eq!(server.find_top_documents("cat").unwrap()[0].id, 1);
    }
}
