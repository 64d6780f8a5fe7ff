//! TF-IDF ranking and query matching over an [`InvertedIndex`].
//!
//! Every operation has a sequential and a parallel code path. Both produce
//! the same ranked ids and the same matched words for the same index state.

use crate::concurrent_map::ConcurrentMap;
use crate::error::{Result, SearchError};
use crate::index::InvertedIndex;
use crate::query::Query;
use crate::{DocId, Document, DocumentStatus, ExecutionPolicy, MAX_RESULT_DOCUMENT_COUNT, RELEVANCE_EPSILON};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Score every candidate matching `query` and `predicate`, unsorted.
///
/// Excluded words drop documents regardless of the predicate.
pub fn find_all_documents<P>(
    index: &InvertedIndex,
    query: &Query,
    predicate: &P,
    policy: ExecutionPolicy,
    shard_count: usize,
) -> Vec<Document>
where
    P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
{
    let relevance = match policy {
        ExecutionPolicy::Sequential => accumulate_sequential(index, query, predicate),
        ExecutionPolicy::Parallel => accumulate_parallel(index, query, predicate, shard_count),
    };
    relevance
        .into_iter()
        .filter_map(|(id, relevance)| {
            index.document(id).map(|data| Document { id, relevance, rating: data.rating })
        })
        .collect()
}

fn accumulate_sequential<P>(index: &InvertedIndex, query: &Query, predicate: &P) -> BTreeMap<DocId, f64>
where
    P: Fn(DocId, DocumentStatus, i32) -> bool,
{
    let mut relevance: BTreeMap<DocId, f64> = BTreeMap::new();
    for word in &query.plus_words {
        let (Some(postings), Some(idf)) = (index.postings(word), index.inverse_document_freq(word)) else {
            continue;
        };
        for (&id, &tf) in postings {
            if let Some(data) = index.document(id) {
                if predicate(id, data.status, data.rating) {
                    *relevance.entry(id).or_insert(0.0) += tf * idf;
                }
            }
        }
    }
    for word in &query.minus_words {
        if let Some(postings) = index.postings(word) {
            for id in postings.keys() {
                relevance.remove(id);
            }
        }
    }
    relevance
}

fn accumulate_parallel<P>(
    index: &InvertedIndex,
    query: &Query,
    predicate: &P,
    shard_count: usize,
) -> BTreeMap<DocId, f64>
where
    P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
{
    let relevance: ConcurrentMap<DocId, f64> = ConcurrentMap::new(shard_count);
    query.plus_words.par_iter().for_each(|word| {
        let (Some(postings), Some(idf)) = (index.postings(word), index.inverse_document_freq(word)) else {
            return;
        };
        for (&id, &tf) in postings {
            if let Some(data) = index.document(id) {
                if predicate(id, data.status, data.rating) {
                    *relevance.access(id) += tf * idf;
                }
            }
        }
    });
    // Exclusion runs only after every plus word has been accumulated.
    query.minus_words.par_iter().for_each(|word| {
        if let Some(postings) = index.postings(word) {
            for &id in postings.keys() {
                relevance.erase(id);
            }
        }
    });
    relevance.snapshot()
}

/// Ranking order: relevance descending, then rating descending, then id.
///
/// Relevance is compared on a `RELEVANCE_EPSILON` grid so that scores that
/// differ only by rounding fall through to the rating tie-break while the
/// comparison stays a total order. The rating tie-break applies only to
/// scores that round to the same grid cell: two scores less than
/// `RELEVANCE_EPSILON` apart that straddle a cell boundary are still
/// ordered by score.
pub fn compare_hits(lhs: &Document, rhs: &Document) -> Ordering {
    let quantize = |relevance: f64| (relevance / RELEVANCE_EPSILON).round();
    quantize(rhs.relevance)
        .total_cmp(&quantize(lhs.relevance))
        .then_with(|| rhs.rating.cmp(&lhs.rating))
        .then_with(|| lhs.id.cmp(&rhs.id))
}

/// Sort hits by [`compare_hits`] and keep the best `MAX_RESULT_DOCUMENT_COUNT`.
pub fn rank(mut hits: Vec<Document>) -> Vec<Document> {
    hits.sort_by(compare_hits);
    hits.truncate(MAX_RESULT_DOCUMENT_COUNT);
    hits
}

/// Required words of `query` found in document `id`, sorted.
///
/// Any excluded word present in the document short-circuits to an empty
/// list. Unknown ids are rejected.
pub fn match_document(
    index: &InvertedIndex,
    query: &Query,
    id: DocId,
    policy: ExecutionPolicy,
) -> Result<(Vec<String>, DocumentStatus)> {
    let status = index.document(id).ok_or(SearchError::InvalidDocumentId(id))?.status;
    let words = match policy {
        ExecutionPolicy::Sequential => {
            if query.minus_words.iter().any(|word| index.contains(word, id)) {
                return Ok((Vec::new(), status));
            }
            query
                .plus_words
                .iter()
                .filter(|word| index.contains(word, id))
                .cloned()
                .collect()
        }
        ExecutionPolicy::Parallel => {
            if query.minus_words.par_iter().any(|word| index.contains(word, id)) {
                return Ok((Vec::new(), status));
            }
            let mut words: Vec<String> = query
                .plus_words
                .par_iter()
                .filter(|word| index.contains(word, id))
                .cloned()
                .collect();
            words.par_sort_unstable();
            words.dedup();
            words
        }
    };
    Ok((words, status))
}
