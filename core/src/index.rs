use crate::error::{Result, SearchError};
use crate::{DocId, DocumentStatus};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

/// term -> normalized term frequency, for one document.
pub type TermFreqs = BTreeMap<String, f64>;

/// document id -> normalized term frequency, for one term.
pub type PostingList = BTreeMap<DocId, f64>;

/// Distinct term set -> ids of the documents with exactly that set.
pub type TermSetIndex = BTreeMap<BTreeSet<String>, BTreeSet<DocId>>;

static EMPTY_FREQS: TermFreqs = BTreeMap::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentData {
    pub rating: i32,
    pub status: DocumentStatus,
}

/// Forward and inverted postings kept in lockstep.
///
/// Document `d` holds term `t` with frequency `f` in the forward postings
/// exactly when the posting list of `t` holds `d` with `f`.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    word_to_document_freqs: BTreeMap<String, PostingList>,
    document_to_word_freqs: BTreeMap<DocId, TermFreqs>,
    documents: BTreeMap<DocId, DocumentData>,
    document_ids: BTreeSet<DocId>,
    term_sets: TermSetIndex,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails if `id` is negative or already indexed.
    pub fn check_new_id(&self, id: DocId) -> Result<()> {
        if id < 0 || self.documents.contains_key(&id) {
            return Err(SearchError::InvalidDocumentId(id));
        }
        Ok(())
    }

    /// Index an already tokenized and stop-word filtered document.
    ///
    /// Fails without touching the index if `id` is negative or taken.
    pub fn insert(&mut self, id: DocId, words: &[&str], data: DocumentData) -> Result<()> {
        self.check_new_id(id)?;

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for word in words {
            *counts.entry(*word).or_insert(0) += 1;
        }
        // An empty document divides nothing: it is stored with no terms.
        let total = words.len() as f64;
        let freqs: TermFreqs = counts
            .into_iter()
            .map(|(word, count)| (word.to_string(), count as f64 / total))
            .collect();

        for (word, &tf) in &freqs {
            self.word_to_document_freqs.entry(word.clone()).or_default().insert(id, tf);
        }
        let term_set: BTreeSet<String> = freqs.keys().cloned().collect();
        self.term_sets.entry(term_set).or_default().insert(id);
        self.document_to_word_freqs.insert(id, freqs);
        self.documents.insert(id, data);
        self.document_ids.insert(id);
        Ok(())
    }

    /// Purge `id`, one posting list at a time. No-op for unknown ids.
    pub fn remove(&mut self, id: DocId) {
        let Some(freqs) = self.document_to_word_freqs.get(&id) else {
            return;
        };
        for word in freqs.keys() {
            if let Some(postings) = self.word_to_document_freqs.get_mut(word) {
                postings.remove(&id);
                if postings.is_empty() {
                    self.word_to_document_freqs.remove(word);
                }
            }
        }
        self.forget(id);
    }

    /// Purge `id`, erasing it from its posting lists on the rayon pool.
    ///
    /// The term list is snapshotted before the fan-out; the registry,
    /// forward postings and metadata are only dropped after it joins.
    pub fn remove_parallel(&mut self, id: DocId) {
        let Some(freqs) = self.document_to_word_freqs.get(&id) else {
            return;
        };
        let terms: Vec<String> = freqs.keys().cloned().collect();

        if let (Some(first), Some(last)) = (terms.first(), terms.last()) {
            let lists: Vec<&mut PostingList> = self
                .word_to_document_freqs
                .range_mut::<str, _>((Bound::Included(first.as_str()), Bound::Included(last.as_str())))
                .filter(|(word, _)| terms.binary_search(*word).is_ok())
                .map(|(_, postings)| postings)
                .collect();
            lists.into_par_iter().for_each(|postings| {
                postings.remove(&id);
            });
        }

        for word in &terms {
            if self.word_to_document_freqs.get(word).is_some_and(PostingList::is_empty) {
                self.word_to_document_freqs.remove(word);
            }
        }
        self.forget(id);
    }

    fn forget(&mut self, id: DocId) {
        if let Some(freqs) = self.document_to_word_freqs.get(&id) {
            let term_set: BTreeSet<String> = freqs.keys().cloned().collect();
            if let Some(ids) = self.term_sets.get_mut(&term_set) {
                ids.remove(&id);
                if ids.is_empty() {
                    self.term_sets.remove(&term_set);
                }
            }
        }
        self.document_ids.remove(&id);
        self.document_to_word_freqs.remove(&id);
        self.documents.remove(&id);
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn document(&self, id: DocId) -> Option<&DocumentData> {
        self.documents.get(&id)
    }

    pub fn postings(&self, word: &str) -> Option<&PostingList> {
        self.word_to_document_freqs.get(word)
    }

    /// Whether `word` occurs in document `id`.
    pub fn contains(&self, word: &str, id: DocId) -> bool {
        self.postings(word).is_some_and(|postings| postings.contains_key(&id))
    }

    /// `ln(N / df)`, or `None` when no document contains `word`.
    pub fn inverse_document_freq(&self, word: &str) -> Option<f64> {
        let df = self.postings(word)?.len();
        Some((self.document_count() as f64 / df as f64).ln())
    }

    /// Term frequencies of `id`; empty for an unknown id.
    pub fn word_frequencies(&self, id: DocId) -> &TermFreqs {
        self.document_to_word_freqs.get(&id).unwrap_or(&EMPTY_FREQS)
    }

    /// Ordered snapshot of the indexed ids.
    pub fn document_ids(&self) -> Vec<DocId> {
        self.document_ids.iter().copied().collect()
    }

    pub fn term_sets(&self) -> &TermSetIndex {
        &self.term_sets
    }

    #[cfg(test)]
    fn term_count(&self) -> usize {
        self.word_to_document_freqs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACTUAL: DocumentData = DocumentData { rating: 0, status: DocumentStatus::Actual };

    fn assert_consistent(index: &InvertedIndex) {
        for (id, freqs) in &index.document_to_word_freqs {
            for (word, tf) in freqs {
                assert_eq!(index.word_to_document_freqs[word].get(id), Some(tf));
            }
        }
        for (word, postings) in &index.word_to_document_freqs {
            assert!(!postings.is_empty(), "empty posting list left for {word}");
            for (id, tf) in postings {
                assert_eq!(index.document_to_word_freqs[id].get(word), Some(tf));
            }
        }
    }

    #[test]
    fn term_frequencies_sum_to_one() {
        let mut index = InvertedIndex::new();
        index.insert(1, &["a", "b", "a", "c"], ACTUAL).unwrap();
        let freqs = index.word_frequencies(1);
        assert_eq!(freqs["a"], 0.5);
        assert_eq!(freqs["b"], 0.25);
        let sum: f64 = freqs.values().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert_consistent(&index);
    }

    #[test]
    fn rejects_negative_and_duplicate_ids() {
        let mut index = InvertedIndex::new();
        assert_eq!(index.insert(-1, &["a"], ACTUAL), Err(SearchError::InvalidDocumentId(-1)));
        index.insert(1, &["a"], ACTUAL).unwrap();
        assert_eq!(index.insert(1, &["b"], ACTUAL), Err(SearchError::InvalidDocumentId(1)));
        assert!(index.postings("b").is_none());
        assert_eq!(index.document_count(), 1);
    }

    #[test]
    fn empty_document_has_no_terms() {
        let mut index = InvertedIndex::new();
        index.insert(3, &[], ACTUAL).unwrap();
        assert!(index.word_frequencies(3).is_empty());
        assert_eq!(index.document_ids(), vec![3]);
        assert!(index.term_sets().contains_key(&BTreeSet::new()));
        index.remove(3);
        assert!(index.term_sets().is_empty());
    }

    #[test]
    fn idf_only_for_indexed_terms() {
        let mut index = InvertedIndex::new();
        index.insert(1, &["a", "b"], ACTUAL).unwrap();
        index.insert(2, &["a"], ACTUAL).unwrap();
        assert_eq!(index.inverse_document_freq("a"), Some(0.0));
        assert_eq!(index.inverse_document_freq("b"), Some(2f64.ln()));
        assert_eq!(index.inverse_document_freq("zzz"), None);
    }

    #[test]
    fn sequential_and_parallel_removal_leave_same_state() {
        let build = || {
            let mut index = InvertedIndex::new();
            index.insert(1, &["x", "y", "z"], ACTUAL).unwrap();
            index.insert(2, &["y", "z", "w"], ACTUAL).unwrap();
            index.insert(3, &["z"], ACTUAL).unwrap();
            index
        };
        let mut seq = build();
        let mut par = build();
        seq.remove(2);
        par.remove_parallel(2);
        for index in [&seq, &par] {
            assert_consistent(index);
            assert!(index.postings("w").is_none());
            assert!(!index.contains("y", 2));
            assert_eq!(index.document_ids(), vec![1, 3]);
            assert!(index.document(2).is_none());
            assert!(index.term_sets().values().all(|ids| !ids.contains(&2)));
        }
        assert_eq!(seq.word_to_document_freqs, par.word_to_document_freqs);
        assert_eq!(seq.term_count(), 3);
    }

    #[test]
    fn removing_unknown_id_is_noop() {
        let mut index = InvertedIndex::new();
        index.insert(1, &["a"], ACTUAL).unwrap();
        index.remove(9);
        index.remove_parallel(9);
        assert_eq!(index.document_count(), 1);
        assert_consistent(&index);
    }
}
