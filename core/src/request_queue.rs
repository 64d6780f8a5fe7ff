use crate::error::Result;
use crate::{DocId, Document, DocumentStatus, SearchServer};
use std::collections::VecDeque;

/// Number of requests kept in the rolling window, one per minute of a day.
pub const MIN_IN_DAY: usize = 1440;

#[derive(Debug, Clone, Copy)]
struct QueryResult {
    hits: usize,
}

/// Records search outcomes over the last [`MIN_IN_DAY`] requests.
pub struct RequestQueue<'a> {
    server: &'a SearchServer,
    requests: VecDeque<QueryResult>,
    no_result_requests: usize,
}

impl<'a> RequestQueue<'a> {
    pub fn new(server: &'a SearchServer) -> Self {
        Self { server, requests: VecDeque::with_capacity(MIN_IN_DAY), no_result_requests: 0 }
    }

    pub fn add_find_request(&mut self, raw_query: &str) -> Result<Vec<Document>> {
        self.add_find_request_by_status(raw_query, DocumentStatus::Actual)
    }

    pub fn add_find_request_by_status(&mut self, raw_query: &str, status: DocumentStatus) -> Result<Vec<Document>> {
        let hits = self.server.find_top_documents_by_status(raw_query, status)?;
        self.record(hits.len());
        Ok(hits)
    }

    pub fn add_find_request_with<P>(&mut self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let hits = self.server.find_top_documents_with(raw_query, predicate)?;
        self.record(hits.len());
        Ok(hits)
    }

    fn record(&mut self, hits: usize) {
        if self.requests.len() == MIN_IN_DAY {
            if let Some(expired) = self.requests.pop_front() {
                if expired.hits == 0 {
                    self.no_result_requests -= 1;
                }
            }
        }
        if hits == 0 {
            self.no_result_requests += 1;
        }
        self.requests.push_back(QueryResult { hits });
    }

    /// Requests inside the window that returned no documents.
    pub fn no_result_requests(&self) -> usize {
        self.no_result_requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}
