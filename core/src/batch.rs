use crate::error::Result;
use crate::{Document, SearchServer};
use rayon::prelude::*;

/// Run every query against a frozen index on the rayon pool.
///
/// Results come back in input order. The first invalid query fails the batch.
pub fn process_queries<S>(server: &SearchServer, queries: &[S]) -> Result<Vec<Vec<Document>>>
where
    S: AsRef<str> + Sync,
{
    queries
        .par_iter()
        .map(|query| server.find_top_documents(query.as_ref()))
        .collect()
}

/// Like [`process_queries`], flattened into one list.
pub fn process_queries_joined<S>(server: &SearchServer, queries: &[S]) -> Result<Vec<Document>>
where
    S: AsRef<str> + Sync,
{
    Ok(process_queries(server, queries)?.into_iter().flatten().collect())
}
