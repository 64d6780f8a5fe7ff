use crate::{DocId, SearchServer};

/// Remove every document whose distinct term set duplicates a document
/// with a lower id. Returns the removed ids in ascending order.
pub fn remove_duplicates(server: &mut SearchServer) -> Vec<DocId> {
    let mut duplicates: Vec<DocId> = server
        .term_set_index()
        .values()
        .filter(|ids| ids.len() > 1)
        .flat_map(|ids| ids.iter().skip(1).copied())
        .collect();
    duplicates.sort_unstable();
    for &id in &duplicates {
        tracing::info!(doc_id = id, "found duplicate document");
        server.remove_document(id);
    }
    duplicates
}
