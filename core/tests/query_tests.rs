use search_core::query::Query;
use search_core::tokenizer::{split_into_words, StopWords};
use search_core::{DocumentStatus, SearchError, SearchServer};

#[test]
fn it_splits_strictly_on_spaces() {
    let words = split_into_words("Kebab,  Turkey! CS");
    assert_eq!(words, vec!["Kebab,", "Turkey!", "CS"]);
}

#[test]
fn it_keeps_case() {
    let mut server = SearchServer::new(Vec::<&str>::new()).unwrap();
    server.add_document(1, "Kebab Turkey", DocumentStatus::Actual, &[]).unwrap();
    assert!(server.find_top_documents("kebab").unwrap().is_empty());
    assert_eq!(server.find_top_documents("Kebab").unwrap().len(), 1);
}

#[test]
fn it_filters_stopwords_from_queries() {
    let stop = StopWords::from_text("the and").unwrap();
    let query = Query::parse("the quick -and fox", &stop).unwrap();
    assert!(query.plus_words.contains("quick"));
    assert!(query.plus_words.contains("fox"));
    assert!(!query.plus_words.contains("the"));
    assert!(query.minus_words.is_empty());
}

#[test]
fn it_rejects_malformed_queries() {
    let mut server = SearchServer::from_stop_words_text("in the").unwrap();
    server.add_document(1, "cat in the city", DocumentStatus::Actual, &[1]).unwrap();
    for raw in ["-", "cat --city", "cat -", "ca\u{11}t"] {
        assert!(
            matches!(server.find_top_documents(raw), Err(SearchError::InvalidQueryWord(_))),
            "{raw:?}"
        );
        assert!(matches!(server.match_document(raw, 1), Err(SearchError::InvalidQueryWord(_))));
    }
}

#[test]
fn it_rejects_invalid_stop_words() {
    assert_eq!(
        SearchServer::new(["ok", "in\u{0}"]).unwrap_err(),
        SearchError::InvalidWord("in\u{0}".into())
    );
}
