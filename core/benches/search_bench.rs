use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use search_core::{DocumentStatus, ExecutionPolicy, SearchServer};

const WORDS: &[&str] = &[
    "white", "cat", "fancy", "collar", "fluffy", "tail", "groomed", "dog", "expressive", "eyes", "big", "sparrow",
    "curly", "hair", "nasty", "rat", "funny", "pet", "kebab", "turkey", "city", "river", "stone", "light",
];

fn build_server(docs: usize) -> SearchServer {
    let mut server = SearchServer::from_stop_words_text("and with in the").unwrap();
    for id in 0..docs {
        let text: Vec<&str> = (0..24).map(|i| WORDS[(id * 7 + i * i * 3 + i) % WORDS.len()]).collect();
        server
            .add_document(id as i32, &text.join(" "), DocumentStatus::Actual, &[(id % 10) as i32])
            .unwrap();
    }
    server
}

fn bench_find_top_documents(c: &mut Criterion) {
    let server = build_server(10_000);
    let query = "white cat fancy collar fluffy dog -sparrow -river";
    for (name, policy) in [("find_top_seq", ExecutionPolicy::Sequential), ("find_top_par", ExecutionPolicy::Parallel)] {
        c.bench_function(name, |b| b.iter(|| server.find_top_documents_policy(policy, query).unwrap()));
    }
}

fn bench_match_document(c: &mut Criterion) {
    let server = build_server(10_000);
    let query = "white cat fancy collar fluffy dog -stone";
    for (name, policy) in [("match_seq", ExecutionPolicy::Sequential), ("match_par", ExecutionPolicy::Parallel)] {
        c.bench_function(name, |b| {
            b.iter(|| {
                for id in (0..10_000).step_by(97) {
                    server.match_document_policy(policy, query, id).unwrap();
                }
            })
        });
    }
}

fn bench_remove_document(c: &mut Criterion) {
    for (name, policy) in [("remove_seq", ExecutionPolicy::Sequential), ("remove_par", ExecutionPolicy::Parallel)] {
        c.bench_function(name, |b| {
            b.iter_batched(
                || build_server(1_000),
                |mut server| {
                    for id in 0..1_000 {
                        server.remove_document_policy(policy, id);
                    }
                    server
                },
                BatchSize::LargeInput,
            )
        });
    }
}

criterion_group!(benches, bench_find_top_documents, bench_match_document, bench_remove_document);
criterion_main!(benches);
