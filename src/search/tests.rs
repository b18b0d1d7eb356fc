use std::time::Duration;

use super::*;
use crate::embedding::StubEmbedder;
use crate::vectordb::{IndexMatch, MockVectorIndex};

const DIM: usize = 16;
const NAMESPACE: &str = "website-2025";
const TTL: Duration = Duration::from_secs(300);

fn client(index: MockVectorIndex) -> VectorSearchClient<StubEmbedder, MockVectorIndex> {
    VectorSearchClient::new(StubEmbedder::new(DIM), index, NAMESPACE, TTL)
}

fn searcher(index: MockVectorIndex) -> MultiQuerySearcher<StubEmbedder, MockVectorIndex> {
    MultiQuerySearcher::new(client(index), MultiSearchConfig::default())
}

fn bounded(
    index: MockVectorIndex,
    max_workers: usize,
) -> MultiQuerySearcher<StubEmbedder, MockVectorIndex> {
    MultiQuerySearcher::new(
        client(index),
        MultiSearchConfig {
            max_workers,
            search_timeout: Duration::from_secs(1),
        },
    )
}

fn queries(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_from_match_requires_answer() {
    let ok = IndexMatch::with_answer(0.8, "Tuition is £15,000", Some("fees-page"));
    let result = SearchResult::from_match(ok).unwrap();
    assert_eq!(result.content, "Tuition is £15,000");
    assert_eq!(result.source.as_deref(), Some("fees-page"));
    assert!(result.rerank_score.is_none());

    assert!(SearchResult::from_match(IndexMatch::with_answer(0.8, "ok", None)).is_none());
    assert!(SearchResult::from_match(IndexMatch::new(0.8, Default::default())).is_none());
}

#[test]
fn test_effective_score() {
    let plain = SearchResult::new("content", 0.4);
    assert_eq!(plain.effective_score(), 0.4);
    assert_eq!(plain.with_rerank_score(2.5).effective_score(), 2.5);
}

#[tokio::test]
async fn test_embed_is_cached() {
    let client = client(MockVectorIndex::with_matches(vec![]));

    let first = client.embed("visa documents").await;
    let second = client.embed("visa documents").await;

    assert_eq!(first.len(), DIM);
    assert_eq!(first, second);
    assert_eq!(client.embedder().calls(), 1);
    assert!((client.cache_hit_rate() - 0.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_embed_failure_returns_empty_and_skips_index() {
    let client = VectorSearchClient::new(
        StubEmbedder::failing(DIM),
        MockVectorIndex::with_matches(vec![IndexMatch::with_answer(0.9, "never seen", None)]),
        NAMESPACE,
        TTL,
    );

    assert!(client.embed("anything").await.is_empty());
    assert!(client.search("anything", 5).await.is_empty());
    assert_eq!(client.index().calls(), 0);
}

#[tokio::test]
async fn test_failed_embedding_is_not_cached() {
    let client = VectorSearchClient::new(
        StubEmbedder::failing(DIM),
        MockVectorIndex::with_matches(vec![]),
        NAMESPACE,
        TTL,
    );
    assert!(client.embed("fees").await.is_empty());

    client.embedder().set_failing(false);
    assert_eq!(client.embed("fees").await.len(), DIM);
}

#[tokio::test]
async fn test_index_failure_returns_empty() {
    let client = client(MockVectorIndex::failing());
    assert!(client.search("fees", 5).await.is_empty());
    assert_eq!(client.index().calls(), 1);
}

#[tokio::test]
async fn test_query_uses_namespace() {
    let client = client(MockVectorIndex::with_matches(vec![]));
    client.search("fees", 5).await;
    assert_eq!(client.index().namespaces(), vec![NAMESPACE.to_string()]);
}

#[tokio::test]
async fn test_search_many_dedups_keeping_higher_score() {
    let stub = StubEmbedder::new(DIM);
    let index = MockVectorIndex::with_responses(vec![
        (
            stub.vector_for("q1"),
            vec![
                IndexMatch::with_answer(0.6, "The CAS interview   is online", None),
                IndexMatch::with_answer(0.5, "Bring your passport", None),
            ],
        ),
        (
            stub.vector_for("q2"),
            vec![IndexMatch::with_answer(0.9, "the cas interview is online", None)],
        ),
    ]);

    let results = searcher(index).search_many(&queries(&["q1", "q2"]), 10).await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].score, 0.9);
    assert_eq!(results[0].content, "the cas interview is online");
    assert_eq!(results[1].content, "Bring your passport");
}

#[tokio::test]
async fn test_search_many_sorted_and_truncated() {
    let matches = (0..8)
        .map(|i| IndexMatch::with_answer(0.1 * i as f32, format!("passage number {i}"), None))
        .collect();
    let results = searcher(MockVectorIndex::with_matches(matches))
        .search_many(&queries(&["a", "b", "c"]), 4)
        .await;

    assert_eq!(results.len(), 4);
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
}

#[tokio::test]
async fn test_search_many_overfetch_per_query() {
    let matches = (0..20)
        .map(|i| IndexMatch::with_answer(1.0 - 0.01 * i as f32, format!("passage {i}"), None))
        .collect();
    let searcher = searcher(MockVectorIndex::with_matches(matches));

    // 10 / 3 + 3 = 6 per query; all three queries see the same 6 passages.
    let results = searcher.search_many(&queries(&["a", "b", "c"]), 10).await;
    assert_eq!(results.len(), 6);
    assert_eq!(searcher.client().index().calls(), 3);
}

#[tokio::test]
async fn test_search_many_empty_inputs() {
    let searcher = searcher(MockVectorIndex::with_matches(vec![IndexMatch::with_answer(
        0.9, "content", None,
    )]));
    assert!(searcher.search_many(&[], 10).await.is_empty());
    assert!(searcher.search_many(&queries(&["a"]), 0).await.is_empty());
    assert_eq!(searcher.client().index().calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_search_many_all_timeouts_yield_empty() {
    let index = MockVectorIndex::with_matches(vec![IndexMatch::with_answer(0.9, "slow", None)])
        .with_delay(Duration::from_secs(30));

    let results = bounded(index, 3).search_many(&queries(&["a", "b"]), 5).await;
    assert!(results.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_search_many_keeps_results_of_queries_that_finish() {
    let stub = StubEmbedder::new(DIM);
    let index = MockVectorIndex::with_responses(vec![
        (
            stub.vector_for("fast"),
            vec![IndexMatch::with_answer(0.5, "fast passage text", None)],
        ),
        (
            stub.vector_for("slow"),
            vec![IndexMatch::with_answer(0.9, "slow passage text", None)],
        ),
    ])
    .with_vector_delay(stub.vector_for("slow"), Duration::from_secs(30));

    let results = bounded(index, 3)
        .search_many(&queries(&["slow", "fast"]), 5)
        .await;

    let found: Vec<(&str, f32)> = results.iter().map(|r| (r.content.as_str(), r.score)).collect();
    assert_eq!(found, vec![("fast passage text", 0.5)]);
}

#[tokio::test]
async fn test_search_many_keeps_results_when_one_query_fails() {
    let stub = StubEmbedder::new(DIM);
    let index = MockVectorIndex::with_responses(vec![
        (
            stub.vector_for("good"),
            vec![IndexMatch::with_answer(0.7, "good passage text", None)],
        ),
        (
            stub.vector_for("bad"),
            vec![IndexMatch::with_answer(0.9, "bad passage text", None)],
        ),
    ])
    .with_vector_failure(stub.vector_for("bad"));

    let searcher = searcher(index);
    let results = searcher.search_many(&queries(&["bad", "good"]), 5).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].content, "good passage text");
    assert_eq!(searcher.client().index().calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_search_many_bounds_concurrency_by_max_workers() {
    let index = MockVectorIndex::with_matches(vec![IndexMatch::with_answer(0.4, "passage", None)])
        .with_delay(Duration::from_millis(100));
    let searcher = bounded(index, 3);

    let results = searcher
        .search_many(&queries(&["a", "b", "c", "d", "e"]), 5)
        .await;

    assert_eq!(results.len(), 1);
    assert_eq!(searcher.client().index().calls(), 5);
    assert_eq!(searcher.client().index().max_concurrency(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_search_many_bounds_concurrency_by_query_count() {
    let index = MockVectorIndex::with_matches(vec![IndexMatch::with_answer(0.4, "passage", None)])
        .with_delay(Duration::from_millis(100));
    let searcher = bounded(index, 10);

    searcher.search_many(&queries(&["a", "b"]), 5).await;

    assert_eq!(searcher.client().index().max_concurrency(), 2);
}

#[test]
fn test_merge_results_tie_break_is_deterministic() {
    let batches = vec![
        vec![SearchResult::new("beta passage", 0.5)],
        vec![SearchResult::new("alpha passage", 0.5)],
    ];
    let merged = merge_results(batches, 10);
    assert_eq!(merged[0].content, "alpha passage");
    assert_eq!(merged[1].content, "beta passage");
}
