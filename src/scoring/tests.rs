use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::analysis::UserContext;
use crate::embedding::{MockRerankModel, RerankModel, RerankerError};
use crate::search::SearchResult;

fn results() -> Vec<SearchResult> {
    vec![
        SearchResult::new("General admission requirements for all applicants", 0.9),
        SearchResult::new("International students need a CAS for their visa", 0.6),
        SearchResult::new("Postgraduate taught programmes start in September", 0.4),
    ]
}

fn reranker(model: MockRerankModel) -> ContextReranker<MockRerankModel> {
    ContextReranker::new(Some(Arc::new(model)))
}

struct SlowModel;

impl RerankModel for SlowModel {
    fn predict(&self, pairs: &[(String, String)]) -> Result<Vec<f32>, RerankerError> {
        std::thread::sleep(Duration::from_millis(500));
        Ok(vec![1.0; pairs.len()])
    }
}

struct PanickingModel;

impl RerankModel for PanickingModel {
    fn predict(&self, _pairs: &[(String, String)]) -> Result<Vec<f32>, RerankerError> {
        panic!("model crashed");
    }
}

fn assert_pass_through(out: &[SearchResult], original: &[SearchResult]) {
    assert_eq!(out.len(), original.len());
    for (a, b) in out.iter().zip(original) {
        assert_eq!(a.content, b.content);
        assert_eq!(a.rerank_score, Some(a.score));
    }
}

#[test]
fn test_context_query() {
    let ctx = UserContext::new("u1");
    assert_eq!(context_query("visa help", &ctx), "visa help");

    let ctx = UserContext::new("u1")
        .with_international(true)
        .with_study_level("postgraduate");
    assert_eq!(
        context_query("visa help", &ctx),
        "visa help international student postgraduate"
    );
}

#[tokio::test]
async fn test_no_model_passes_through() {
    let reranker = ContextReranker::<MockRerankModel>::disabled();
    assert!(!reranker.is_available());

    let (out, outcome) = reranker
        .rerank_with_outcome("q", results(), &UserContext::new("u"))
        .await;
    assert_eq!(outcome, RerankOutcome::NoModel);
    assert_pass_through(&out, &results());
}

#[tokio::test]
async fn test_unavailable_model_passes_through() {
    let model = Arc::new(MockRerankModel::with_scores(vec![0.1, 0.2, 0.3]).unavailable());
    let reranker = ContextReranker::new(Some(Arc::clone(&model)));

    let out = reranker.rerank("q", results(), &UserContext::new("u")).await;
    assert_pass_through(&out, &results());
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_reorders_by_model_score() {
    let reranker = reranker(MockRerankModel::with_scores(vec![0.1, 0.2, 0.9]));

    let (out, outcome) = reranker
        .rerank_with_outcome("q", results(), &UserContext::new("u"))
        .await;

    assert_eq!(outcome, RerankOutcome::Reranked);
    assert!(out[0].content.starts_with("Postgraduate"));
    assert_eq!(out[0].rerank_score, Some(0.9));
    assert!(out.iter().all(|r| r.rerank_score.is_some()));
    assert!(
        out.windows(2)
            .all(|w| w[0].effective_score() >= w[1].effective_score())
    );
}

#[tokio::test]
async fn test_context_boosts() {
    let reranker = reranker(MockRerankModel::with_scores(vec![0.5, 0.5, 0.5]));
    let ctx = UserContext::new("u")
        .with_international(true)
        .with_study_level("Postgraduate");

    let out = reranker.rerank("q", results(), &ctx).await;

    let score_of = |prefix: &str| {
        out.iter()
            .find(|r| r.content.starts_with(prefix))
            .and_then(|r| r.rerank_score)
            .unwrap()
    };
    assert!((score_of("International") - 1.0).abs() < 1e-6);
    assert!((score_of("Postgraduate") - 0.8).abs() < 1e-6);
    assert!((score_of("General") - 0.5).abs() < 1e-6);
    assert!(out[0].content.starts_with("International"));
}

#[tokio::test]
async fn test_pairs_use_context_query_and_truncated_content() {
    let long = "x".repeat(2_000);
    let model = MockRerankModel::with_fn(|q, p| {
        assert_eq!(q, "fees international student");
        p.chars().count() as f32
    });
    let reranker = reranker(model);
    let ctx = UserContext::new("u").with_international(true);

    let out = reranker
        .rerank("fees", vec![SearchResult::new(long, 0.3)], &ctx)
        .await;
    assert_eq!(out[0].rerank_score, Some(500.0));
}

#[tokio::test]
async fn test_model_error_degrades() {
    let reranker = reranker(MockRerankModel::failing());
    let (out, outcome) = reranker
        .rerank_with_outcome("q", results(), &UserContext::new("u"))
        .await;
    assert_eq!(outcome, RerankOutcome::Degraded);
    assert_pass_through(&out, &results());
}

#[tokio::test]
async fn test_score_count_mismatch_degrades() {
    let reranker = reranker(MockRerankModel::wrong_length());
    let (out, outcome) = reranker
        .rerank_with_outcome("q", results(), &UserContext::new("u"))
        .await;
    assert_eq!(outcome, RerankOutcome::Degraded);
    assert_pass_through(&out, &results());
}

#[tokio::test]
async fn test_timeout_degrades() {
    let reranker =
        ContextReranker::new(Some(Arc::new(SlowModel))).with_timeout(Duration::from_millis(20));
    let (out, outcome) = reranker
        .rerank_with_outcome("q", results(), &UserContext::new("u"))
        .await;
    assert_eq!(outcome, RerankOutcome::Degraded);
    assert_pass_through(&out, &results());
}

#[tokio::test]
async fn test_panic_degrades() {
    let reranker = ContextReranker::new(Some(Arc::new(PanickingModel)));
    let (out, outcome) = reranker
        .rerank_with_outcome("q", results(), &UserContext::new("u"))
        .await;
    assert_eq!(outcome, RerankOutcome::Degraded);
    assert_pass_through(&out, &results());
}

#[tokio::test]
async fn test_empty_input() {
    let reranker = reranker(MockRerankModel::with_scores(vec![]));
    let (out, outcome) = reranker
        .rerank_with_outcome("q", Vec::new(), &UserContext::new("u"))
        .await;
    assert!(out.is_empty());
    assert_eq!(outcome, RerankOutcome::Empty);
}
