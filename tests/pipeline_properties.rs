//! Invariants that must hold for every input, checked over small input grids.

mod common;

use crag::analysis::{QueryAnalyzer, QueryType};
use crag::assessment::{ConfidenceLevel, CorrectiveFilter, FilterPolicy, QualityAssessor};
use crag::rewrite::{KnowledgeBase, MockCompletion, QueryRewriter};
use crag::search::{SearchResult, merge_results};

use common::fixtures::{CAS_QUERY, PipelineBuilder, answer, international_postgraduate, student};

const LEVELS: [ConfidenceLevel; 4] = [
    ConfidenceLevel::High,
    ConfidenceLevel::Medium,
    ConfidenceLevel::Low,
    ConfidenceLevel::None,
];

#[tokio::test]
async fn test_results_non_empty_when_index_has_matches() {
    let score_sets: [&[f32]; 5] = [
        &[0.95],
        &[0.01],
        &[0.12, 0.05],
        &[0.4, 0.3, 0.2, 0.1],
        &[-0.2, -0.3],
    ];

    for scores in score_sets {
        let matches = scores
            .iter()
            .enumerate()
            .map(|(i, s)| answer(*s, &format!("Passage {i} about student services")))
            .collect();
        let pipeline = PipelineBuilder::new().matches(matches).build();

        for top_k in [1, 3, 10] {
            let result = pipeline
                .search("random question", &student(), top_k)
                .await
                .unwrap();
            assert!(
                !result.results.is_empty(),
                "scores {scores:?} top_k {top_k} produced no results"
            );
        }
    }
}

#[test]
fn test_analysis_is_deterministic() {
    let analyzer = QueryAnalyzer::new();
    let queries = [
        CAS_QUERY,
        "hi there",
        "How much are tuition fees for MSc Data Science in Paisley?",
        "URGENT my visa expires 15/01/2025 help",
        "",
    ];
    for query in queries {
        for ctx in [student(), international_postgraduate()] {
            assert_eq!(analyzer.analyze(query, &ctx), analyzer.analyze(query, &ctx));
        }
    }
    assert_eq!(
        QueryAnalyzer::new().analyze(CAS_QUERY, &student()),
        analyzer.analyze(CAS_QUERY, &student())
    );
}

#[tokio::test]
async fn test_rewrite_fallback_keeps_original_query() {
    let analyzer = QueryAnalyzer::new();
    let replies = [
        None,
        Some("Sure! Here are some queries."),
        Some(r#"["just one"]"#),
        Some(r#"{"queries": ["a", "b"]}"#),
        Some(""),
    ];
    let queries = [
        CAS_QUERY,
        "How do I apply to UWS?",
        "university accommodation prices",
        "asdkjaslkd",
    ];

    for reply in replies {
        for query in queries {
            let llm = match reply {
                Some(text) => MockCompletion::with_reply(text),
                None => MockCompletion::failing(),
            };
            let rewriter = QueryRewriter::new(llm, KnowledgeBase::default());
            let analysis = analyzer.analyze(query, &student());

            let outcome = rewriter.rewrite(query, &analysis, &student()).await;

            assert!(outcome.used_fallback);
            assert!(!outcome.queries.is_empty() && outcome.queries.len() <= 3);
            assert_eq!(outcome.queries[0], query);
        }
    }
}

#[test]
fn test_dedup_keeps_higher_score() {
    let cases = [(0.4, 0.9), (0.9, 0.4), (0.55, 0.56)];
    for (a, b) in cases {
        let batches = vec![
            vec![
                SearchResult::new("Fees are paid in two instalments", a),
                SearchResult::new("Library opens at 8am", 0.5),
            ],
            vec![SearchResult::new("  fees ARE paid in two   instalments ", b)],
        ];

        let merged = merge_results(batches, 10);

        let fees: Vec<&SearchResult> = merged
            .iter()
            .filter(|r| r.content.to_lowercase().contains("instalments"))
            .collect();
        assert_eq!(fees.len(), 1);
        assert_eq!(fees[0].score, f32::max(a, b));
        assert_eq!(merged.len(), 2);
    }
}

#[test]
fn test_filter_respects_policy_caps() {
    let filter = CorrectiveFilter::default();
    let policy = FilterPolicy::default();

    for available in [0, 1, 2, 5, 20] {
        let results: Vec<SearchResult> = (0..available)
            .map(|i| SearchResult::new(format!("passage {i}"), 0.99 - i as f32 * 0.01))
            .collect();
        for top_k in 1..=12 {
            for level in LEVELS {
                let kept = filter.filter(results.clone(), level, top_k);
                assert!(kept.len() <= policy.max_results(level, top_k, available));
                if available > 0 {
                    assert!(!kept.is_empty());
                }
            }
        }
    }
}

#[test]
fn test_confidence_monotonic_in_top_score() {
    let assessor = QualityAssessor::default();
    let analyzer = QueryAnalyzer::new();
    let contents = [
        "The CAS interview process explained",
        "Parking permits and campus maps",
        "CAS requirements for international applicants",
    ];
    let queries = [CAS_QUERY, "parking", "nothing related at all"];

    for query in queries {
        let analysis = analyzer.analyze(query, &student());
        for content in contents {
            let at = |score: f32| {
                let results = vec![
                    SearchResult::new(content, score).with_rerank_score(score),
                    SearchResult::new("Secondary passage on visas", 0.1),
                ];
                assessor.assess(query, &results, &analysis)
            };
            let mut previous = at(0.2);
            assert!(previous <= at(0.8));
            for step in 3..=8 {
                let current = at(step as f32 / 10.0);
                assert!(current >= previous, "{query:?} / {content:?} at 0.{step}");
                previous = current;
            }
        }
    }
}

#[test]
fn test_intent_table_order_breaks_ties() {
    let analysis = QueryAnalyzer::new().analyze(
        "How do I apply and what are the tuition fees?",
        &student(),
    );
    assert_eq!(analysis.primary_type, QueryType::Admissions);
    assert!(analysis.all_types_matched.contains(&QueryType::FeesFunding));
}
