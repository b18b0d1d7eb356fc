//! Test fixtures for integration tests.

use std::sync::Arc;
use std::time::Duration;

use crag::analysis::UserContext;
use crag::embedding::{MockRerankModel, StubEmbedder};
use crag::pipeline::CragPipeline;
use crag::rewrite::{KnowledgeBase, MockCompletion, QueryRewriter};
use crag::scoring::ContextReranker;
use crag::search::{MultiQuerySearcher, MultiSearchConfig, VectorSearchClient};
use crag::vectordb::{IndexMatch, MockVectorIndex};

pub const NAMESPACE: &str = "website-2025";

pub const EMBEDDING_DIM: usize = 32;

pub const CAS_QUERY: &str = "What are the CAS interview requirements?";

pub const CAS_REWRITES: &str = r#"["UWS CAS interview requirements", "CAS interview process international students", "UWS visa credibility interview"]"#;

pub type MockPipeline = CragPipeline<StubEmbedder, MockVectorIndex, MockRerankModel, MockCompletion>;

pub fn student() -> UserContext {
    UserContext::new("whatsapp:+440000000000")
}

pub fn international_postgraduate() -> UserContext {
    student()
        .with_international(true)
        .with_study_level("postgraduate")
        .with_student_status("prospective")
}

pub fn answer(score: f32, text: &str) -> IndexMatch {
    IndexMatch::with_answer(score, text, Some("https://www.uws.ac.uk"))
}

pub struct PipelineBuilder {
    index: MockVectorIndex,
    llm: MockCompletion,
    rerank: Option<MockRerankModel>,
    search: MultiSearchConfig,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self {
            index: MockVectorIndex::new(),
            llm: MockCompletion::with_reply(CAS_REWRITES),
            rerank: None,
            search: MultiSearchConfig::default(),
        }
    }
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn matches(mut self, matches: Vec<IndexMatch>) -> Self {
        self.index = MockVectorIndex::with_matches(matches);
        self
    }

    pub fn index(mut self, index: MockVectorIndex) -> Self {
        self.index = index;
        self
    }

    pub fn llm(mut self, llm: MockCompletion) -> Self {
        self.llm = llm;
        self
    }

    pub fn rerank(mut self, model: MockRerankModel) -> Self {
        self.rerank = Some(model);
        self
    }

    pub fn search_timeout(mut self, timeout: Duration) -> Self {
        self.search.search_timeout = timeout;
        self
    }

    pub fn build(self) -> MockPipeline {
        let client = VectorSearchClient::new(
            StubEmbedder::new(EMBEDDING_DIM),
            self.index,
            NAMESPACE,
            Duration::from_secs(300),
        );
        CragPipeline::new(
            QueryRewriter::new(self.llm, KnowledgeBase::default()),
            MultiQuerySearcher::new(client, self.search),
            ContextReranker::new(self.rerank.map(Arc::new)),
        )
    }
}

/// An index whose stored points are the stub embeddings of `passages`, so a query equal
/// to a passage retrieves it with similarity 1.0.
pub fn semantic_index(passages: &[&str]) -> MockVectorIndex {
    let embedder = StubEmbedder::new(EMBEDDING_DIM);
    let mut index = MockVectorIndex::new();
    for (i, passage) in passages.iter().enumerate() {
        index.insert(
            embedder.vector_for(passage),
            NAMESPACE,
            answer(0.0, passage).with_id(format!("kb-{i}")),
        );
    }
    index
}
