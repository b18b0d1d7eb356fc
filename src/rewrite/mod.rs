//! Query rewriting: LLM-generated alternative queries with a deterministic fallback.
//!
//! [`QueryRewriter::rewrite`] never fails. LLM errors, timeouts and malformed replies all
//! fall through to [`fallback_queries`], whose first element is the original query.

pub mod error;
pub mod knowledge;
pub mod llm;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod prompt;


pub use error::LlmError;
pub use knowledge::{KB_PLACEHOLDER, KnowledgeEntry, knowledge_for};
pub use llm::{Completion, CompletionModel, CompletionRequest, GenaiCompletion, estimate_tokens};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockCompletion;
pub use prompt::{KnowledgeBase, build_system_prompt};

use std::time::{Duration, Instant};

use tracing::{debug, instrument, warn};

use crate::analysis::{QueryAnalysis, UserContext};
use crate::constants::{DEFAULT_REWRITE_TIMEOUT_SECS, MAX_REWRITTEN_QUERIES};

pub const REWRITE_TEMPERATURE: f64 = 0.2;
pub const REWRITE_MAX_TOKENS: u32 = 150;

/// Minimum number of LLM-proposed queries for the reply to be accepted.
const MIN_ACCEPTED_QUERIES: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct RewriteOutcome {
    /// 1 to 3 queries; the first is the canonical final query.
    pub queries: Vec<String>,
    /// Tokens consumed by the LLM call (0 when it failed before replying).
    pub tokens_used: u64,
    pub used_fallback: bool,
}

pub struct QueryRewriter<L> {
    llm: L,
    knowledge_base: KnowledgeBase,
    timeout: Duration,
}

impl<L> std::fmt::Debug for QueryRewriter<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryRewriter")
            .field("knowledge_base", &self.knowledge_base)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl<L: CompletionModel> QueryRewriter<L> {
    pub fn new(llm: L, knowledge_base: KnowledgeBase) -> Self {
        Self {
            llm,
            knowledge_base,
            timeout: Duration::from_secs(DEFAULT_REWRITE_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn llm(&self) -> &L {
        &self.llm
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.knowledge_base
    }

    #[instrument(skip_all, fields(query_len = query.len(), query_type = %analysis.primary_type))]
    pub async fn rewrite(
        &self,
        query: &str,
        analysis: &QueryAnalysis,
        context: &UserContext,
    ) -> RewriteOutcome {
        let started = Instant::now();
        let request = CompletionRequest {
            system_prompt: build_system_prompt(&self.knowledge_base, query, analysis, context),
            user_prompt: query.to_string(),
            temperature: REWRITE_TEMPERATURE,
            max_tokens: REWRITE_MAX_TOKENS,
        };

        let mut tokens_used = 0;
        let reply = match tokio::time::timeout(self.timeout, self.llm.complete(&request)).await {
            Ok(Ok(completion)) => {
                tokens_used = completion.tokens_used;
                parse_queries(&completion.text)
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(LlmError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }),
        };

        match reply {
            Ok(queries) => {
                debug!(
                    queries = queries.len(),
                    tokens_used,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Query rewritten"
                );
                RewriteOutcome {
                    queries,
                    tokens_used,
                    used_fallback: false,
                }
            }
            Err(e) => {
                warn!(error = %e, "Query rewrite failed, using fallback queries");
                RewriteOutcome {
                    queries: fallback_queries(&self.knowledge_base, query, analysis),
                    tokens_used,
                    used_fallback: true,
                }
            }
        }
    }
}

/// Parses the LLM reply as a JSON array of strings (markdown fences tolerated).
///
/// Blank entries are dropped; the reply is accepted only with at least two queries and is
/// capped at three.
pub fn parse_queries(reply: &str) -> Result<Vec<String>, LlmError> {
    let body = strip_code_fence(reply.trim());
    let parsed: Vec<String> =
        serde_json::from_str(body).map_err(|e| LlmError::MalformedReply {
            reason: e.to_string(),
        })?;

    let queries: Vec<String> = parsed
        .into_iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .take(MAX_REWRITTEN_QUERIES)
        .collect();

    if queries.len() < MIN_ACCEPTED_QUERIES {
        return Err(LlmError::MalformedReply {
            reason: format!("expected at least {MIN_ACCEPTED_QUERIES} queries, got {}", queries.len()),
        });
    }
    Ok(queries)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Deterministic rewrite: the original query, a knowledge-base-prefixed variant when the
/// query names no institution, and a boost-term variant for mapped intents.
pub fn fallback_queries(kb: &KnowledgeBase, query: &str, analysis: &QueryAnalysis) -> Vec<String> {
    let mut queries = vec![query.to_string()];

    if !query.contains(kb.name.as_str()) && !query.to_lowercase().contains("university") {
        queries.push(format!("{} {}", kb.name, query));
    }

    if let Some(boost) =
        knowledge_for(analysis.primary_type).and_then(|k| k.boost_for(&kb.name))
    {
        queries.push(format!("{query} {boost}"));
    }

    queries.truncate(MAX_REWRITTEN_QUERIES);
    queries
}
