//! Query analysis: intent classification, entity extraction, urgency and complexity.
//!
//! [`QueryAnalyzer::analyze`] is a pure function of `(query, context)` and never fails;
//! input that matches no pattern is classified as [`QueryType::GeneralInfo`].

pub mod patterns;
pub mod types;

#[cfg(test)]
mod tests;

pub use types::{Complexity, Entities, EntityKind, QueryAnalysis, QueryType, UserContext};

use std::collections::BTreeSet;

use regex::{Regex, RegexBuilder};
use tracing::debug;

use patterns::{
    CONJUNCTION_WORDS, ENTITY_PATTERNS, INTENT_PATTERNS, PERSONAL_PHRASES, PERSONAL_WORDS,
    QUESTION_WORDS, URGENCY_INDICATORS,
};

/// Boost applied when a query continues the caller's previous topic.
pub const CONTEXT_CONTINUATION_BOOST: f32 = 0.2;

const HIGH_COMPLEXITY_WORDS: usize = 15;
const MEDIUM_COMPLEXITY_WORDS: usize = 8;

/// Regex-table driven query analyzer. Build once and share; matching is read-only.
pub struct QueryAnalyzer {
    intents: Vec<(QueryType, Vec<Regex>)>,
    entities: Vec<(EntityKind, Regex)>,
}

impl std::fmt::Debug for QueryAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryAnalyzer")
            .field("intents", &self.intents.len())
            .field("entities", &self.entities.len())
            .finish()
    }
}

impl Default for QueryAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryAnalyzer {
    /// Compiles the built-in pattern tables.
    pub fn new() -> Self {
        let intents = INTENT_PATTERNS
            .iter()
            .map(|(query_type, patterns)| {
                let compiled = patterns.iter().map(|p| compile(p)).collect();
                (*query_type, compiled)
            })
            .collect();

        let entities = ENTITY_PATTERNS
            .iter()
            .map(|(kind, pattern)| (*kind, compile(pattern)))
            .collect();

        Self { intents, entities }
    }

    pub fn analyze(&self, query: &str, context: &UserContext) -> QueryAnalysis {
        let query_lower = query.trim().to_lowercase();
        let words: Vec<&str> = query_lower.split_whitespace().collect();
        let tokens: Vec<&str> = query_lower
            .split(|c: char| !c.is_alphanumeric() && c != '\'')
            .filter(|t| !t.is_empty())
            .collect();

        let all_types_matched: Vec<QueryType> = self
            .intents
            .iter()
            .filter(|(_, patterns)| patterns.iter().any(|re| re.is_match(&query_lower)))
            .map(|(query_type, _)| *query_type)
            .collect();

        let primary_type = all_types_matched
            .first()
            .copied()
            .unwrap_or(QueryType::GeneralInfo);

        let mut entities = Entities::new();
        for (kind, re) in &self.entities {
            let found: BTreeSet<String> = re
                .find_iter(&query_lower)
                .map(|m| m.as_str().to_string())
                .collect();
            if !found.is_empty() {
                entities.insert(*kind, found);
            }
        }

        let urgency_score = URGENCY_INDICATORS
            .iter()
            .filter(|w| query_lower.contains(*w))
            .count() as u32;

        let is_question = tokens.iter().any(|t| QUESTION_WORDS.contains(t))
            || query.trim_end().ends_with('?');

        let complexity = if words.len() > HIGH_COMPLEXITY_WORDS
            || tokens.iter().any(|t| CONJUNCTION_WORDS.contains(t))
        {
            Complexity::High
        } else if words.len() > MEDIUM_COMPLEXITY_WORDS {
            Complexity::Medium
        } else {
            Complexity::Simple
        };

        let context_boost = if context.last_query_type == Some(primary_type) {
            CONTEXT_CONTINUATION_BOOST
        } else {
            0.0
        };

        let collapsed = words.join(" ");
        // "i'm" and "i've" count through their head word.
        let requires_personalization = tokens
            .iter()
            .any(|t| PERSONAL_WORDS.contains(&t.split('\'').next().unwrap_or(*t)))
            || PERSONAL_PHRASES.iter().any(|p| collapsed.contains(p));

        let has_specific_requirements = !entities.is_empty();

        debug!(
            primary_type = %primary_type,
            matched = all_types_matched.len(),
            entity_kinds = entities.len(),
            urgency_score,
            complexity = complexity.as_str(),
            "Query analyzed"
        );

        QueryAnalysis {
            primary_type,
            all_types_matched,
            entities,
            urgency_score,
            complexity,
            is_question,
            context_boost,
            requires_personalization,
            word_count: words.len(),
            has_specific_requirements,
        }
    }
}

fn compile(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("built-in query pattern must compile")
}
