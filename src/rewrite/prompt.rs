use crate::analysis::{QueryAnalysis, UserContext};
use crate::constants::DEFAULT_KNOWLEDGE_BASE_NAME;

use super::knowledge::knowledge_for;

/// Institution the knowledge base describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeBase {
    /// Short name, used verbatim in fallback queries.
    pub name: String,
    pub full_name: String,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self {
            name: DEFAULT_KNOWLEDGE_BASE_NAME.to_string(),
            full_name: "University of the West of Scotland".to_string(),
        }
    }
}

impl KnowledgeBase {
    pub fn new(name: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            full_name: full_name.into(),
        }
    }
}

fn describe_context(context: &UserContext) -> String {
    let mut parts = Vec::new();
    if let Some(status) = context.student_status.as_deref() {
        parts.push(format!("User is a {status} student."));
    }
    if let Some(level) = context.study_level.as_deref() {
        parts.push(format!("Interested in {level} studies."));
    }
    if context.international() {
        parts.push("International student perspective needed.".to_string());
    }
    parts.join(" ")
}

fn describe_entities(analysis: &QueryAnalysis) -> String {
    if analysis.entities.is_empty() {
        return "none".to_string();
    }
    analysis
        .entities
        .iter()
        .map(|(kind, values)| {
            let values: Vec<&str> = values.iter().map(String::as_str).collect();
            format!("{}: {}", kind.as_str(), values.join(", "))
        })
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn build_system_prompt(
    kb: &KnowledgeBase,
    query: &str,
    analysis: &QueryAnalysis,
    context: &UserContext,
) -> String {
    let keywords = knowledge_for(analysis.primary_type)
        .map(|k| k.keywords.join(", "))
        .unwrap_or_default();

    format!(
        "You are an expert search query optimizer for {full} ({name}).\n\
         \n\
         CONTEXT: {context}\n\
         QUERY TYPE: {query_type}\n\
         ENTITIES FOUND: {entities}\n\
         URGENCY: {urgency}\n\
         \n\
         Generate 3 optimized search queries that will find the most relevant {name} information.\n\
         \n\
         OPTIMIZATION RULES:\n\
         1. Make queries more specific and keyword-rich\n\
         2. Include relevant university terminology: {keywords}\n\
         3. Add context words like \"{name}\", \"{full}\" where appropriate\n\
         4. For international students, include \"international\" context\n\
         5. For urgent queries, prioritize deadlines and requirements\n\
         6. Break complex questions into focused searches\n\
         \n\
         Original query: \"{query}\"\n\
         \n\
         Return ONLY a JSON array of 3 strings, no other text.",
        full = kb.full_name,
        name = kb.name,
        context = describe_context(context),
        query_type = analysis.primary_type.as_str(),
        entities = describe_entities(analysis),
        urgency = analysis.urgency_score,
    )
}
