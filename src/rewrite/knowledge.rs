use crate::analysis::QueryType;

/// Vocabulary the rewriter leans on for one intent.
#[derive(Debug, Clone, Copy)]
pub struct KnowledgeEntry {
    /// Terms the LLM is asked to include.
    pub keywords: &'static [&'static str],
    /// Phrases appended to the query by the fallback path (first one used). `{kb}` stands
    /// for the knowledge base's short name.
    pub boost_terms: &'static [&'static str],
}

/// Placeholder in [`KnowledgeEntry::boost_terms`] replaced by the knowledge base name.
pub const KB_PLACEHOLDER: &str = "{kb}";

impl KnowledgeEntry {
    /// The first boost term with [`KB_PLACEHOLDER`] filled in.
    pub fn boost_for(&self, kb_name: &str) -> Option<String> {
        self.boost_terms
            .first()
            .map(|term| term.replace(KB_PLACEHOLDER, kb_name))
    }
}

const KNOWLEDGE_MAP: &[(QueryType, KnowledgeEntry)] = &[
    (
        QueryType::Admissions,
        KnowledgeEntry {
            keywords: &[
                "apply",
                "application",
                "admission",
                "entry",
                "requirement",
                "UCAS",
                "deadline",
            ],
            boost_terms: &["{kb} application", "admission requirements", "entry criteria"],
        },
    ),
    (
        QueryType::Courses,
        KnowledgeEntry {
            keywords: &["course", "program", "degree", "study", "curriculum", "module"],
            boost_terms: &["{kb} courses", "degree programs", "course content"],
        },
    ),
    (
        QueryType::FeesFunding,
        KnowledgeEntry {
            keywords: &["fee", "cost", "tuition", "funding", "scholarship", "bursary"],
            boost_terms: &["{kb} fees", "tuition costs", "financial support"],
        },
    ),
    (
        QueryType::VisaImmigration,
        KnowledgeEntry {
            keywords: &[
                "visa",
                "immigration",
                "international",
                "CAS",
                "sponsorship",
                "interview",
                "credibility",
            ],
            boost_terms: &[
                "student visa",
                "international students",
                "UK visa requirements",
                "CAS interview",
            ],
        },
    ),
];

pub fn knowledge_for(query_type: QueryType) -> Option<&'static KnowledgeEntry> {
    KNOWLEDGE_MAP
        .iter()
        .find(|(t, _)| *t == query_type)
        .map(|(_, entry)| entry)
}
