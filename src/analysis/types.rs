use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Intent category detected for a student query.
pub enum QueryType {
    Admissions,
    Courses,
    FeesFunding,
    CampusFacilities,
    VisaImmigration,
    StudentSupport,
    AcademicCalendar,
    Accommodation,
    Careers,
    /// Catch-all when no pattern matches.
    GeneralInfo,
    PersonalChat,
    Greeting,
    Complaint,
    Urgent,
}

impl QueryType {
    /// Returns the wire name (`"visa_immigration"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Admissions => "admissions",
            QueryType::Courses => "courses",
            QueryType::FeesFunding => "fees_funding",
            QueryType::CampusFacilities => "campus_facilities",
            QueryType::VisaImmigration => "visa_immigration",
            QueryType::StudentSupport => "student_support",
            QueryType::AcademicCalendar => "academic_calendar",
            QueryType::Accommodation => "accommodation",
            QueryType::Careers => "careers",
            QueryType::GeneralInfo => "general_info",
            QueryType::PersonalChat => "personal_chat",
            QueryType::Greeting => "greeting",
            QueryType::Complaint => "complaint",
            QueryType::Urgent => "urgent",
        }
    }
}

impl std::fmt::Display for QueryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Named-entity category extracted from a query.
pub enum EntityKind {
    CourseNames,
    StudyLevels,
    Locations,
    Deadlines,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::CourseNames => "course_names",
            EntityKind::StudyLevels => "study_levels",
            EntityKind::Locations => "locations",
            EntityKind::Deadlines => "deadlines",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    Medium,
    High,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Simple => "simple",
            Complexity::Medium => "medium",
            Complexity::High => "high",
        }
    }
}

/// Extracted entities: category → distinct matched substrings (lower-cased).
pub type Entities = BTreeMap<EntityKind, BTreeSet<String>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// Per-request facts supplied by the caller. Read-only inside the pipeline.
pub struct UserContext {
    pub user_id: String,
    /// e.g. `prospective`, `current`, `alumni`.
    pub student_status: Option<String>,
    /// e.g. `undergraduate`, `postgraduate`.
    pub study_level: Option<String>,
    pub is_international: Option<bool>,
    /// Primary type of the caller's previous query, if it tracks one.
    pub last_query_type: Option<QueryType>,
}

impl UserContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Default::default()
        }
    }

    pub fn with_student_status(mut self, status: impl Into<String>) -> Self {
        self.student_status = Some(status.into());
        self
    }

    pub fn with_study_level(mut self, level: impl Into<String>) -> Self {
        self.study_level = Some(level.into());
        self
    }

    pub fn with_international(mut self, international: bool) -> Self {
        self.is_international = Some(international);
        self
    }

    pub fn with_last_query_type(mut self, query_type: QueryType) -> Self {
        self.last_query_type = Some(query_type);
        self
    }

    /// `true` only when the caller explicitly marked the user as international.
    pub fn international(&self) -> bool {
        self.is_international.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Derived description of one query. Never stored.
pub struct QueryAnalysis {
    /// First matching type in table order, or [`QueryType::GeneralInfo`].
    pub primary_type: QueryType,
    /// Every matching type, in table order.
    pub all_types_matched: Vec<QueryType>,
    pub entities: Entities,
    pub urgency_score: u32,
    pub complexity: Complexity,
    pub is_question: bool,
    /// 0.2 when the caller's previous query had the same primary type.
    pub context_boost: f32,
    pub requires_personalization: bool,
    pub word_count: usize,
    pub has_specific_requirements: bool,
}

impl QueryAnalysis {
    /// Iterates every extracted entity string regardless of category.
    pub fn entity_values(&self) -> impl Iterator<Item = &str> {
        self.entities.values().flatten().map(String::as_str)
    }
}
