//! Data tables driving intent classification and entity extraction.
//!
//! Row order in [`INTENT_PATTERNS`] is the tie-break priority: the first row with any
//! matching pattern becomes the primary type. Add new intents by appending rows.

use super::types::{EntityKind, QueryType};

pub const INTENT_PATTERNS: &[(QueryType, &[&str])] = &[
    (
        QueryType::Admissions,
        &[
            r"\b(apply|application|admission|entry|requirement|deadline|qualify)\b",
            r"\b(how to apply|when to apply|application process)\b",
            r"\b(UCAS|conditional offer|unconditional)\b",
        ],
    ),
    (
        QueryType::Courses,
        &[
            r"\b(course|program|degree|study|subject|module|curriculum|major)\b",
            r"\b(computer science|engineering|business|psychology|nursing)\b",
            r"\b(undergraduate|postgraduate|masters|PhD|bachelor)\b",
        ],
    ),
    (
        QueryType::FeesFunding,
        &[
            r"\b(fee|cost|tuition|price|payment|scholarship|funding|bursary)\b",
            r"\b(how much|expensive|afford|student loan)\b",
            r"\b(international fees|home fees|EU fees)\b",
        ],
    ),
    (
        QueryType::VisaImmigration,
        &[
            r"\b(visa|immigration|tier 4|student visa|CAS|sponsorship|interview)\b",
            r"\b(international student|work permit|stay after study)\b",
            r"\b(credibility interview|pre-cas|confirmation of acceptance)\b",
        ],
    ),
    (
        QueryType::Accommodation,
        &[
            r"\b(accommodation|housing|residence|dormitory|flat|room)\b",
            r"\b(where to live|student accommodation|halls)\b",
        ],
    ),
    (
        QueryType::CampusFacilities,
        &[
            r"\b(campus|library|gym|facilities|sports|dining|cafeteria)\b",
            r"\b(student union|societies|clubs|activities)\b",
        ],
    ),
    (
        QueryType::StudentSupport,
        &[
            r"\b(support|help|counseling|guidance|wellbeing|mental health)\b",
            r"\b(academic support|study skills|disability support)\b",
        ],
    ),
    (
        QueryType::Careers,
        &[
            r"\b(career|job|employment|placement|internship|graduate)\b",
            r"\b(career service|job fair|work experience)\b",
        ],
    ),
    (
        QueryType::Urgent,
        &[
            r"\b(urgent|emergency|asap|immediate|deadline|quick)\b",
            r"\b(need help now|very important|time sensitive)\b",
        ],
    ),
    (
        QueryType::Complaint,
        &[
            r"\b(complain|problem|issue|disappointed|unhappy|wrong)\b",
            r"\b(not working|doesn't work|frustrated)\b",
        ],
    ),
    (
        QueryType::Greeting,
        &[
            r"\b(hello|hi|hey|good morning|good afternoon|good evening)\b",
            r"^(hi|hello|hey)$",
        ],
    ),
];

pub const ENTITY_PATTERNS: &[(EntityKind, &str)] = &[
    (
        EntityKind::CourseNames,
        r"\b(computer science|engineering|business|psychology|nursing|medicine|law)\b",
    ),
    (
        EntityKind::StudyLevels,
        r"\b(undergraduate|postgraduate|masters|phd|bachelor)\b",
    ),
    (
        EntityKind::Locations,
        r"\b(paisley|hamilton|dumfries|london|ayr)\b",
    ),
    (
        EntityKind::Deadlines,
        r"\b(\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4}|\w+ \d{1,2}|\d{1,2} \w+)\b",
    ),
];

/// Substrings counted towards the urgency score.
pub const URGENCY_INDICATORS: &[&str] = &[
    "urgent",
    "asap",
    "immediate",
    "quickly",
    "deadline",
    "emergency",
];

pub const QUESTION_WORDS: &[&str] = &[
    "what", "how", "when", "where", "why", "which", "who", "can", "should", "will",
];

pub const CONJUNCTION_WORDS: &[&str] = &["and", "also"];

/// Single-word first-person markers.
pub const PERSONAL_WORDS: &[&str] = &["my", "i", "me"];

/// Multi-word first-person phrases.
pub const PERSONAL_PHRASES: &[&str] = &["for me", "should i", "can i"];
