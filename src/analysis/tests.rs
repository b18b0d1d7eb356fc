use super::*;

fn analyze(query: &str) -> QueryAnalysis {
    QueryAnalyzer::new().analyze(query, &UserContext::new("test-user"))
}

#[test]
fn test_all_builtin_patterns_compile() {
    let analyzer = QueryAnalyzer::new();
    assert_eq!(analyzer.intents.len(), patterns::INTENT_PATTERNS.len());
    assert_eq!(analyzer.entities.len(), patterns::ENTITY_PATTERNS.len());
}

#[test]
fn test_visa_query_classification() {
    let analysis = analyze("What are the CAS interview requirements?");

    assert_eq!(analysis.primary_type, QueryType::VisaImmigration);
    assert!(analysis.is_question);
    assert_eq!(analysis.complexity, Complexity::Simple);
    assert!(analysis.entities.is_empty());
}

#[test]
fn test_table_order_decides_primary_type() {
    // Matches admissions ("apply") and courses ("computer science"); admissions is declared first.
    let analysis = analyze("How do I apply for computer science?");

    assert_eq!(analysis.primary_type, QueryType::Admissions);
    assert_eq!(
        analysis.all_types_matched,
        vec![QueryType::Admissions, QueryType::Courses]
    );
}

#[test]
fn test_unmatched_query_defaults_to_general_info() {
    let analysis = analyze("asdkjaslkd");

    assert_eq!(analysis.primary_type, QueryType::GeneralInfo);
    assert!(analysis.all_types_matched.is_empty());
    assert!(analysis.entities.is_empty());
    assert_eq!(analysis.urgency_score, 0);
    assert!(!analysis.is_question);
    assert!(!analysis.has_specific_requirements);
}

#[test]
fn test_greeting_exact_match() {
    let analysis = analyze("Hello");
    assert_eq!(analysis.primary_type, QueryType::Greeting);
}

#[test]
fn test_entity_extraction() {
    let analysis = analyze("Postgraduate nursing courses in Paisley or Hamilton");

    let levels = analysis.entities.get(&EntityKind::StudyLevels).unwrap();
    assert!(levels.contains("postgraduate"));

    let courses = analysis.entities.get(&EntityKind::CourseNames).unwrap();
    assert!(courses.contains("nursing"));

    let locations = analysis.entities.get(&EntityKind::Locations).unwrap();
    assert_eq!(locations.len(), 2);
    assert!(locations.contains("paisley"));
    assert!(locations.contains("hamilton"));

    assert!(analysis.has_specific_requirements);
}

#[test]
fn test_entity_values_are_distinct() {
    let analysis = analyze("law law law");
    let courses = analysis.entities.get(&EntityKind::CourseNames).unwrap();
    assert_eq!(courses.len(), 1);
}

#[test]
fn test_deadline_dates_extracted() {
    let analysis = analyze("15/01/2025 is the deadline?");
    let deadlines = analysis.entities.get(&EntityKind::Deadlines).unwrap();
    assert!(deadlines.contains("15/01/2025"));
}

#[test]
fn test_urgency_score_counts_indicators() {
    let analysis = analyze("urgent: I need this asap before the deadline");
    assert_eq!(analysis.urgency_score, 3);
}

#[test]
fn test_complexity_levels() {
    assert_eq!(analyze("fees").complexity, Complexity::Simple);
    assert_eq!(
        analyze("what are the tuition fees for the nursing degree programme").complexity,
        Complexity::Medium
    );
    assert_eq!(
        analyze("fees and scholarships").complexity,
        Complexity::High
    );
    assert_eq!(
        analyze("one two three four five six seven eight nine ten eleven twelve thirteen fourteen fifteen sixteen")
            .complexity,
        Complexity::High
    );
}

#[test]
fn test_conjunction_detection_is_word_level() {
    // "understand" and "brand" must not count as "and".
    assert_eq!(analyze("understand the brand").complexity, Complexity::Simple);
}

#[test]
fn test_question_detection() {
    assert!(analyze("Tell me about halls?").is_question);
    assert!(analyze("where is the library").is_question);
    assert!(!analyze("library opening hours").is_question);
}

#[test]
fn test_context_boost_for_continuing_topic() {
    let analyzer = QueryAnalyzer::new();
    let context = UserContext::new("u1").with_last_query_type(QueryType::FeesFunding);

    let same_topic = analyzer.analyze("tuition for next year", &context);
    assert_eq!(same_topic.context_boost, CONTEXT_CONTINUATION_BOOST);

    let new_topic = analyzer.analyze("where are the halls", &context);
    assert_eq!(new_topic.context_boost, 0.0);
}

#[test]
fn test_personalization_detection() {
    assert!(analyze("Can I get a scholarship?").requires_personalization);
    assert!(analyze("is this course for me").requires_personalization);
    assert!(!analyze("scholarship deadlines").requires_personalization);
}

#[test]
fn test_personalization_through_contractions() {
    let analysis = analyze("I'm an international student starting in September");
    assert!(analysis.requires_personalization);
    assert!(analyze("i've been offered a place").requires_personalization);
    assert!(analyze("I\u{2019}ll need accommodation").requires_personalization);
    assert!(!analyze("what's the library's opening time").requires_personalization);
}

#[test]
fn test_analysis_is_deterministic() {
    let analyzer = QueryAnalyzer::new();
    let context = UserContext::new("u1")
        .with_study_level("postgraduate")
        .with_international(true);
    let query = "Urgent: postgraduate visa and fees in London by 12 March?";

    let first = analyzer.analyze(query, &context);
    let second = analyzer.analyze(query, &context);

    assert_eq!(first, second);
}

#[test]
fn test_word_count() {
    assert_eq!(analyze("  three   word query ").word_count, 3);
}
