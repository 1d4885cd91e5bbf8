/// Edge case integration tests
///
/// These tests cover unusual export shapes, odd content and boundary configuration
mod common;

use ai_history_analyser::analysis::{AnalysisError, analyze};
use ai_history_analyser::config::{AnalysisConfig, parse_config};
use ai_history_analyser::models::{Conversation, Message, Platform, Role};
use ai_history_analyser::parsers::{ChatGptParser, ClaudeParser, GeminiParser, Parser};
use chrono::{TimeZone, Utc};
use common::{ConversationBuilder, ExportDirBuilder};

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap()
}

#[test]
fn test_edge_case_empty_export() {
    assert!(ClaudeParser.parse(b"[]").unwrap().is_empty());
    assert!(GeminiParser.parse(br#"{"conversations": []}"#).unwrap().is_empty());

    let findings = analyze(&[], &AnalysisConfig::default(), now()).unwrap();
    assert!(findings.is_empty(), "No conversations is not an error");
}

#[test]
fn test_edge_case_single_conversation_object() {
    let doc = br#"{"conversation_id": "solo", "messages": [{"role": "user", "text": "WIP: parser"}]}"#;
    let conversations = GeminiParser.parse(doc).unwrap();
    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0].id, "solo");
}

#[test]
fn test_edge_case_missing_ids_become_unknown() {
    let conversations =
        ChatGptParser.parse(br#"[{"messages": [{"role": "user", "content": "TODO"}]}]"#).unwrap();
    assert_eq!(conversations[0].id, "unknown");
    assert!(analyze(&conversations, &AnalysisConfig::default(), now()).is_ok());
}

#[test]
fn test_edge_case_blank_id_is_invalid_input() {
    let conversations = vec![
        Conversation::new("fine", Platform::Claude),
        Conversation::new("   ", Platform::Gemini),
    ];
    let err = analyze(&conversations, &AnalysisConfig::default(), now()).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidInput { index: 1, .. }));
}

#[test]
fn test_edge_case_unicode_and_emoji_content() {
    let exports = ExportDirBuilder::new().with_claude_export(
        "c.json",
        &[ConversationBuilder::new("uni")
            .user("🚀 Déploiement: TODO: finir la migration 数据库, need to vérifier")
            .assistant("Très bien. Next step: écrire les tests ✅")],
    );

    let conversations = ClaudeParser.parse_file(&exports.file("c.json")).unwrap();
    let findings = analyze(&conversations, &AnalysisConfig::default(), now()).unwrap();
    assert_eq!(findings.len(), 1);

    let excerpt = &findings[0].evidence.excerpt;
    assert!(excerpt.contains("TODO"));
    assert!(excerpt.contains("🚀"));
}

#[test]
fn test_edge_case_case_insensitive_matching() {
    let mut conv = Conversation::new("case", Platform::ChatGpt);
    conv.messages.push(Message::new(Role::User, "todo: Fixme later, it is Not Implemented"));
    let findings = analyze(&[conv], &AnalysisConfig::default(), now()).unwrap();
    assert_eq!(findings.len(), 1);
    assert!(findings[0].evidence.markers.iter().any(|m| m == "not implemented"));
}

#[test]
fn test_edge_case_very_long_conversation() {
    let mut conv = Conversation::new("long", Platform::Claude);
    for i in 0..500 {
        conv.messages.push(Message::new(Role::User, format!("Question {} about lifetimes", i)));
        conv.messages.push(Message::new(Role::Assistant, "Lifetimes tie references together."));
    }
    conv.messages.push(Message::new(Role::User, "TODO: still need to refactor the cache"));

    let config = AnalysisConfig { min_confidence: 0.0, ..AnalysisConfig::default() };
    let findings = analyze(&[conv], &config, now()).unwrap();
    assert_eq!(findings.len(), 1);
    assert!(findings[0].confidence <= 1.0);
    assert_eq!(findings[0].evidence.excerpt, "TODO: still need to refactor the cache");
}

#[test]
fn test_edge_case_zero_threshold_admits_silent_conversations() {
    let mut quiet = Conversation::new("quiet", Platform::Gemini);
    quiet.messages.push(Message::new(Role::User, "What is the capital of France?"));
    quiet.messages.push(Message::new(Role::Assistant, "Paris."));

    let config = AnalysisConfig { min_confidence: 0.0, ..AnalysisConfig::default() };
    let findings = analyze(&[quiet], &config, now()).unwrap();
    assert_eq!(findings.len(), 1, "A zero threshold admits every conversation");
    assert_eq!(findings[0].confidence, 0.0);
}

#[test]
fn test_edge_case_custom_keywords_from_config() {
    let config = parse_config(
        r#"
[analysis]
keywords = ["backlog"]
markers = ["parked"]
min_confidence = 0.5
"#,
    )
    .unwrap();

    let mut conv = Conversation::new("custom", Platform::Claude);
    conv.messages.push(Message::new(Role::User, "Parked the idea, it's on the backlog"));
    let findings = analyze(&[conv], &config.analysis, now()).unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].evidence.keywords, vec!["backlog".to_string()]);
    assert_eq!(findings[0].evidence.markers, vec!["parked".to_string()]);
}

#[test]
fn test_edge_case_future_timestamp_counts_as_now() {
    let mut future = Conversation::new("future", Platform::Claude);
    future.updated_at = Some(now() + chrono::Duration::days(30));
    future.messages.push(Message::new(Role::User, "TODO: finish it"));

    let mut current = future.clone();
    current.id = "current".to_string();
    current.updated_at = Some(now());

    let findings = analyze(&[future, current], &AnalysisConfig::default(), now()).unwrap();
    assert_eq!(findings.len(), 2);
    assert_eq!(findings[0].priority, findings[1].priority);
    assert_eq!(findings[0].conversation_id, "current", "Ties fall back to id order");
}

#[test]
fn test_edge_case_empty_phrase_lists_from_config() {
    let config = parse_config("[analysis]\nkeywords = []\nmarkers = []\n").unwrap();
    assert!(config.analysis.keywords.is_empty());
    assert!(config.analysis.markers.is_empty());

    let exports = ExportDirBuilder::new().with_claude_export(
        "c.json",
        &[ConversationBuilder::new("bare")
            .user("TODO: still need to write the exporter")
            .assistant("The exporter is not implemented. Would you like me to start?")],
    );
    let conversations = ClaudeParser.parse_file(&exports.file("c.json")).unwrap();

    let findings = analyze(&conversations, &config.analysis, now()).unwrap();
    assert!(findings.is_empty());

    let open = AnalysisConfig { min_confidence: 0.0, ..config.analysis };
    let findings = analyze(&conversations, &open, now()).unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].confidence, 0.0);
    assert!((0.0..=1.0).contains(&findings[0].priority));
}

#[test]
fn test_edge_case_keywords_inside_longer_words() {
    let mut swipe = Conversation::new("swipe", Platform::ChatGpt);
    swipe.messages.push(Message::new(Role::User, "Please add swipe gestures to the gallery."));
    swipe.messages.push(Message::new(
        Role::Assistant,
        "Swipe gestures are implemented. All tests pass and it is deployed.",
    ));

    let mut hackathon = Conversation::new("hackathon", Platform::Claude);
    hackathon
        .messages
        .push(Message::new(Role::User, "Our hackathon demo shipped; dismissing the old todos list."));

    let findings = analyze(&[swipe, hackathon], &AnalysisConfig::default(), now()).unwrap();
    assert!(findings.is_empty());
}
