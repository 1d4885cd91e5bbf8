//! Analysis engine: extract → score → threshold → rank, over a whole batch.
//!
//! # Error Handling Strategy
//!
//! - **Per-conversation processing is total**: empty, unstamped or keyword-free
//!   conversations are scored like any other and simply fall below the threshold.
//! - **Structural input errors fail the run**: a conversation without an identifier is
//!   rejected up front with [`AnalysisError::InvalidInput`]; no partial result is returned.
//! - **No findings is not an error**: the result is an empty vector.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::Analyzer;
use super::confidence::score_confidence;
use super::error::AnalysisError;
use super::priority::{FindingDraft, rank, score_priority};
use super::signals::extract;
use crate::config::AnalysisConfig;
use crate::models::{
    AnalysisReport, Conversation, Evidence, Finding, KeywordHit, PlatformCount, SignalSet,
};

const EXCERPT_RADIUS: usize = 200;
const TITLE_MAX_CHARS: usize = 100;
const TITLE_MIN_CHARS: usize = 20;

/// Analyze a batch of conversations and return ranked findings.
///
/// Conversations are processed in input order (file order, then in-file order) and the
/// accepted findings are ranked globally, across every source platform.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidInput`] if any conversation has a blank identifier.
///
/// # Examples
///
/// ```
/// use ai_history_analyser::analysis::analyze;
/// use ai_history_analyser::config::AnalysisConfig;
/// use ai_history_analyser::models::{Conversation, Message, Platform, Role};
/// use chrono::Utc;
///
/// let mut conv = Conversation::new("abc", Platform::Claude);
/// conv.messages.push(Message::new(Role::User, "TODO: finish the auth flow, need to add tests"));
///
/// let findings = analyze(&[conv], &AnalysisConfig::default(), Utc::now())?;
/// assert_eq!(findings.len(), 1);
/// # Ok::<(), ai_history_analyser::analysis::AnalysisError>(())
/// ```
pub fn analyze(
    conversations: &[Conversation],
    config: &AnalysisConfig,
    now: DateTime<Utc>,
) -> Result<Vec<Finding>, AnalysisError> {
    validate_input(conversations)?;

    let mut findings = Vec::new();
    for conversation in conversations {
        let signals = extract(conversation, config);
        let confidence = score_confidence(&signals, config);

        if confidence < config.min_confidence {
            tracing::debug!(
                conversation = %conversation.id,
                platform = %conversation.platform,
                confidence,
                "below threshold, discarded"
            );
            continue;
        }

        let draft = FindingDraft { conversation, signals, confidence };
        let priority = score_priority(&draft, config, now);
        tracing::debug!(
            conversation = %conversation.id,
            platform = %conversation.platform,
            confidence,
            priority,
            "accepted"
        );
        findings.push(build_finding(draft, priority));
    }

    tracing::info!(
        analyzed = conversations.len(),
        accepted = findings.len(),
        min_confidence = config.min_confidence,
        "analysis complete"
    );

    Ok(rank(findings))
}

fn validate_input(conversations: &[Conversation]) -> Result<(), AnalysisError> {
    for (index, conversation) in conversations.iter().enumerate() {
        if conversation.id.trim().is_empty() {
            return Err(AnalysisError::InvalidInput {
                index,
                reason: "conversation identifier is empty".to_string(),
            });
        }
    }
    Ok(())
}

/// Stable finding id: the same platform and conversation id always map to the same UUID
pub fn finding_id(conversation: &Conversation) -> Uuid {
    let name = format!("{}:{}", conversation.platform, conversation.id);
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
}

fn build_finding(draft: FindingDraft<'_>, priority: f64) -> Finding {
    let FindingDraft { conversation, signals, confidence } = draft;

    let first_hit = signals.first_hit();
    let excerpt = first_hit.map(|hit| excerpt(conversation, hit)).unwrap_or_default();
    let title = title_for(conversation, &signals);
    let tags = tags_for(conversation, &signals);

    let evidence = Evidence {
        keywords: signals.distinct_keywords(),
        markers: signals.distinct_markers(),
        keyword_hits: signals.keyword_hits.len(),
        message_count: signals.message_count,
        text_length: signals.text_length,
        ends_unresolved: signals.ends_unresolved,
        recency: signals.recency,
        excerpt,
    };

    Finding {
        id: finding_id(conversation),
        conversation_id: conversation.id.clone(),
        title,
        platform: conversation.platform,
        last_activity: signals.recency.timestamp(),
        confidence,
        priority,
        tags,
        evidence,
    }
}

/// Text of the hit's message, up to [`EXCERPT_RADIUS`] characters either side of the match
fn excerpt(conversation: &Conversation, hit: &KeywordHit) -> String {
    let Some(message) = conversation.messages.get(hit.message_index) else {
        return String::new();
    };
    let chars: Vec<char> = message.text.chars().collect();
    let start = hit.offset.saturating_sub(EXCERPT_RADIUS).min(chars.len());
    let end = (hit.offset + hit.matched.chars().count() + EXCERPT_RADIUS).min(chars.len());
    chars[start..end].iter().collect::<String>().trim().to_string()
}

fn title_for(conversation: &Conversation, signals: &SignalSet) -> String {
    if let Some(title) = conversation.title.as_deref().map(str::trim)
        && !title.is_empty()
    {
        return title.to_string();
    }

    let Some(hit) = signals.first_hit() else {
        return format!("Conversation {}", conversation.id);
    };

    if let Some(message) = conversation.messages.get(hit.message_index) {
        let sentence = sentence_around(&message.text, hit.offset);
        if sentence.chars().count() > TITLE_MIN_CHARS {
            return sentence.chars().take(TITLE_MAX_CHARS).collect::<String>().trim_end().to_string();
        }
    }

    format!("Unfinished project: {}", hit.keyword)
}

/// The sentence (or line) containing the character at `offset`
fn sentence_around(text: &str, offset: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    let offset = offset.min(chars.len());

    let mut start = offset;
    while start > 0 {
        let prev = chars[start - 1];
        if prev == '\n' {
            break;
        }
        if prev.is_whitespace() && start >= 2 && matches!(chars[start - 2], '.' | '!' | '?') {
            break;
        }
        start -= 1;
    }

    let mut end = offset;
    while end < chars.len() {
        let c = chars[end];
        if c == '\n' {
            break;
        }
        end += 1;
        if matches!(c, '.' | '!' | '?') && chars.get(end).is_none_or(|next| next.is_whitespace()) {
            break;
        }
    }

    chars[start..end].iter().collect::<String>().trim().to_string()
}

const IMPLEMENTATION_WORDS: &[&str] = &[
    "implement",
    "implements",
    "implemented",
    "implementing",
    "implementation",
    "create",
    "creates",
    "created",
    "creating",
];
const BUGFIX_WORDS: &[&str] = &["fix", "fixes", "fixed", "fixing", "bug", "bugs"];
const FEATURE_WORDS: &[&str] = &["add", "adds", "adding", "feature", "features"];

/// Platform tag plus topic tags taken from the whole words of the sentence around the
/// first hit
fn tags_for(conversation: &Conversation, signals: &SignalSet) -> Vec<String> {
    let mut tags = vec![conversation.platform.to_string()];

    let Some(sentence) = signals.first_hit().and_then(|hit| {
        let message = conversation.messages.get(hit.message_index)?;
        Some(sentence_around(&message.text, hit.offset).to_lowercase())
    }) else {
        return tags;
    };
    let words: Vec<&str> =
        sentence.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()).collect();

    for (tag, vocabulary) in [
        ("implementation", IMPLEMENTATION_WORDS),
        ("bugfix", BUGFIX_WORDS),
        ("feature", FEATURE_WORDS),
    ] {
        if words.iter().any(|w| vocabulary.contains(w)) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// The default analyzer: flags conversations that describe unfinished projects
#[derive(Debug, Clone, Copy, Default)]
pub struct UnfinishedProjectsAnalyzer;

impl Analyzer for UnfinishedProjectsAnalyzer {
    fn name(&self) -> &'static str {
        "unfinished-projects"
    }

    fn analyze(
        &self,
        conversations: &[Conversation],
        config: &AnalysisConfig,
        now: DateTime<Utc>,
    ) -> Result<AnalysisReport, AnalysisError> {
        let findings = analyze(conversations, config, now)?;
        Ok(AnalysisReport {
            analyzer: self.name().to_string(),
            generated_at: now,
            conversations_analyzed: conversations.len(),
            platforms: platform_counts(conversations),
            findings,
        })
    }
}

fn platform_counts(conversations: &[Conversation]) -> Vec<PlatformCount> {
    let mut counts = BTreeMap::new();
    for conversation in conversations {
        *counts.entry(conversation.platform).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(platform, conversations)| PlatformCount { platform, conversations })
        .collect()
}
