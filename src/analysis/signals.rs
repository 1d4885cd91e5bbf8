//! Signal extraction: keyword and marker hits plus structural cues for one conversation.

use crate::config::AnalysisConfig;
use crate::models::{Conversation, KeywordHit, Recency, Role, SignalSet};

/// Extract every signal the scorers need from one conversation.
///
/// Pure and total: an empty conversation yields an empty set, a conversation without any
/// timestamp yields [`Recency::Unknown`].
pub fn extract(conversation: &Conversation, config: &AnalysisConfig) -> SignalSet {
    let recency = Recency::from(conversation.last_activity());
    if conversation.messages.is_empty() {
        return SignalSet::empty(recency);
    }

    let keywords = compile(&config.keywords);
    let markers = compile(&config.markers);
    let actions = compile(&config.action_keywords);

    let mut keyword_hits = Vec::new();
    let mut marker_hits = Vec::new();
    let mut text_length = 0;

    for (index, message) in conversation.messages.iter().enumerate() {
        let chars: Vec<(usize, char)> = message.text.char_indices().collect();
        text_length += chars.len();
        collect_hits(&message.text, &chars, index, &keywords, &mut keyword_hits);
        collect_hits(&message.text, &chars, index, &markers, &mut marker_hits);
    }

    // Stable: keyword order is kept for hits at the same position
    keyword_hits.sort_by_key(|h| (h.message_index, h.offset));
    marker_hits.sort_by_key(|h| (h.message_index, h.offset));

    let ends_unresolved = conversation.messages.last().is_some_and(|last| {
        if last.role != Role::Assistant {
            return false;
        }
        let chars: Vec<(usize, char)> = last.text.char_indices().collect();
        actions.iter().any(|(_, needle)| !find_all(&chars, needle).is_empty())
    });

    SignalSet {
        keyword_hits,
        marker_hits,
        message_count: conversation.messages.len(),
        text_length,
        ends_unresolved,
        recency,
    }
}

/// Keyword paired with its characters; blank keywords are dropped since they would match
/// everywhere
fn compile(phrases: &[String]) -> Vec<(&str, Vec<char>)> {
    phrases
        .iter()
        .filter(|p| !p.trim().is_empty())
        .map(|p| (p.as_str(), p.chars().collect()))
        .collect()
}

fn collect_hits(
    text: &str,
    chars: &[(usize, char)],
    message_index: usize,
    phrases: &[(&str, Vec<char>)],
    out: &mut Vec<KeywordHit>,
) {
    for (keyword, needle) in phrases {
        for (offset, byte_start, byte_end) in find_all(chars, needle) {
            let end = byte_end.unwrap_or(text.len());
            out.push(KeywordHit {
                keyword: keyword.to_string(),
                message_index,
                offset,
                matched: text[byte_start..end].to_string(),
            });
        }
    }
}

/// Non-overlapping, case-insensitive, whole-word occurrences of `needle`.
///
/// An edge of the needle that is a word character must sit next to a non-word character
/// or the end of the text, so "WIP" does not match inside "swipe". Returns
/// `(char offset, byte start, byte end)`; the end is `None` when the match runs to the
/// end of the text.
fn find_all(haystack: &[(usize, char)], needle: &[char]) -> Vec<(usize, usize, Option<usize>)> {
    let mut found = Vec::new();
    let (Some(&first), Some(&last)) = (needle.first(), needle.last()) else {
        return found;
    };
    if needle.len() > haystack.len() {
        return found;
    }

    let mut start = 0;
    while start + needle.len() <= haystack.len() {
        let end = start + needle.len();
        let matches = needle.iter().zip(&haystack[start..]).all(|(n, (_, h))| chars_eq(*n, *h))
            && (!is_word_char(first) || start == 0 || !is_word_char(haystack[start - 1].1))
            && (!is_word_char(last) || haystack.get(end).is_none_or(|(_, c)| !is_word_char(*c)));
        if matches {
            let byte_end = haystack.get(end).map(|(b, _)| *b);
            found.push((start, haystack[start].0, byte_end));
            start = end;
        } else {
            start += 1;
        }
    }
    found
}

fn chars_eq(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
