use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::deserializers::{
    Author, Content, deserialize_items, deserialize_string, deserialize_timestamp, first_text,
};
use super::{Parser, UNKNOWN_ID, normalize_role};
use crate::models::{Conversation, Message, Platform};

const USER_ROLES: &[&str] = &["user", "human"];
const ASSISTANT_ROLES: &[&str] = &["model", "assistant", "gemini"];

#[derive(Debug, Deserialize)]
struct GeminiConversation {
    #[serde(default, deserialize_with = "deserialize_string")]
    conversation_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string")]
    uuid: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string")]
    title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_items")]
    messages: Vec<GeminiMessage>,
    #[serde(default, deserialize_with = "deserialize_items")]
    items: Vec<GeminiMessage>,
    #[serde(default, deserialize_with = "deserialize_items")]
    history: Vec<GeminiMessage>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    created: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct GeminiMessage {
    #[serde(default)]
    role: Option<Author>,
    #[serde(default)]
    author: Option<Author>,
    /// Gemini API style `parts: [{text}]`
    #[serde(default)]
    parts: Option<Content>,
    #[serde(default)]
    text: Option<Content>,
    #[serde(default)]
    content: Option<Content>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    timestamp: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    created: Option<DateTime<Utc>>,
}

/// Parser for Gemini conversation exports
#[derive(Debug, Clone, Copy, Default)]
pub struct GeminiParser;

impl Parser for GeminiParser {
    fn platform(&self) -> Platform {
        Platform::Gemini
    }

    fn parse_conversation(&self, item: &Value) -> Result<Conversation> {
        let raw = GeminiConversation::deserialize(item)?;

        let id = raw.conversation_id.or(raw.id).or(raw.uuid);
        let mut conversation =
            Conversation::new(id.unwrap_or_else(|| UNKNOWN_ID.to_string()), Platform::Gemini);
        conversation.title = raw.title.or(raw.name);

        let messages = [raw.messages, raw.items, raw.history]
            .into_iter()
            .find(|list| !list.is_empty())
            .unwrap_or_default();
        conversation.messages = messages.into_iter().filter_map(into_message).collect();

        conversation.created_at = raw.created_at.or(raw.created);
        conversation.updated_at = raw.updated_at.or(raw.updated);
        Ok(conversation)
    }
}

fn into_message(raw: GeminiMessage) -> Option<Message> {
    let role = raw
        .role
        .as_ref()
        .and_then(Author::role)
        .or_else(|| raw.author.as_ref().and_then(Author::role))
        .unwrap_or("unknown");
    let role = normalize_role(role, USER_ROLES, ASSISTANT_ROLES);

    let text = first_text([raw.parts.as_ref(), raw.text.as_ref(), raw.content.as_ref()]);
    if text.trim().is_empty() {
        return None;
    }

    let mut message = Message::new(role, text);
    message.timestamp = raw.created_at.or(raw.timestamp).or(raw.created);
    Some(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_parse_parts_and_model_role() {
        let bytes = br#"{"items": [{
            "conversation_id": "g-1",
            "title": "Trip planner",
            "updated": 1735689600,
            "history": [
                {"role": "user", "parts": [{"text": "Plan a trip"}]},
                {"role": "model", "parts": [{"text": "Day 1"}, {"text": "Day 2"}]},
                {"author": {"role": "human"}, "text": "thanks"}
            ]
        }]}"#;

        let conversations = GeminiParser.parse(bytes).unwrap();
        let conv = &conversations[0];
        assert_eq!(conv.id, "g-1");
        assert_eq!(conv.platform, Platform::Gemini);
        assert_eq!(conv.messages.len(), 3);
        assert_eq!(conv.messages[0].role, Role::User);
        assert_eq!(conv.messages[1].role, Role::Assistant);
        assert_eq!(conv.messages[1].text, "Day 1\nDay 2");
        assert_eq!(conv.messages[2].role, Role::User);
        assert_eq!(conv.updated_at.map(|t| t.timestamp()), Some(1735689600));
    }

    #[test]
    fn test_message_without_text_is_dropped() {
        let bytes = br#"[{"id": "g", "messages": [{"role": "user", "parts": [{"inline_data": {}}]}]}]"#;
        let conversations = GeminiParser.parse(bytes).unwrap();
        assert!(conversations[0].messages.is_empty());
    }

    #[test]
    fn test_empty_parts_fall_back_to_text() {
        let bytes = br#"[{"conversation_id": "g", "messages": [
            {"role": "model", "parts": [], "text": "from text"},
            {"role": "", "author": {"role": "user"}, "content": "from content"}
        ]}]"#;
        let conversations = GeminiParser.parse(bytes).unwrap();
        let messages = &conversations[0].messages;
        assert_eq!(messages[0].text, "from text");
        assert_eq!(messages[0].role, Role::Assistant);
        assert_eq!(messages[1].text, "from content");
        assert_eq!(messages[1].role, Role::User);
    }
}
