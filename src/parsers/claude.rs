use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::deserializers::{
    Author, Content, deserialize_items, deserialize_string, deserialize_timestamp, first_text,
};
use super::{Parser, UNKNOWN_ID, normalize_role};
use crate::models::{Conversation, Message, Platform};

const USER_ROLES: &[&str] = &["human", "user"];
const ASSISTANT_ROLES: &[&str] = &["assistant", "claude"];

/// One entry of a claude.ai `conversations.json` export
#[derive(Debug, Deserialize)]
struct ClaudeConversation {
    #[serde(default, deserialize_with = "deserialize_string")]
    uuid: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string")]
    conversation_uuid: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string")]
    title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_items")]
    chat_messages: Vec<ClaudeMessage>,
    #[serde(default, deserialize_with = "deserialize_items")]
    messages: Vec<ClaudeMessage>,
    #[serde(default, deserialize_with = "deserialize_items")]
    items: Vec<ClaudeMessage>,
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
struct ClaudeMessage {
    /// A plain string in current exports, an object with `role` in older ones
    #[serde(default)]
    sender: Option<Author>,
    #[serde(default)]
    role: Option<Author>,
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

/// Parser for claude.ai data exports (`conversations.json`)
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaudeParser;

impl Parser for ClaudeParser {
    fn platform(&self) -> Platform {
        Platform::Claude
    }

    fn parse_conversation(&self, item: &Value) -> Result<Conversation> {
        let raw = ClaudeConversation::deserialize(item)?;

        let id = raw.uuid.or(raw.id).or(raw.conversation_uuid);
        let mut conversation =
            Conversation::new(id.unwrap_or_else(|| UNKNOWN_ID.to_string()), Platform::Claude);
        conversation.title = raw.title.or(raw.name);

        let messages = [raw.chat_messages, raw.messages, raw.items]
            .into_iter()
            .find(|list| !list.is_empty())
            .unwrap_or_default();
        conversation.messages = messages.into_iter().filter_map(into_message).collect();

        conversation.created_at = raw.created_at.or(raw.created);
        conversation.updated_at = raw.updated_at.or(raw.updated);
        Ok(conversation)
    }
}

fn into_message(raw: ClaudeMessage) -> Option<Message> {
    let role = raw
        .sender
        .as_ref()
        .and_then(Author::role)
        .or_else(|| raw.role.as_ref().and_then(Author::role))
        .unwrap_or("unknown");
    let role = normalize_role(role, USER_ROLES, ASSISTANT_ROLES);

    let text = first_text([raw.text.as_ref(), raw.content.as_ref()]);
    if text.trim().is_empty() {
        return None;
    }

    let mut message = Message::new(role, text);
    message.timestamp = raw.created_at.or(raw.timestamp).or(raw.created);
    Some(message)
}
