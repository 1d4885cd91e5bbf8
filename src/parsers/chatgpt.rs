use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::deserializers::{
    Author, Content, deserialize_items, deserialize_nodes, deserialize_string,
    deserialize_timestamp, first_text,
};
use super::{Parser, UNKNOWN_ID, normalize_role};
use crate::models::{Conversation, Message, Platform};

const USER_ROLES: &[&str] = &["user"];
const ASSISTANT_ROLES: &[&str] = &["assistant", "chatgpt", "gpt"];

/// One entry of a ChatGPT `conversations.json` export
#[derive(Debug, Deserialize)]
struct ChatGptConversation {
    #[serde(default, deserialize_with = "deserialize_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string")]
    conversation_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string")]
    uuid: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string")]
    title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string")]
    name: Option<String>,
    /// Official export: message nodes keyed by node id
    #[serde(default, deserialize_with = "deserialize_nodes")]
    mapping: Vec<ChatGptMessage>,
    #[serde(default, deserialize_with = "deserialize_items")]
    messages: Vec<ChatGptMessage>,
    #[serde(default, deserialize_with = "deserialize_items")]
    items: Vec<ChatGptMessage>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    create_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    update_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    updated_at: Option<DateTime<Utc>>,
}

/// A message, or a mapping node wrapping one in `message` (root nodes carry
/// `"message": null` and no content of their own)
#[derive(Debug, Deserialize)]
struct ChatGptMessage {
    #[serde(default)]
    message: Option<Box<ChatGptMessage>>,
    #[serde(default)]
    author: Option<Author>,
    #[serde(default)]
    role: Option<Author>,
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    text: Option<Content>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    create_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    timestamp: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    created_at: Option<DateTime<Utc>>,
}

impl ChatGptMessage {
    fn own_time(&self) -> Option<DateTime<Utc>> {
        self.create_time.or(self.timestamp)
    }

    /// Sort key of a mapping node; nodes without any time sort first
    fn node_time(&self) -> Option<DateTime<Utc>> {
        self.own_time().or_else(|| self.message.as_ref().and_then(|m| m.own_time()))
    }
}

/// Parser for ChatGPT `conversations.json` exports.
///
/// Handles both the node `mapping` layout of the official export and flat `messages`
/// arrays produced by third-party exporters.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChatGptParser;

impl Parser for ChatGptParser {
    fn platform(&self) -> Platform {
        Platform::ChatGpt
    }

    fn parse_conversation(&self, item: &Value) -> Result<Conversation> {
        let raw = ChatGptConversation::deserialize(item)?;

        let id = raw.id.or(raw.conversation_id).or(raw.uuid);
        let mut conversation =
            Conversation::new(id.unwrap_or_else(|| UNKNOWN_ID.to_string()), Platform::ChatGpt);
        conversation.title = raw.title.or(raw.name);

        let messages = if raw.mapping.is_empty() {
            if raw.messages.is_empty() { raw.items } else { raw.messages }
        } else {
            // Stable: nodes with equal times keep key order
            let mut nodes = raw.mapping;
            nodes.sort_by_key(ChatGptMessage::node_time);
            nodes
        };
        conversation.messages = messages.into_iter().filter_map(into_message).collect();

        conversation.created_at = raw.create_time.or(raw.created_at);
        conversation.updated_at = raw.update_time.or(raw.updated_at);
        Ok(conversation)
    }
}

fn into_message(mut node: ChatGptMessage) -> Option<Message> {
    let data = match node.message.take() {
        Some(inner) => *inner,
        None => node,
    };

    let role = data
        .author
        .as_ref()
        .and_then(Author::role)
        .or_else(|| data.role.as_ref().and_then(Author::role))
        .unwrap_or("unknown");
    let role = normalize_role(role, USER_ROLES, ASSISTANT_ROLES);

    let text = first_text([data.content.as_ref(), data.text.as_ref()]);
    if text.trim().is_empty() {
        return None;
    }

    let mut message = Message::new(role, text);
    message.timestamp = data.own_time().or(data.created_at);
    Some(message)
}
