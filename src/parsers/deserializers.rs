//! Serde building blocks shared by the export schemas.
//!
//! Export formats drift between versions, so every field is read leniently: a value of
//! the wrong shape becomes "absent" instead of failing the whole conversation, and empty
//! strings count as missing.

use chrono::{DateTime, Utc};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::timestamps::parse_timestamp;

/// Message content as the platforms write it: plain text, a block with `text`, `content`
/// or `parts`, or a list of either
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Blocks(Vec<Content>),
    Block(ContentBlock),
    Other(IgnoredAny),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentBlock {
    #[serde(default)]
    pub parts: Option<Box<Content>>,
    #[serde(default)]
    pub text: Option<Box<Content>>,
    #[serde(default)]
    pub content: Option<Box<Content>>,
}

impl Content {
    /// Flattened text; list items are joined by newlines, blocks without text are dropped
    pub fn text(&self) -> String {
        match self {
            Content::Text(s) => s.clone(),
            Content::Blocks(items) => items
                .iter()
                .map(Content::text)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
            Content::Block(block) => first_text([
                block.parts.as_deref(),
                block.text.as_deref(),
                block.content.as_deref(),
            ]),
            Content::Other(_) => String::new(),
        }
    }
}

/// Text of the first candidate that has any
pub fn first_text<'a>(candidates: impl IntoIterator<Item = Option<&'a Content>>) -> String {
    candidates.into_iter().flatten().map(Content::text).find(|t| !t.is_empty()).unwrap_or_default()
}

/// Who wrote a message: a bare name (`"human"`) or an object with a `role`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Author {
    Name(String),
    Record(AuthorRecord),
    Other(IgnoredAny),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorRecord {
    #[serde(default)]
    pub role: Option<String>,
}

impl Author {
    pub fn role(&self) -> Option<&str> {
        let role = match self {
            Author::Name(name) => Some(name.as_str()),
            Author::Record(record) => record.role.as_deref(),
            Author::Other(_) => None,
        };
        role.filter(|r| !r.is_empty())
    }
}

/// Custom deserializer for timestamps in any of the forms [`parse_timestamp`] accepts;
/// unreadable values become `None`
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_timestamp(&value))
}

/// Custom deserializer for ids and titles: non-empty strings, or numbers rendered as text
pub fn deserialize_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Custom deserializer for message arrays; entries that are not objects, or that do not
/// fit `T`, are skipped, and anything other than an array reads as empty
pub fn deserialize_items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(objects_as(items))
}

/// Custom deserializer for node maps keyed by id; values are read like
/// [`deserialize_items`] entries, in key order
pub fn deserialize_nodes<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Object(nodes) = value else {
        return Ok(Vec::new());
    };
    Ok(objects_as(nodes.into_iter().map(|(_, node)| node)))
}

fn objects_as<T: DeserializeOwned>(values: impl IntoIterator<Item = Value>) -> Vec<T> {
    values
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect()
}
