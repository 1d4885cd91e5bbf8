//! Platform export parsers (ChatGPT, Claude, Gemini)
//!
//! # Error Handling Strategy
//!
//! This module follows a **graceful degradation** approach suitable for CLI tools:
//!
//! - **Whole-file failures**: Unreadable files, oversized files and invalid JSON are errors.
//!   Nothing from such a file reaches the analysis core.
//!
//! - **Element-level problems**: Conversation entries that are not JSON objects are logged
//!   and skipped. Fields of the wrong shape read as missing (see [`deserializers`]):
//!   messages without text are dropped silently, unknown roles become `system`, missing
//!   ids become `unknown` and unreadable timestamps become absent.
//!
//! - **Error propagation**: Uses `anyhow::Result` with context; callers report and move on
//!   to the next input file.

pub mod chatgpt;
pub mod claude;
pub mod deserializers;
pub mod gemini;
pub mod timestamps;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::Value;

pub use chatgpt::ChatGptParser;
pub use claude::ClaudeParser;
pub use gemini::GeminiParser;

use crate::models::{Conversation, Platform, Role};
use crate::utils::validate_file_size;

/// Fallback id for conversations that carry none
pub const UNKNOWN_ID: &str = "unknown";

/// Reads one platform's export format into normalized conversations
pub trait Parser {
    fn platform(&self) -> Platform;

    /// Convert one conversation object of the export
    fn parse_conversation(&self, item: &Value) -> Result<Conversation>;

    /// Parse a whole export document
    fn parse(&self, bytes: &[u8]) -> Result<Vec<Conversation>> {
        let document: Value = serde_json::from_slice(bytes)
            .with_context(|| format!("Invalid {} export: not valid JSON", self.platform()))?;

        let items = conversation_items(&document)
            .with_context(|| format!("Invalid {} export", self.platform()))?;

        let mut conversations = Vec::with_capacity(items.len());
        let mut skipped = 0;
        for (index, item) in items.iter().enumerate() {
            if !item.is_object() {
                tracing::warn!(
                    platform = %self.platform(),
                    index,
                    "skipping conversation entry that is not a JSON object"
                );
                skipped += 1;
                continue;
            }
            match self.parse_conversation(item) {
                Ok(conversation) => conversations.push(conversation),
                Err(e) => {
                    tracing::warn!(
                        platform = %self.platform(),
                        index,
                        error = %e,
                        "skipping unreadable conversation entry"
                    );
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            tracing::info!(
                platform = %self.platform(),
                parsed = conversations.len(),
                skipped,
                "parsed export with skipped entries"
            );
        }

        Ok(conversations)
    }

    /// Open, size-check and parse an export file
    fn parse_file(&self, path: &Path) -> Result<Vec<Conversation>> {
        let mut file = File::open(path)
            .with_context(|| format!("Failed to open export file: {}", path.display()))?;
        validate_file_size(&file, path)?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .with_context(|| format!("Failed to read export file: {}", path.display()))?;

        self.parse(&bytes).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

/// Locate the conversation list inside an export document.
///
/// Accepted shapes: a top-level array, an object with a `conversations` or `items` array,
/// or a single conversation object.
pub fn conversation_items(document: &Value) -> Result<Vec<&Value>> {
    match document {
        Value::Array(items) => Ok(items.iter().collect()),
        Value::Object(obj) => {
            for key in ["conversations", "items"] {
                if let Some(Value::Array(items)) = obj.get(key) {
                    return Ok(items.iter().collect());
                }
            }
            Ok(vec![document])
        }
        _ => bail!("expected a JSON array or object at the top level"),
    }
}

/// Map a platform role string onto [`Role`]; anything unrecognised becomes `System`
pub fn normalize_role(raw: &str, user: &[&str], assistant: &[&str]) -> Role {
    let lower = raw.to_lowercase();
    if user.contains(&lower.as_str()) {
        Role::User
    } else if assistant.contains(&lower.as_str()) {
        Role::Assistant
    } else {
        Role::System
    }
}

type ParserFactory = fn() -> Box<dyn Parser>;

fn chatgpt() -> Box<dyn Parser> {
    Box::new(ChatGptParser)
}

fn claude() -> Box<dyn Parser> {
    Box::new(ClaudeParser)
}

fn gemini() -> Box<dyn Parser> {
    Box::new(GeminiParser)
}

const PARSERS: &[(&str, ParserFactory)] =
    &[("chatgpt", chatgpt), ("claude", claude), ("gemini", gemini)];

/// Resolve a parser by platform name (case-insensitive)
pub fn get_parser(platform: &str) -> Result<Box<dyn Parser>> {
    let wanted = platform.trim().to_lowercase();
    match PARSERS.iter().find(|(name, _)| *name == wanted) {
        Some((_, factory)) => Ok(factory()),
        None => bail!(
            "Unsupported platform: {} (expected one of: {})",
            platform,
            available_parsers().join(", ")
        ),
    }
}

pub fn available_parsers() -> Vec<&'static str> {
    PARSERS.iter().map(|(name, _)| *name).collect()
}
