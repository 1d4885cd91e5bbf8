//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;

/// Builder for a temporary directory of platform export files
pub struct ExportDirBuilder {
    temp_dir: TempDir,
}

impl ExportDirBuilder {
    /// Create a new builder with an empty directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    /// Get the path to the export directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Add a file with raw content (relative paths may include subdirectories)
    pub fn with_file(self, name: &str, content: &str) -> Self {
        let path = self.temp_dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create export subdirectory");
        }
        fs::write(path, content).expect("Failed to write export file");
        self
    }

    /// Add a Claude export (`conversations.json` layout)
    pub fn with_claude_export(self, name: &str, conversations: &[ConversationBuilder]) -> Self {
        let doc: Vec<Value> = conversations.iter().map(|c| c.to_claude_json()).collect();
        self.with_file(name, &Value::Array(doc).to_string())
    }

    /// Add a ChatGPT export (mapping of message nodes)
    pub fn with_chatgpt_export(self, name: &str, conversations: &[ConversationBuilder]) -> Self {
        let doc: Vec<Value> = conversations.iter().map(|c| c.to_chatgpt_json()).collect();
        self.with_file(name, &Value::Array(doc).to_string())
    }

    /// Add a Gemini export (`{"conversations": [...]}` wrapper)
    pub fn with_gemini_export(self, name: &str, conversations: &[ConversationBuilder]) -> Self {
        let doc: Vec<Value> = conversations.iter().map(|c| c.to_gemini_json()).collect();
        self.with_file(name, &json!({ "conversations": doc }).to_string())
    }

    /// Path of a file inside the directory
    pub fn file(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for ExportDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
enum Speaker {
    User,
    Assistant,
}

/// Platform-neutral description of a conversation, rendered into each export format
#[derive(Clone)]
pub struct ConversationBuilder {
    id: String,
    title: Option<String>,
    updated_at: Option<String>,
    messages: Vec<(Speaker, String)>,
}

impl ConversationBuilder {
    /// Create a new conversation with no messages
    pub fn new(id: &str) -> Self {
        Self { id: id.to_string(), title: None, updated_at: None, messages: Vec::new() }
    }

    /// Set the title
    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Set the last update time (RFC 3339)
    pub fn updated_at(mut self, updated_at: &str) -> Self {
        self.updated_at = Some(updated_at.to_string());
        self
    }

    /// Add a user message
    pub fn user(mut self, text: &str) -> Self {
        self.messages.push((Speaker::User, text.to_string()));
        self
    }

    /// Add an assistant message
    pub fn assistant(mut self, text: &str) -> Self {
        self.messages.push((Speaker::Assistant, text.to_string()));
        self
    }

    pub fn to_claude_json(&self) -> Value {
        let messages: Vec<Value> = self
            .messages
            .iter()
            .map(|(speaker, text)| {
                let sender = match speaker {
                    Speaker::User => "human",
                    Speaker::Assistant => "assistant",
                };
                json!({ "sender": sender, "text": text })
            })
            .collect();
        json!({
            "uuid": self.id,
            "name": self.title,
            "updated_at": self.updated_at,
            "chat_messages": messages,
        })
    }

    pub fn to_chatgpt_json(&self) -> Value {
        let mut mapping = serde_json::Map::new();
        for (i, (speaker, text)) in self.messages.iter().enumerate() {
            let role = match speaker {
                Speaker::User => "user",
                Speaker::Assistant => "assistant",
            };
            mapping.insert(
                format!("node-{}", i),
                json!({
                    "message": {
                        "author": { "role": role },
                        "content": { "parts": [text] },
                        "create_time": 1_700_000_000 + i as i64,
                    }
                }),
            );
        }
        json!({
            "id": self.id,
            "title": self.title,
            "update_time": self.updated_at,
            "mapping": mapping,
        })
    }

    pub fn to_gemini_json(&self) -> Value {
        let messages: Vec<Value> = self
            .messages
            .iter()
            .map(|(speaker, text)| {
                let role = match speaker {
                    Speaker::User => "user",
                    Speaker::Assistant => "model",
                };
                json!({ "role": role, "parts": [{ "text": text }] })
            })
            .collect();
        json!({
            "conversation_id": self.id,
            "title": self.title,
            "updated_at": self.updated_at,
            "messages": messages,
        })
    }
}

/// A conversation that clearly stops mid-project
pub fn unfinished_conversation(id: &str) -> ConversationBuilder {
    ConversationBuilder::new(id)
        .user("I'm building a CLI budget tracker. TODO: finish the import command, need to add tests")
        .assistant("The import parser is not implemented yet. Next step: wire up the CSV reader.")
}

/// A conversation that ends with the work done
pub fn finished_conversation(id: &str) -> ConversationBuilder {
    ConversationBuilder::new(id)
        .user("Can you explain how binary search works?")
        .assistant("Binary search halves the search range each step. Glad I could help.")
}

/// Export directory with one Claude and one Gemini export, one qualifying conversation each
pub fn mixed_platform_exports() -> TempDir {
    ExportDirBuilder::new()
        .with_claude_export(
            "claude.json",
            &[
                unfinished_conversation("claude-1").title("Budget tracker"),
                finished_conversation("claude-2"),
            ],
        )
        .with_gemini_export(
            "gemini.json",
            &[unfinished_conversation("gemini-1").title("Garden planner")],
        )
        .build()
}
