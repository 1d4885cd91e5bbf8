//! AI History Analyser - Find unfinished projects in exported AI chat histories
//!
//! This library reads conversation exports from ChatGPT, Claude and Gemini, looks for
//! signs of work that was started but never finished, and ranks what it finds. It
//! supports:
//!
//! - Parsing platform exports into one normalized [`Conversation`] model
//! - Extracting keyword, marker and open-ending signals from each conversation
//! - Scoring confidence and priority, and ranking the resulting findings
//! - Exporting findings as JSON or as an Obsidian vault of linked notes
//!
//! # Example
//!
//! ```no_run
//! use ai_history_analyser::config::AnalysisConfig;
//! use ai_history_analyser::parsers::{ClaudeParser, Parser};
//! use ai_history_analyser::analyze;
//! use std::path::Path;
//!
//! let conversations = ClaudeParser.parse_file(Path::new("conversations.json"))?;
//! let findings = analyze(&conversations, &AnalysisConfig::default(), chrono::Utc::now())?;
//! println!("Found {} unfinished projects", findings.len());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod exporters;
pub mod models;
pub mod parsers;
pub mod utils;

// Re-export commonly used types
pub use analysis::{AnalysisError, Analyzer, analyze, get_analyzer};
pub use config::{AnalysisConfig, AppConfig, load_config};
pub use exporters::{Exporter, get_exporter};
pub use models::{AnalysisReport, Conversation, Finding, Message, Platform, Role};
pub use parsers::{Parser, get_parser};
