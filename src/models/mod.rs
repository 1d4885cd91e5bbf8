//! Data models shared by parsers, the analysis engine and exporters.
//!
//! - [`Conversation`] / [`Message`] - the normalized form every platform parser produces
//! - [`SignalSet`] - evidence extracted from one conversation during a run
//! - [`Finding`] - a conversation judged unfinished, with its scores
//! - [`AnalysisReport`] - the ranked findings of a run plus run metadata
//!
//! Everything here derives serde so exporters can serialize it as-is.

pub mod conversation;
pub mod finding;
pub mod signals;

pub use conversation::{Conversation, Message, Platform, Role};
pub use finding::{AnalysisReport, Evidence, Finding, PlatformCount};
pub use signals::{KeywordHit, Recency, SignalSet};
