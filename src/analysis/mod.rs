//! Detection and scoring of unfinished projects
//!
//! Pipeline per conversation: [`signals::extract`] → [`confidence::score_confidence`] →
//! threshold → [`priority::score_priority`], then [`priority::rank`] over the whole batch.
//! Everything here is pure and synchronous; the current time is always passed in.

pub mod confidence;
pub mod engine;
pub mod error;
pub mod priority;
pub mod signals;

use chrono::{DateTime, Utc};

pub use confidence::score_confidence;
pub use engine::{UnfinishedProjectsAnalyzer, analyze};
pub use error::AnalysisError;
pub use priority::{FindingDraft, rank, score_priority};
pub use signals::extract;

use crate::config::AnalysisConfig;
use crate::models::{AnalysisReport, Conversation};

/// An analysis strategy over a batch of conversations
pub trait Analyzer {
    fn name(&self) -> &'static str;

    fn analyze(
        &self,
        conversations: &[Conversation],
        config: &AnalysisConfig,
        now: DateTime<Utc>,
    ) -> Result<AnalysisReport, AnalysisError>;
}

type AnalyzerFactory = fn() -> Box<dyn Analyzer>;

fn unfinished_projects() -> Box<dyn Analyzer> {
    Box::new(UnfinishedProjectsAnalyzer)
}

/// Accepted names (first one is canonical) and their factories
const ANALYZERS: &[(&[&str], AnalyzerFactory)] =
    &[(&["unfinished-projects", "unfinished_projects", "unfinished"], unfinished_projects)];

/// Resolve an analyzer by name (case-insensitive)
pub fn get_analyzer(name: &str) -> Result<Box<dyn Analyzer>, AnalysisError> {
    let wanted = name.trim().to_lowercase();
    ANALYZERS
        .iter()
        .find(|(names, _)| names.contains(&wanted.as_str()))
        .map(|(_, factory)| factory())
        .ok_or_else(|| AnalysisError::UnknownAnalyzer(name.to_string()))
}

/// Canonical names of every registered analyzer
pub fn available_analyzers() -> Vec<&'static str> {
    ANALYZERS.iter().map(|(names, _)| names[0]).collect()
}
