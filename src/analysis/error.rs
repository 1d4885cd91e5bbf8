use thiserror::Error;

/// Failures of the analysis core.
///
/// Scoring itself never fails; these are caller mistakes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("invalid conversation at position {index}: {reason}")]
    InvalidInput { index: usize, reason: String },

    #[error("unsupported analyzer type: {0}")]
    UnknownAnalyzer(String),
}
