use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::conversation::Platform;
use super::signals::Recency;

/// Justification attached to a finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub keywords: Vec<String>,
    pub markers: Vec<String>,
    pub keyword_hits: usize,
    pub message_count: usize,
    pub text_length: usize,
    pub ends_unresolved: bool,
    pub recency: Recency,
    pub excerpt: String,
}

/// One conversation judged to describe unfinished work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub id: Uuid,
    pub conversation_id: String,
    pub title: String,
    pub platform: Platform,
    pub last_activity: Option<DateTime<Utc>>,
    pub confidence: f64,
    pub priority: f64,
    pub tags: Vec<String>,
    pub evidence: Evidence,
}

/// Number of conversations a platform contributed to a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformCount {
    pub platform: Platform,
    pub conversations: usize,
}

/// Everything an exporter needs from one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub analyzer: String,
    pub generated_at: DateTime<Utc>,
    pub conversations_analyzed: usize,
    pub platforms: Vec<PlatformCount>,
    pub findings: Vec<Finding>,
}
