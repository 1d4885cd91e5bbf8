//! Priority scoring and global ordering of findings.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use super::confidence::{clamp_unit, log_scaled};
use crate::config::AnalysisConfig;
use crate::models::{Conversation, Finding, Recency, SignalSet};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// An accepted conversation that has a confidence but no priority yet
#[derive(Debug, Clone)]
pub struct FindingDraft<'a> {
    pub conversation: &'a Conversation,
    pub signals: SignalSet,
    pub confidence: f64,
}

/// Blend confidence, recency and richness into a priority in [0, 1].
///
/// `now` is supplied by the caller; nothing here reads the clock.
pub fn score_priority(draft: &FindingDraft<'_>, config: &AnalysisConfig, now: DateTime<Utc>) -> f64 {
    let weights = &config.priority_weights;
    let score = weights.confidence * clamp_unit(draft.confidence)
        + weights.recency * recency_score(&draft.signals.recency, now, config)
        + weights.richness * richness(&draft.signals, config);
    clamp_unit(score)
}

/// Exponential decay with the configured half-life.
///
/// Timestamps in the future count as "just now". Unknown timestamps get the configured
/// neutral value.
pub fn recency_score(recency: &Recency, now: DateTime<Utc>, config: &AnalysisConfig) -> f64 {
    match recency {
        Recency::Unknown => clamp_unit(config.unknown_recency),
        Recency::Known(at) => {
            let elapsed_seconds = now.signed_duration_since(*at).num_seconds().max(0) as f64;
            let elapsed_days = elapsed_seconds / SECONDS_PER_DAY;
            clamp_unit(0.5f64.powf(elapsed_days / config.recency_half_life_days))
        }
    }
}

/// Content volume, log-scaled over total text length.
///
/// Message count already feeds confidence, so only the text length is used here.
pub fn richness(signals: &SignalSet, config: &AnalysisConfig) -> f64 {
    log_scaled(signals.text_length as f64, config.length_saturation)
}

/// Order: priority desc, confidence desc, conversation id asc.
pub fn compare_findings(a: &Finding, b: &Finding) -> Ordering {
    b.priority
        .total_cmp(&a.priority)
        .then_with(|| b.confidence.total_cmp(&a.confidence))
        .then_with(|| a.conversation_id.cmp(&b.conversation_id))
}

/// Sort findings into their final order. Stable, so exact ties keep input order.
pub fn rank(mut findings: Vec<Finding>) -> Vec<Finding> {
    findings.sort_by(compare_findings);
    findings
}
