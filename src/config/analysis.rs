use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

// Each phrase lives in exactly one of the two lists
const DEFAULT_KEYWORDS: &[&str] = &[
    "HACK",
    "need to",
    "needs to",
    "next step",
    "next steps",
    "still need",
    "not yet",
    "planning to",
    "intend to",
    "should implement",
    "left off",
    "missing",
];

const DEFAULT_MARKERS: &[&str] = &[
    "TODO",
    "FIXME",
    "WIP",
    "unfinished",
    "incomplete",
    "not finished",
    "not implemented",
    "not done",
    "work in progress",
    "partially implemented",
];

const DEFAULT_ACTION_KEYWORDS: &[&str] = &[
    "next step",
    "would you like",
    "you could",
    "we could",
    "then we can",
    "once you",
    "remaining",
    "follow-up",
    "let's continue",
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Weights of the confidence sub-signals.
///
/// They are not required to sum to 1; the scorer clamps its result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfidenceWeights {
    /// Keyword hits per message, saturating at `density_saturation`
    pub keyword_density: f64,
    /// Flat bonus when any explicit marker matched
    pub explicit_marker: f64,
    /// Log-scaled message count, saturating at `message_saturation`
    pub context_richness: f64,
    /// Bonus when the conversation ends on an unanswered assistant proposal
    pub open_ending: f64,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self { keyword_density: 0.5, explicit_marker: 0.4, context_richness: 0.2, open_ending: 0.1 }
    }
}

/// Weights of the priority blend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PriorityWeights {
    pub confidence: f64,
    pub recency: f64,
    pub richness: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self { confidence: 0.5, recency: 0.3, richness: 0.2 }
    }
}

/// Options of the unfinished-project analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Generic hedge phrases, matched case-insensitively as whole words
    pub keywords: Vec<String>,
    /// Phrases that state incompleteness outright
    pub markers: Vec<String>,
    /// Phrases that make a final assistant message an open proposal
    pub action_keywords: Vec<String>,
    pub min_confidence: f64,
    pub recency_half_life_days: f64,
    /// Recency assigned to conversations without any timestamp
    pub unknown_recency: f64,
    /// Hits per message at which the density term saturates
    pub density_saturation: f64,
    /// Message count at which the richness term saturates
    pub message_saturation: f64,
    /// Text length (characters) at which the priority richness term saturates
    pub length_saturation: f64,
    pub confidence_weights: ConfidenceWeights,
    pub priority_weights: PriorityWeights,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            keywords: strings(DEFAULT_KEYWORDS),
            markers: strings(DEFAULT_MARKERS),
            action_keywords: strings(DEFAULT_ACTION_KEYWORDS),
            min_confidence: 0.7,
            recency_half_life_days: 30.0,
            unknown_recency: 0.5,
            density_saturation: 1.0,
            message_saturation: 20.0,
            length_saturation: 20_000.0,
            confidence_weights: ConfidenceWeights::default(),
            priority_weights: PriorityWeights::default(),
        }
    }
}

impl AnalysisConfig {
    /// Range-check every numeric option and reject blank phrases
    pub fn validate(&self) -> Result<()> {
        check_unit("min_confidence", self.min_confidence)?;
        check_unit("unknown_recency", self.unknown_recency)?;
        check_positive("recency_half_life_days", self.recency_half_life_days)?;
        check_positive("density_saturation", self.density_saturation)?;
        check_positive("message_saturation", self.message_saturation)?;
        check_positive("length_saturation", self.length_saturation)?;

        let w = &self.confidence_weights;
        check_weight("confidence_weights.keyword_density", w.keyword_density)?;
        check_weight("confidence_weights.explicit_marker", w.explicit_marker)?;
        check_weight("confidence_weights.context_richness", w.context_richness)?;
        check_weight("confidence_weights.open_ending", w.open_ending)?;

        let p = &self.priority_weights;
        check_weight("priority_weights.confidence", p.confidence)?;
        check_weight("priority_weights.recency", p.recency)?;
        check_weight("priority_weights.richness", p.richness)?;

        for (name, list) in [
            ("keywords", &self.keywords),
            ("markers", &self.markers),
            ("action_keywords", &self.action_keywords),
        ] {
            if let Some(pos) = list.iter().position(|k| k.trim().is_empty()) {
                bail!("{} entry {} is blank", name, pos);
            }
        }

        Ok(())
    }
}

fn check_unit(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        bail!("{} must be within [0, 1], got {}", name, value);
    }
    Ok(())
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        bail!("{} must be a positive number, got {}", name, value);
    }
    Ok(())
}

fn check_weight(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        bail!("{} must be a non-negative number, got {}", name, value);
    }
    Ok(())
}
