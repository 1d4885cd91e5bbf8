//! Confidence that a conversation describes unfinished work.

use crate::config::AnalysisConfig;
use crate::models::SignalSet;

/// Weighted sum of the confidence sub-signals, clamped to [0, 1].
///
/// A set without a single keyword or marker hit scores exactly 0.0: structure alone
/// (length, an open ending) is never evidence of unfinished work.
pub fn score_confidence(signals: &SignalSet, config: &AnalysisConfig) -> f64 {
    if signals.is_silent() || signals.message_count == 0 {
        return 0.0;
    }

    let weights = &config.confidence_weights;
    let mut score = weights.keyword_density * keyword_density(signals, config);
    if signals.has_marker() {
        score += weights.explicit_marker;
    }
    score += weights.context_richness * context_richness(signals.message_count, config);
    if signals.ends_unresolved {
        score += weights.open_ending;
    }

    clamp_unit(score)
}

/// Keyword and marker hits per message relative to the saturation point, capped at 1
pub fn keyword_density(signals: &SignalSet, config: &AnalysisConfig) -> f64 {
    if signals.message_count == 0 {
        return 0.0;
    }
    let hits = signals.keyword_hits.len() + signals.marker_hits.len();
    let per_message = hits as f64 / signals.message_count as f64;
    clamp_unit(per_message / config.density_saturation)
}

/// Log-scaled message count, capped at 1
pub fn context_richness(message_count: usize, config: &AnalysisConfig) -> f64 {
    log_scaled(message_count as f64, config.message_saturation)
}

/// `ln(1 + value) / ln(1 + saturation)`, capped at 1
pub(crate) fn log_scaled(value: f64, saturation: f64) -> f64 {
    let denominator = (1.0 + saturation).ln();
    if denominator <= 0.0 {
        return 0.0;
    }
    clamp_unit((1.0 + value).ln() / denominator)
}

/// Clamp into [0, 1]; NaN maps to 0
pub(crate) fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}
